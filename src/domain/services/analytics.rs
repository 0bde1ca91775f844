use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Fire-and-forget telemetry. Disabled when no endpoint is configured, and a
/// failed capture must never affect orchestrator state, so errors stop at a
/// warn log.
pub struct AnalyticsService {}

impl AnalyticsService {
    pub fn capture(event: &'static str, properties: serde_json::Value) {
        let url = Config::get(ConfigKey::AnalyticsURL);
        if url.is_empty() {
            return;
        }

        tokio::spawn(async move {
            let body = serde_json::json!({
                "event": event,
                "properties": properties,
            });

            let res = reqwest::Client::new()
                .post(format!("{url}/capture"))
                .json(&body)
                .send()
                .await;

            if let Err(err) = res {
                tracing::warn!(error = ?err, event, "failed to capture analytics event");
            }
        });
    }
}

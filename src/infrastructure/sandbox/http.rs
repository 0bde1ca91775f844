#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Artifact;
use crate::domain::models::ExecutionResult;
use crate::domain::models::FailureReason;
use crate::domain::models::SandboxBackend;

/// Hands a finished artifact to the sandboxed execution endpoint.
pub struct HttpSandbox {
    url: String,
}

impl Default for HttpSandbox {
    fn default() -> HttpSandbox {
        return HttpSandbox {
            url: Config::get(ConfigKey::SandboxURL),
        };
    }
}

#[async_trait]
impl SandboxBackend for HttpSandbox {
    async fn execute(
        &self,
        artifact: &Artifact,
        user_id: &str,
        api_key: Option<&str>,
    ) -> Result<ExecutionResult, FailureReason> {
        let body = serde_json::json!({
            "artifact": artifact,
            "userID": user_id,
            "apiKey": api_key,
        });

        let res = reqwest::Client::new()
            .post(format!("{url}/api/sandbox", url = self.url))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                return FailureReason::Execution(err.to_string());
            })?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "sandbox request failed");
            return Err(FailureReason::Execution(format!(
                "sandbox returned status {}",
                status.as_u16()
            )));
        }

        return res.json::<ExecutionResult>().await.map_err(|err| {
            return FailureReason::Execution(err.to_string());
        });
    }
}

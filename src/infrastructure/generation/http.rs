#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ArtifactDraft;
use crate::domain::models::Event;
use crate::domain::models::FailureReason;
use crate::domain::models::GenerationBackend;
use crate::domain::models::GenerationRequest;
use crate::domain::models::SessionId;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

/// Streams structured completions from the generation endpoint. The response
/// body is a newline-separated sequence of JSON partial snapshots, each one
/// the full artifact state so far, optionally `data:`-prefixed.
pub struct HttpGeneration {
    url: String,
    timeout: String,
}

impl Default for HttpGeneration {
    fn default() -> HttpGeneration {
        return HttpGeneration {
            url: Config::get(ConfigKey::GenerationURL),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

#[async_trait]
impl GenerationBackend for HttpGeneration {
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Generation URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(&self.url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "generation endpoint is not reachable");
            bail!("Generation endpoint is not reachable");
        }

        let status = res.unwrap().status().as_u16();
        if status >= 500 {
            tracing::error!(status = status, "generation endpoint health check failed");
            bail!("Generation endpoint health check failed");
        }

        return Ok(());
    }

    async fn stream_object<'a>(
        &self,
        session: SessionId,
        request: GenerationRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<(), FailureReason> {
        let res = reqwest::Client::new()
            .post(format!("{url}/api/chat", url = self.url))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                return FailureReason::Transport(err.to_string());
            })?;

        let status = res.status();
        if status.as_u16() == 429 {
            tracing::error!(session = %session, "generation request was rate limited");
            return Err(FailureReason::RateLimited);
        }
        if !status.is_success() {
            tracing::error!(session = %session, status = status.as_u16(), "generation request failed");
            return Err(FailureReason::Transport(format!(
                "generation request failed with status {}",
                status.as_u16()
            )));
        }

        let stream = res.bytes_stream().map_err(convert_err);
        let mut lines_reader = StreamReader::new(stream).lines();

        let mut last = ArtifactDraft::default();
        loop {
            let line = lines_reader.next_line().await.map_err(|err| {
                return FailureReason::Transport(err.to_string());
            })?;
            let line = match line {
                Some(line) => line,
                None => break,
            };

            let mut cleaned_line = line.trim().to_string();
            if cleaned_line.starts_with("data:") {
                cleaned_line = cleaned_line.split_off(5).trim().to_string();
            }
            if cleaned_line.is_empty() || cleaned_line == "[DONE]" {
                continue;
            }

            match serde_json::from_str::<ArtifactDraft>(&cleaned_line) {
                Ok(snapshot) => {
                    tracing::debug!(session = %session, body = ?snapshot, "partial snapshot");
                    last = snapshot.clone();
                    if tx.send(Event::GenerationPartial(session, snapshot)).is_err() {
                        // Receiver went away, nobody left to deliver to.
                        return Ok(());
                    }
                }
                Err(err) => {
                    tracing::warn!(session = %session, error = ?err, "skipping undecodable stream line");
                }
            }
        }

        let _ = tx.send(Event::GenerationComplete(session, Ok(last)));
        return Ok(());
    }
}

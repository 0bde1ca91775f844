#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::ModelConfig;

/// What survives a restart: the pending chat input and the selected model
/// configuration. Convenience only, a missing or unreadable file falls back
/// to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefData {
    pub chat_input: String,
    pub model_config: ModelConfig,
}

pub struct Prefs {
    pub state_dir: path::PathBuf,
}

impl Default for Prefs {
    fn default() -> Prefs {
        let state_dir = dirs::cache_dir().unwrap().join("artifex");

        return Prefs::new(state_dir);
    }
}

impl Prefs {
    pub fn new(state_dir: path::PathBuf) -> Prefs {
        return Prefs { state_dir };
    }

    fn file_path(&self) -> path::PathBuf {
        return self.state_dir.join("prefs.yaml");
    }

    pub async fn load(&self) -> PrefData {
        let file_path = self.file_path();
        if !file_path.exists() {
            return PrefData::default();
        }

        let payload = match fs::read_to_string(file_path).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = ?err, "failed to read prefs, using defaults");
                return PrefData::default();
            }
        };

        return match serde_yaml::from_str(&payload) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(error = ?err, "failed to parse prefs, using defaults");
                return PrefData::default();
            }
        };
    }

    pub async fn save(&self, data: &PrefData) -> Result<()> {
        let payload = serde_yaml::to_string(data)?;

        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
        }

        let mut file = fs::File::create(self.file_path()).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}

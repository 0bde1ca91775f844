#[cfg(test)]
#[path = "artifact_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::FailureReason;

/// A partial artifact snapshot as streamed back by the generation backend.
/// Every field is optional so any mid-stream subset parses. Each snapshot is a
/// full replacement of the previous one, never a delta.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDraft {
    pub commentary: Option<String>,
    pub template: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub additional_dependencies: Option<Vec<String>>,
    pub has_additional_dependencies: Option<bool>,
    pub install_dependencies_command: Option<String>,
    pub port: Option<u16>,
    pub file_path: Option<String>,
    pub code: Option<String>,
}

/// A schema-complete artifact, ready to hand to the sandbox.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub commentary: String,
    pub template: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub additional_dependencies: Vec<String>,
    #[serde(default)]
    pub has_additional_dependencies: bool,
    pub install_dependencies_command: Option<String>,
    pub port: Option<u16>,
    pub file_path: String,
    pub code: String,
}

fn required(field: &Option<String>, name: &str) -> Result<String, FailureReason> {
    return match field {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(FailureReason::SchemaMismatch(name.to_string())),
    };
}

impl ArtifactDraft {
    /// Strict validation happens only at stream completion. Partial snapshots
    /// are never rejected for incompleteness.
    pub fn finalize(&self) -> Result<Artifact, FailureReason> {
        return Ok(Artifact {
            commentary: required(&self.commentary, "commentary")?,
            template: required(&self.template, "template")?,
            title: required(&self.title, "title")?,
            description: required(&self.description, "description")?,
            additional_dependencies: self.additional_dependencies.clone().unwrap_or_default(),
            has_additional_dependencies: self.has_additional_dependencies.unwrap_or(false),
            install_dependencies_command: self.install_dependencies_command.clone(),
            port: self.port,
            file_path: required(&self.file_path, "file_path")?,
            code: required(&self.code, "code")?,
        });
    }
}

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Opaque payload returned by the sandbox for the most recently executed
/// artifact. Superseded wholesale by the next execution, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(rename = "exitCode", default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub template: Option<String>,
}

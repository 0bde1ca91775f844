use std::collections::BTreeMap;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;
use crate::configuration::ModelEntry;
use crate::configuration::TemplateEntry;

/// The sampling configuration for the selected model. Persisted across runs by
/// the preference store and sent verbatim to the generation endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// A history turn as sent over the wire. Commentary and meta are client-side
/// state and are stripped before submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

/// Body of one structured-completion request. Constructed fresh per submission
/// from the current history and UI selections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub messages: Vec<RequestMessage>,
    pub template: BTreeMap<String, TemplateEntry>,
    pub model: ModelEntry,
    pub config: ModelConfig,
}

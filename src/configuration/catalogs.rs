#[cfg(test)]
#[path = "catalogs_test.rs"]
mod tests;

use std::collections::BTreeMap;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const AUTO_TEMPLATE: &str = "auto";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub provider: String,
    #[serde(rename = "providerId")]
    pub provider_id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    #[serde(default)]
    pub lib: Vec<String>,
    pub file: String,
    pub instructions: String,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct ModelList {
    models: Vec<ModelEntry>,
}

/// Static reference data for the model picker and the template prompt. Loaded
/// once from the embedded JSON and injected read-only wherever it is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogs {
    pub models: Vec<ModelEntry>,
    pub templates: BTreeMap<String, TemplateEntry>,
}

impl Catalogs {
    pub fn load() -> Result<Catalogs> {
        let list: ModelList = serde_json::from_str(include_str!("models.json"))?;
        let templates: BTreeMap<String, TemplateEntry> =
            serde_json::from_str(include_str!("templates.json"))?;

        return Ok(Catalogs {
            models: list.models,
            templates,
        });
    }

    pub fn find_model(&self, id: &str) -> Option<&ModelEntry> {
        return self.models.iter().find(|e| return e.id == id);
    }

    pub fn has_template(&self, id: &str) -> bool {
        return id == AUTO_TEMPLATE || self.templates.contains_key(id);
    }

    /// `auto` leaves template choice to the model by sending the whole
    /// catalog. A concrete selection narrows the request to that entry alone.
    pub fn select_templates(&self, selection: &str) -> BTreeMap<String, TemplateEntry> {
        if selection != AUTO_TEMPLATE {
            if let Some(entry) = self.templates.get(selection) {
                return BTreeMap::from([(selection.to_string(), entry.clone())]);
            }
            tracing::warn!(template = selection, "unknown template, falling back to auto");
        }

        return self.templates.clone();
    }
}

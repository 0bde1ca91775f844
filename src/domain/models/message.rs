#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

pub const GENERATING_COMMENTARY: &str = "Generating artifact...";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One conversation turn. History is append only, except for the trailing
/// assistant message, which is rewritten in place while a generation for it is
/// in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub commentary: Option<String>,
    pub meta: Option<MessageMeta>,
}

impl Message {
    pub fn user(content: &str) -> Message {
        return Message {
            role: Role::User,
            content: content.to_string(),
            commentary: None,
            meta: None,
        };
    }

    /// The empty assistant turn appended on submit so the UI has something to
    /// render before the first partial snapshot arrives.
    pub fn placeholder() -> Message {
        return Message {
            role: Role::Assistant,
            content: "".to_string(),
            commentary: Some(GENERATING_COMMENTARY.to_string()),
            meta: None,
        };
    }

    pub fn is_assistant(&self) -> bool {
        return self.role == Role::Assistant;
    }
}

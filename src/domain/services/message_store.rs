#[cfg(test)]
#[path = "message_store_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::MessageMeta;
use crate::domain::models::RequestMessage;

/// Ordered conversation history. Mutation is limited to `append` and an
/// index-addressed rewrite of a single assistant turn, so the single-writer
/// discipline stays auditable. The orchestrator is the only writer.
#[derive(Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Appends a turn and returns its index, which stays valid for the
    /// lifetime of the store.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        return self.messages.len() - 1;
    }

    /// Rewrites an in-flight assistant turn in place. Refuses anything that
    /// is not an assistant message; prior turns become immutable once a new
    /// user message lands because nothing holds their index anymore.
    pub fn rewrite_assistant(
        &mut self,
        index: usize,
        content: &str,
        commentary: &str,
        meta: MessageMeta,
    ) -> bool {
        match self.messages.get_mut(index) {
            Some(message) if message.is_assistant() => {
                message.content = content.to_string();
                message.commentary = Some(commentary.to_string());
                message.meta = Some(meta);
                return true;
            }
            _ => {
                tracing::warn!(index, "refusing to rewrite a non-assistant message");
                return false;
            }
        }
    }

    /// History as sent over the wire, stripped of commentary and meta.
    pub fn to_request_messages(&self) -> Vec<RequestMessage> {
        return self
            .messages
            .iter()
            .map(|message| {
                return RequestMessage {
                    role: message.role,
                    content: message.content.to_string(),
                };
            })
            .collect();
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn last(&self) -> Option<&Message> {
        return self.messages.last();
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.messages.is_empty();
    }
}

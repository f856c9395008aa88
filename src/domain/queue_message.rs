//! One entry of a queue batch.

/// Payload of a queue delivery as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// String payload, expected to hold a JSON survey record.
    Text(String),
    /// Payload that was not a string; carries its JSON type name.
    NotText(&'static str),
}

/// A raw queue delivery: an opaque identifier and the undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Queue-assigned message identifier.
    pub message_id: String,
    /// Message payload.
    pub body: MessageBody,
}

impl QueueMessage {
    /// Creates a new `QueueMessage` with a string body.
    #[must_use]
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            body: MessageBody::Text(body.into()),
        }
    }

    /// Creates a `QueueMessage` whose body arrived as a non-string JSON
    /// value of type `json_type`.
    #[must_use]
    pub fn non_text(message_id: impl Into<String>, json_type: &'static str) -> Self {
        Self {
            message_id: message_id.into(),
            body: MessageBody::NotText(json_type),
        }
    }

    /// Identifier used when the queue omitted one.
    #[must_use]
    pub fn fallback_id(index: usize) -> String {
        format!("record-{index}")
    }

    /// Returns `true` if there is nothing to process.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(&self.body, MessageBody::Text(body) if body.is_empty())
    }
}

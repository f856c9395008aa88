//! Queue batch event and partial-batch response DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{MessageBody, QueueMessage};
use crate::service::BatchSummary;

/// Status code reported for every batch, whatever its failures.
pub const BATCH_STATUS_CODE: u16 = 200;

/// Request body for `POST /events`: one batch pushed by the queue.
///
/// Decoding never rejects the batch over one bad record: a missing, null or
/// non-array `Records` is an empty batch, and each record is read leniently
/// (see [`QueueRecord`]).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QueueEvent {
    /// Delivered records, in delivery order.
    #[serde(rename = "Records", default, deserialize_with = "lenient_records")]
    pub records: Vec<QueueRecord>,
}

/// One delivered queue record. Unknown attributes are ignored.
///
/// A non-string `messageId` counts as missing. A missing or null `body` is
/// empty; any other non-string `body` (or a record that is not an object)
/// is kept as [`MessageBody::NotText`] and fails only its own message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(from = "Value")]
pub struct QueueRecord {
    /// Queue-assigned message id.
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
    /// JSON-encoded survey message.
    #[schema(value_type = Option<String>)]
    pub body: MessageBody,
}

impl From<Value> for QueueRecord {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Self {
                    message_id: None,
                    body: MessageBody::NotText(json_type_name(&other)),
                };
            }
        };
        let message_id = match fields.remove("messageId") {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };
        let body = match fields.remove("body") {
            None | Some(Value::Null) => MessageBody::Text(String::new()),
            Some(Value::String(text)) => MessageBody::Text(text),
            Some(other) => MessageBody::NotText(json_type_name(&other)),
        };
        Self { message_id, body }
    }
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<QueueRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(QueueRecord::from).collect(),
        _ => Vec::new(),
    })
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl QueueEvent {
    /// Converts the records into queue messages, filling in `record-{i}`
    /// for missing ids.
    #[must_use]
    pub fn into_messages(self) -> Vec<QueueMessage> {
        self.records
            .into_iter()
            .enumerate()
            .map(|(i, record)| QueueMessage {
                message_id: record
                    .message_id
                    .unwrap_or_else(|| QueueMessage::fallback_id(i)),
                body: record.body,
            })
            .collect()
    }
}

/// Identifier of a message the queue should redeliver.
///
/// Only transient failures (classifier or store errors, unexpected errors)
/// are listed; empty, malformed and invalid messages are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchItemFailure {
    /// Failed message id.
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}

/// Response body for `POST /events`.
///
/// `body` is a JSON string holding `processed`, `failed` and `total`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchResponse {
    /// Always [`BATCH_STATUS_CODE`].
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded counts.
    pub body: String,
    /// Ids of messages that failed transiently, for partial-batch
    /// redelivery.
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl From<BatchSummary> for BatchResponse {
    fn from(summary: BatchSummary) -> Self {
        let body = serde_json::json!({
            "processed": summary.processed,
            "failed": summary.failed,
            "total": summary.total,
        })
        .to_string();
        Self {
            status_code: BATCH_STATUS_CODE,
            body,
            batch_item_failures: summary
                .retry_message_ids
                .into_iter()
                .map(|item_identifier| BatchItemFailure { item_identifier })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn missing_ids_and_bodies_get_defaults() {
        let json = r#"{"Records":[
            {"messageId":"m1","body":"{}","attributes":{"ApproximateReceiveCount":"1"}},
            {"body":"{}"},
            {"messageId":"m3"}
        ]}"#;
        let Ok(event) = serde_json::from_str::<QueueEvent>(json) else {
            panic!("valid event");
        };
        let messages = event.into_messages();
        assert_eq!(
            messages,
            vec![
                QueueMessage::new("m1", "{}"),
                QueueMessage::new("record-1", "{}"),
                QueueMessage::new("m3", ""),
            ]
        );
    }

    #[test]
    fn event_without_records_is_empty() {
        for json in ["{}", r#"{"Records":null}"#, r#"{"Records":"nope"}"#] {
            let Ok(event) = serde_json::from_str::<QueueEvent>(json) else {
                panic!("{json} should decode");
            };
            assert!(event.into_messages().is_empty(), "{json}");
        }
    }

    #[test]
    fn bad_records_are_kept_for_the_dispatcher() {
        let json = r#"{"Records":[
            {"messageId":"m1","body":5},
            {"messageId":7,"body":{"id":"s1"}},
            "not a record",
            {"messageId":"m4","body":null}
        ]}"#;
        let Ok(event) = serde_json::from_str::<QueueEvent>(json) else {
            panic!("bad records must not reject the batch");
        };
        assert_eq!(
            event.into_messages(),
            vec![
                QueueMessage::non_text("m1", "number"),
                QueueMessage::non_text("record-1", "object"),
                QueueMessage::non_text("record-2", "string"),
                QueueMessage::new("m4", ""),
            ]
        );
    }

    #[test]
    fn response_shape() {
        let summary = BatchSummary {
            processed: 2,
            failed: 1,
            total: 3,
            retry_message_ids: vec!["m2".to_string()],
        };
        let response = BatchResponse::from(summary);
        let Ok(json) = serde_json::to_value(&response) else {
            panic!("serializable");
        };
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["batchItemFailures"][0]["itemIdentifier"], "m2");

        let Some(body) = json["body"].as_str() else {
            panic!("body is a string");
        };
        let Ok(counts) = serde_json::from_str::<serde_json::Value>(body) else {
            panic!("body is json");
        };
        assert_eq!(counts, serde_json::json!({"processed": 2, "failed": 1, "total": 3}));
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Response payload carried by a structured exception
///
/// Foreign frameworks attach either a bare string or an object with
/// ad hoc `error`/`message` fields; the untagged representation lets
/// both round in from JSON unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExceptionPayload {
    /// Bare string payload (e.g. `"Forbidden"`)
    Text(String),
    /// Structured payload with optional `error` and `message` fields
    Object(PayloadFields),
}

impl ExceptionPayload {
    /// Convenience constructor for a string payload
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Fields of a structured payload; both are optional and independently absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFields {
    /// Short error phrase (e.g. `"Bad Request"`), source of the code token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable message, a single string or a list of items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageField>,
}

/// The `message` field of a structured payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageField {
    /// Single message string
    Text(String),
    /// Mixed list of message strings and validation failures
    List(Vec<MessageItem>),
}

/// One element of a message list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageItem {
    /// Plain message string
    Text(String),
    /// Field-level validation failure tree
    Validation(ValidationFailure),
}

/// Node of a field-level validation failure tree
///
/// Validating a nested object field produces a child node per failing
/// field, so trees can be arbitrarily deep. Each node exclusively owns
/// its children, which rules out cycles by construction. Constraint
/// messages are keyed by constraint name; insertion order is preserved
/// and is the order they are reported in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Constraint name to human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IndexMap<String, String>>,
    /// Failures of nested fields; empty at terminal nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ValidationFailure>,
}

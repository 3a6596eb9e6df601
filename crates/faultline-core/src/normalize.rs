//! Code and message extraction from exception payloads
//!
//! The payload space is untyped and adversarial: nested validation
//! trees of unbounded depth, mixed message lists, missing fields.
//! Every function here is total and never panics on malformed input.

use convert_case::{Boundary, Case, Casing};
use indexmap::IndexMap;

use crate::payload::{ExceptionPayload, MessageField, MessageItem, ValidationFailure};

/// Separator between aggregated constraint messages
const CONSTRAINT_SEPARATOR: &str = " -- ";

/// Fallback when a validation tree terminates without constraints
const INVALID_PARAMETER: &str = "Invalid parameter";

/// Fallback when the payload has no recognizable message shape
const UNKNOWN_MESSAGE: &str = "INTERNAL_SERVER_ERROR";

/// Descent cap for validation trees
///
/// Owned children make true cycles impossible, but a pathologically deep
/// tree from a foreign payload must not dominate the error path. Beyond
/// the cap the tree is treated as degenerate.
const MAX_VALIDATION_DEPTH: usize = 128;

/// Format an error phrase as an uppercase snake token
///
/// `"Bad Request"` becomes `BAD_REQUEST`, `"entity.too.large"` becomes
/// `ENTITY_TOO_LARGE`. Idempotent: already-formatted tokens pass through
/// unchanged.
#[must_use]
pub fn format_error_code(raw: &str) -> String {
    // `.` is not a default word boundary, but dotted markers are a
    // common error-code shape
    let mut boundaries = Boundary::defaults().to_vec();
    boundaries.push(Boundary::from_delim("."));
    raw.with_boundaries(&boundaries).to_case(Case::Constant)
}

/// Extract the machine-readable code token from a payload
///
/// String payloads and string `error` fields are formatted with
/// [`format_error_code`]; any other shape yields an empty string.
#[must_use]
pub fn extract_code(payload: &ExceptionPayload) -> String {
    match payload {
        ExceptionPayload::Text(text) => format_error_code(text),
        ExceptionPayload::Object(fields) => fields.error.as_deref().map(format_error_code).unwrap_or_default(),
    }
}

/// Extract the human-readable message from a payload
///
/// String payloads and string `message` fields are returned verbatim.
/// A message list is represented by its first element only: a string is
/// returned as-is, a validation failure is flattened via
/// [`validation_message`]. Everything else degrades to the generic
/// fallback.
#[must_use]
pub fn extract_message(payload: &ExceptionPayload) -> String {
    let fields = match payload {
        ExceptionPayload::Text(text) => return text.clone(),
        ExceptionPayload::Object(fields) => fields,
    };

    match &fields.message {
        Some(MessageField::Text(text)) => text.clone(),
        Some(MessageField::List(items)) => match items.first() {
            Some(MessageItem::Text(text)) => text.clone(),
            Some(MessageItem::Validation(failure)) => validation_message(failure),
            None => UNKNOWN_MESSAGE.to_owned(),
        },
        None => UNKNOWN_MESSAGE.to_owned(),
    }
}

/// Aggregate the constraint messages of a validation failure tree
///
/// Joins the terminal node's constraint messages in insertion order;
/// a terminal without constraints reports the invalid-parameter
/// fallback.
#[must_use]
pub fn validation_message(failure: &ValidationFailure) -> String {
    let Some(constraints) = terminal_constraints(failure) else {
        return INVALID_PARAMETER.to_owned();
    };
    if constraints.is_empty() {
        return INVALID_PARAMETER.to_owned();
    }

    constraints.values().map(String::as_str).collect::<Vec<_>>().join(CONSTRAINT_SEPARATOR)
}

/// Descend to the terminal node of a validation tree
///
/// Nested field failures nest their detail under `children`; only the
/// deepest first child carries the authoritative constraints. Returns
/// `None` when the descent exceeds [`MAX_VALIDATION_DEPTH`] or the
/// terminal has no constraints.
fn terminal_constraints(root: &ValidationFailure) -> Option<&IndexMap<String, String>> {
    let mut node = root;
    let mut depth = 0;
    while let Some(child) = node.children.first() {
        depth += 1;
        if depth > MAX_VALIDATION_DEPTH {
            return None;
        }
        node = child;
    }
    node.constraints.as_ref()
}

#[cfg(test)]
mod tests {
    use indexmap::indexmap;

    use super::*;
    use crate::payload::PayloadFields;

    fn object(fields: PayloadFields) -> ExceptionPayload {
        ExceptionPayload::Object(fields)
    }

    #[test]
    fn formats_phrases_as_constant_case() {
        assert_eq!(format_error_code("Bad Request"), "BAD_REQUEST");
        assert_eq!(format_error_code("entity too large"), "ENTITY_TOO_LARGE");
        assert_eq!(format_error_code("entity.too.large"), "ENTITY_TOO_LARGE");
    }

    #[test]
    fn formatting_is_idempotent_and_whitespace_free() {
        for raw in [
            "Bad Request",
            "BAD_REQUEST",
            "payload too large",
            "Not-Found",
            "entity.too.large",
            "ENTITY_TOO_LARGE",
            "teapot",
        ] {
            let once = format_error_code(raw);
            assert_eq!(format_error_code(&once), once);
            assert!(!once.chars().any(char::is_whitespace));
            assert_eq!(once, once.to_uppercase());
        }
    }

    #[test]
    fn code_comes_from_string_payload() {
        assert_eq!(extract_code(&ExceptionPayload::text("Bad Request")), "BAD_REQUEST");
    }

    #[test]
    fn code_comes_from_error_field() {
        let payload = object(PayloadFields {
            error: Some("Unprocessable Entity".to_owned()),
            message: None,
        });
        assert_eq!(extract_code(&payload), "UNPROCESSABLE_ENTITY");
    }

    #[test]
    fn code_is_empty_without_error_field() {
        assert_eq!(extract_code(&object(PayloadFields::default())), "");
    }

    #[test]
    fn message_returns_string_payload_verbatim() {
        assert_eq!(extract_message(&ExceptionPayload::text("X")), "X");
    }

    #[test]
    fn message_returns_message_field_verbatim() {
        let payload = object(PayloadFields {
            error: None,
            message: Some(MessageField::Text("X".to_owned())),
        });
        assert_eq!(extract_message(&payload), "X");
    }

    #[test]
    fn message_takes_first_string_of_a_list() {
        let payload = object(PayloadFields {
            error: None,
            message: Some(MessageField::List(vec![
                MessageItem::Text("first".to_owned()),
                MessageItem::Text("second".to_owned()),
            ])),
        });
        assert_eq!(extract_message(&payload), "first");
    }

    #[test]
    fn message_flattens_a_flat_validation_failure() {
        let payload = object(PayloadFields {
            error: None,
            message: Some(MessageField::List(vec![MessageItem::Validation(ValidationFailure {
                constraints: Some(indexmap! {"isNotEmpty".to_owned() => "must not be empty".to_owned()}),
                children: vec![],
            })])),
        });
        assert_eq!(extract_message(&payload), "must not be empty");
    }

    #[test]
    fn message_descends_to_the_deepest_first_child() {
        let inner = ValidationFailure {
            constraints: Some(indexmap! {
                "x".to_owned() => "bad".to_owned(),
                "y".to_owned() => "worse".to_owned(),
            }),
            children: vec![],
        };
        let outer = ValidationFailure {
            constraints: None,
            children: vec![inner],
        };
        assert_eq!(validation_message(&outer), "bad -- worse");
    }

    #[test]
    fn terminal_without_constraints_is_an_invalid_parameter() {
        assert_eq!(validation_message(&ValidationFailure::default()), "Invalid parameter");

        let empty = ValidationFailure {
            constraints: Some(IndexMap::new()),
            children: vec![],
        };
        assert_eq!(validation_message(&empty), "Invalid parameter");
    }

    #[test]
    fn pathological_depth_degrades_to_the_fallback() {
        let mut node = ValidationFailure {
            constraints: Some(indexmap! {"deep".to_owned() => "unreachable".to_owned()}),
            children: vec![],
        };
        for _ in 0..200 {
            node = ValidationFailure {
                constraints: None,
                children: vec![node],
            };
        }
        assert_eq!(validation_message(&node), "Invalid parameter");
    }

    #[test]
    fn unrecognized_shapes_report_the_generic_fallback() {
        assert_eq!(extract_message(&object(PayloadFields::default())), "INTERNAL_SERVER_ERROR");

        let empty_list = object(PayloadFields {
            error: None,
            message: Some(MessageField::List(vec![])),
        });
        assert_eq!(extract_message(&empty_list), "INTERNAL_SERVER_ERROR");
    }
}

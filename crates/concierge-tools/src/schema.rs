// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal JSON Schema checking for tool arguments.
//!
//! Covers what the built-in tool schemas actually use: an object with typed
//! properties and a `required` list. Extra argument fields are tolerated so
//! the dispatch loop can inject values not present in the model-facing
//! schema.

use serde_json::Value;

use concierge_core::ConciergeError;

/// Validate `arguments` against an object schema. Returns a `Validation`
/// error naming the first problem found.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), ConciergeError> {
    let Some(args) = arguments.as_object() else {
        return Err(ConciergeError::validation("arguments must be a JSON object"));
    };

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(ConciergeError::validation(format!(
                    "missing required argument `{field}`"
                )));
            }
        }
    }

    for (key, value) in args {
        let Some(spec) = properties.get(key) else {
            continue;
        };
        let Some(expected) = spec.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !type_matches(expected, value) {
            return Err(ConciergeError::validation(format!(
                "argument `{key}` must be of type {expected}"
            )));
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {"type": "string"},
                "amount": {"type": "number"}
            },
            "required": ["order_id", "amount"]
        })
    }

    #[test]
    fn valid_arguments_pass() {
        let args = json!({"order_id": "ORD000032", "amount": 1568.45});
        assert!(validate_arguments(&schema(), &args).is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let args = json!({"order_id": "ORD000032"});
        let err = validate_arguments(&schema(), &args).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn wrong_type_fails() {
        let args = json!({"order_id": "ORD000032", "amount": "a lot"});
        let err = validate_arguments(&schema(), &args).unwrap_err();
        assert!(matches!(err, ConciergeError::Validation { .. }));
    }

    #[test]
    fn injected_extra_fields_are_tolerated() {
        let args = json!({"order_id": "ORD000032", "amount": 1.0, "user_id": "u-1"});
        assert!(validate_arguments(&schema(), &args).is_ok());
    }

    #[test]
    fn non_object_arguments_fail() {
        let err = validate_arguments(&schema(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConciergeError::Validation { .. }));
    }

    #[test]
    fn integer_is_accepted_where_number_expected() {
        let args = json!({"order_id": "ORD000032", "amount": 500});
        assert!(validate_arguments(&schema(), &args).is_ok());
    }
}

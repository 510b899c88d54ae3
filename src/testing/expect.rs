//! JSON-shape expectations used by the suite's checks.

use serde_json::{Map, Value};

use crate::error::CheckError;

pub fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, CheckError> {
    value
        .get(key)
        .ok_or_else(|| CheckError::Schema(format!("missing field `{key}`")))
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> Result<&'a str, CheckError> {
    field(value, key)?
        .as_str()
        .ok_or_else(|| CheckError::Schema(format!("field `{key}` is not a string")))
}

pub fn array_field<'a>(value: &'a Value, key: &str) -> Result<&'a Vec<Value>, CheckError> {
    field(value, key)?
        .as_array()
        .ok_or_else(|| CheckError::Schema(format!("field `{key}` is not an array")))
}

pub fn object_field<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, CheckError> {
    field(value, key)?
        .as_object()
        .ok_or_else(|| CheckError::Schema(format!("field `{key}` is not an object")))
}

/// Optional array: absent or `null` reads as empty, anything else must be an array.
pub fn optional_array<'a>(value: &'a Value, key: &str) -> Result<&'a [Value], CheckError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CheckError::Schema(format!("field `{key}` is not an array"))),
    }
}

pub fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, CheckError> {
    value
        .as_array()
        .ok_or_else(|| CheckError::Schema(format!("expected {what} to be a JSON array")))
}

pub fn non_empty(items: &[Value], what: &str) -> Result<(), CheckError> {
    if items.is_empty() {
        return Err(CheckError::Assertion(format!("expected at least one {what}, got none")));
    }
    Ok(())
}

pub fn equals(actual: &str, expected: &str, what: &str) -> Result<(), CheckError> {
    if actual != expected {
        return Err(CheckError::Assertion(format!(
            "expected {what} to be `{expected}`, got `{actual}`"
        )));
    }
    Ok(())
}

/// Every element of `items` must carry the string fields in `keys`.
pub fn each_has_str_fields(items: &[Value], keys: &[&str], what: &str) -> Result<(), CheckError> {
    for (index, item) in items.iter().enumerate() {
        for key in keys {
            str_field(item, key).map_err(|e| CheckError::Schema(format!("{what}[{index}]: {e}")))?;
        }
    }
    Ok(())
}

/// Display form of a scalar: strings without quotes, everything else as JSON.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_field_is_schema_error() {
        let err = field(&json!({"a": 1}), "b").unwrap_err();
        assert_eq!(err.describe(), "SchemaError: missing field `b`");
    }

    #[test]
    fn wrong_type_is_schema_error() {
        let value = json!({"status": 1, "items": {}});
        assert_eq!(str_field(&value, "status").unwrap_err().category(), "SchemaError");
        assert_eq!(array_field(&value, "items").unwrap_err().category(), "SchemaError");
        assert!(object_field(&value, "items").is_ok());
    }

    #[test]
    fn optional_array_treats_absent_as_empty() {
        let value = json!({"present": [1, 2], "null": null, "bad": "x"});
        assert_eq!(optional_array(&value, "present").unwrap().len(), 2);
        assert!(optional_array(&value, "missing").unwrap().is_empty());
        assert!(optional_array(&value, "null").unwrap().is_empty());
        assert!(optional_array(&value, "bad").is_err());
    }

    #[test]
    fn non_empty_is_assertion_error() {
        let err = non_empty(&[], "patient").unwrap_err();
        assert_eq!(err.category(), "AssertionError");
    }

    #[test]
    fn each_has_str_fields_reports_index() {
        let items = vec![json!({"name": "a"}), json!({"name": 2})];
        let err = each_has_str_fields(&items, &["name"], "medications").unwrap_err();
        assert_eq!(err.to_string(), "medications[1]: field `name` is not a string");
    }

    #[test]
    fn text_strips_quotes_from_strings() {
        assert_eq!(text(&json!("stable")), "stable");
        assert_eq!(text(&json!(3)), "3");
    }
}

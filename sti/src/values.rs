//! Loading template values from JSON files and `KEY=VALUE` arguments.

use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValuesError {
    #[error("failed to open values file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("values file {path} is not valid JSON")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("values must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("value for `{key}` must be a string, number or bool, found {kind}")]
    Unsupported { key: String, kind: &'static str },

    #[error("expected KEY=VALUE, found `{0}`")]
    BadAssignment(String),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a parsed JSON document into template inputs
pub fn from_json(value: Value) -> Result<HashMap<String, String>, ValuesError> {
    let map = match value {
        Value::Object(map) => map,
        other => return Err(ValuesError::NotAnObject(kind(&other))),
    };

    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ValuesError::Unsupported {
                        key,
                        kind: kind(&other),
                    })
                }
            };
            Ok((key, text))
        })
        .collect()
}

pub fn load(path: &Path) -> Result<HashMap<String, String>, ValuesError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| ValuesError::Io {
        path: display.clone(),
        source,
    })?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ValuesError::Json {
            path: display,
            source,
        })?;
    from_json(value)
}

/// clap value parser for `--set KEY=VALUE`
pub fn parse_assignment(arg: &str) -> Result<(String, String), ValuesError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ValuesError::BadAssignment(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        let values = from_json(json!({"name": "Ada", "age": 36, "admin": true}))
            .expect("conversion failed");
        assert_eq!(values.get("name").map(String::as_str), Some("Ada"));
        assert_eq!(values.get("age").map(String::as_str), Some("36"));
        assert_eq!(values.get("admin").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = from_json(json!({"list": [1, 2]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value for `list` must be a string, number or bool, found array"
        );
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = from_json(json!(["a"])).unwrap_err();
        assert!(matches!(err, ValuesError::NotAnObject("array")));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("name=Ada Lovelace").unwrap(),
            ("name".to_string(), "Ada Lovelace".to_string())
        );
        assert_eq!(
            parse_assignment("eq=a=b").unwrap(),
            ("eq".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }
}

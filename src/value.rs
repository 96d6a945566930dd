use serde::Serialize;
use std::collections::BTreeMap;

/// A value produced by an annotation parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

/// The value stored under an annotation name on a parsed comment.
///
/// Annotations that may repeat collect their results in source order; a
/// single-valued annotation holds its first result; a parser that answers with
/// a boolean turns the annotation into a flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    List(Vec<Value>),
    Scalar(Value),
    Flag(bool),
}

impl FieldValue {
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<Vec<Value>> for FieldValue {
    fn from(values: Vec<Value>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Flag(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_serializes_untagged() {
        let list = FieldValue::List(vec!["a".into(), 1.0.into()]);
        assert_eq!(serde_json::to_value(&list).unwrap(), serde_json::json!(["a", 1.0]));

        let flag = FieldValue::Flag(true);
        assert_eq!(serde_json::to_value(&flag).unwrap(), serde_json::json!(true));

        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("x"));
        let scalar = FieldValue::Scalar(Value::Object(map));
        assert_eq!(
            serde_json::to_value(&scalar).unwrap(),
            serde_json::json!({ "name": "x" })
        );
    }

    #[test]
    fn test_field_value_accessors() {
        let scalar = FieldValue::from(Value::from("Map"));
        assert_eq!(scalar.as_scalar(), Some(&Value::from("Map")));
        assert_eq!(scalar.as_flag(), None);
        assert_eq!(scalar.as_list(), None);

        let flag = FieldValue::Flag(false);
        assert_eq!(flag.as_flag(), Some(false));
        assert_eq!(flag.as_scalar(), None);
    }
}

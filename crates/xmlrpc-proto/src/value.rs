//! XML-RPC value model

use crate::{ProtocolError, Result};
use base64::Engine;
use std::collections::BTreeMap;
use std::fmt;

/// `<struct>` members, kept in deterministic order
pub type Struct = BTreeMap<String, Value>;

/// Named arguments forwarded to a remote method
pub type Kwargs = Struct;

/// A single XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<nil/>`
    Nil,

    /// `<boolean>`
    Bool(bool),

    /// `<int>`, `<i4>` or `<i8>`
    Int(i64),

    /// `<double>`
    Double(f64),

    /// `<string>` or untyped `<value>` text
    String(String),

    /// `<dateTime.iso8601>`, kept as the raw wire text
    DateTime(String),

    /// `<base64>`, decoded
    Base64(Vec<u8>),

    /// `<array>`
    Array(Vec<Value>),

    /// `<struct>`
    Struct(Struct),
}

impl Value {
    /// Name of the value's type, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::DateTime(_) => "dateTime",
            Value::Base64(_) => "base64",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    /// Truthiness as understood by the server side: nil, false, zero and
    /// empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Double(d) => *d != 0.0,
            Value::String(s) | Value::DateTime(s) => !s.is_empty(),
            Value::Base64(bytes) => !bytes.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Struct(members) => !members.is_empty(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    pub fn into_i64(self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(other.mismatch("int")),
        }
    }

    pub fn into_bool(self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    pub fn into_struct(self) -> Result<Struct> {
        match self {
            Value::Struct(members) => Ok(members),
            other => Err(other.mismatch("struct")),
        }
    }

    /// Convert an array of ints (record identifiers)
    pub fn into_id_list(self) -> Result<Vec<i64>> {
        self.into_array()?
            .into_iter()
            .map(Value::into_i64)
            .collect()
    }

    /// Convert an array of structs (record mappings)
    pub fn into_record_list(self) -> Result<Vec<Struct>> {
        self.into_array()?
            .into_iter()
            .map(Value::into_struct)
            .collect()
    }

    /// Render as JSON for display. Binary data becomes base64 text.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Nil => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Double(d) => serde_json::Number::from_f64(*d)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) | Value::DateTime(s) => Json::String(s.clone()),
            Value::Base64(bytes) => {
                Json::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Struct(members) => Json::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ProtocolError {
        ProtocolError::UnexpectedType {
            expected,
            found: self.type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::DateTime(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
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

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Struct> for Value {
    fn from(members: Struct) -> Self {
        Value::Struct(members)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Nil)
    }
}

/// Domain terms such as `("is_company", "=", true)`
impl<A, B, C> From<(A, B, C)> for Value
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Array(vec![a.into(), b.into(), c.into()])
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Double(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(members) => Value::Struct(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());

        assert!(Value::Int(2).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::from("admin").is_truthy());
    }

    #[test]
    fn test_domain_term_conversion() {
        let term = Value::from(("is_company", "=", true));
        assert_eq!(
            term,
            Value::Array(vec![
                Value::String("is_company".to_string()),
                Value::String("=".to_string()),
                Value::Bool(true),
            ])
        );
    }

    #[test]
    fn test_option_none_is_nil() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"name": "Acme", "ids": [1, 2], "ratio": 0.5, "x": null}));
        let members = value.into_struct().unwrap();

        assert_eq!(members["name"], Value::from("Acme"));
        assert_eq!(members["ids"], Value::from(vec![1, 2]));
        assert_eq!(members["ratio"], Value::Double(0.5));
        assert_eq!(members["x"], Value::Nil);
    }

    #[test]
    fn test_to_json() {
        let mut members = Struct::new();
        members.insert("id".to_string(), Value::Int(42));
        members.insert("data".to_string(), Value::Base64(b"hi".to_vec()));

        assert_eq!(
            Value::Struct(members).to_json(),
            json!({"id": 42, "data": "aGk="})
        );
    }

    #[test]
    fn test_into_id_list() {
        assert_eq!(
            Value::from(vec![1, 2, 3]).into_id_list().unwrap(),
            vec![1, 2, 3]
        );

        let err = Value::from(vec!["a"]).into_id_list().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedType {
                expected: "int",
                found: "string"
            }
        ));
    }

    #[test]
    fn test_into_record_list_rejects_scalar() {
        let err = Value::Bool(false).into_record_list().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedType {
                expected: "array",
                ..
            }
        ));
    }
}

//! Protocol error types

use thiserror::Error;

/// Protocol-related errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Underlying XML reader/writer error
    #[error("XML error: {0}")]
    Xml(String),

    /// Document is well-formed XML but not a valid XML-RPC message
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    /// Scalar text could not be parsed as its declared type
    #[error("Invalid {kind} value: {text:?}")]
    InvalidScalar { kind: &'static str, text: String },

    /// Unknown value type tag
    #[error("Unknown value type: <{0}>")]
    UnknownType(String),

    /// A value had a different type than the caller expected
    #[error("Unexpected value type: expected {expected}, got {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
}

impl From<quick_xml::Error> for ProtocolError {
    fn from(err: quick_xml::Error) -> Self {
        ProtocolError::Xml(err.to_string())
    }
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

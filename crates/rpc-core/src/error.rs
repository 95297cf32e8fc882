//! Transport error types

use thiserror::Error;
use xmlrpc_proto::{Fault, ProtocolError};

/// Transport-related errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request or response could not be encoded/decoded
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Server returned an XML-RPC fault
    #[error("Remote {0}")]
    Fault(Fault),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

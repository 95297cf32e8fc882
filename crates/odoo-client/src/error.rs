//! Client error types

use thiserror::Error;

/// Client-related errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server rejected the configured credentials
    #[error("Authentication failed. Check your credentials.")]
    AuthenticationFailed,

    /// Model operation attempted before a successful `authenticate()`
    #[error("Not authenticated. Call authenticate() first.")]
    NotAuthenticated,

    /// Transport failure or remote fault, passed through untranslated
    #[error("Remote call failed: {0}")]
    Remote(#[from] rpc_core::TransportError),

    /// Remote payload did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(#[from] xmlrpc_proto::ProtocolError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON argument could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

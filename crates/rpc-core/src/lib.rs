//! RPC Core - Transport layer for XML-RPC services
//!
//! This crate provides the transport abstraction used to reach a remote
//! XML-RPC server, the HTTP implementation, an in-memory stub for tests and
//! the URL-bound endpoint handle that ties them to the wire codec.

pub mod endpoint;
pub mod error;
pub mod transport;

pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use transport::{HttpTransport, MockTransport, RecordedCall, Transport};

/// Re-exports
pub use xmlrpc_proto;

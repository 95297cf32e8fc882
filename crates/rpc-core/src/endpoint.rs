//! Remote service endpoint handles

use crate::{Result, Transport, TransportError};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use xmlrpc_proto::{MethodCall, MethodResponse, Value, XmlRpcCodec};

/// A remote XML-RPC service bound to a fixed URL
///
/// Creating an endpoint does not touch the network; each [`Endpoint::call`]
/// is one request/response exchange.
#[derive(Clone)]
pub struct Endpoint {
    url: String,
    transport: Arc<dyn Transport>,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            transport,
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Invoke `method` with positional `params` and return its result.
    ///
    /// Remote faults are returned as [`TransportError::Fault`] unchanged.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        debug!(
            url = %self.url,
            method = %method,
            transport = self.transport.name(),
            "Calling remote method"
        );

        let body = XmlRpcCodec::encode_call(&MethodCall::new(method, params))?;
        let reply = self.transport.post(&self.url, body).await?;

        match XmlRpcCodec::decode_response(&reply)? {
            MethodResponse::Success(value) => Ok(value),
            MethodResponse::Fault(fault) => {
                debug!(url = %self.url, method = %method, "Remote fault: {}", fault);
                Err(TransportError::Fault(fault))
            }
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url)
            .field("transport", &self.transport.name())
            .finish()
    }
}

//! Transport abstraction
//!
//! This module provides an abstraction over how encoded XML-RPC documents
//! reach the server (HTTP in production, an in-memory stub in tests).

use crate::{Result, TransportError};
use async_trait::async_trait;
use reqwest::header;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use xmlrpc_proto::{Fault, MethodCall, MethodResponse, Value, XmlRpcCodec};

/// Transport trait
///
/// Implementations carry one encoded request to `url` and return the raw
/// response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST an encoded request body and return the response body
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>>;

    /// Get the transport name
    fn name(&self) -> &str;
}

/// HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given request timeout.
    ///
    /// Building the client does not open any connection.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/xml"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("odoo-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!(url = %url, bytes = body.len(), "Sending XML-RPC request");

        let response = self.client.post(url).body(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %url, error = %e, "Failed to read error response body");
                    String::new()
                }
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, bytes = bytes.len(), "Received XML-RPC response");

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Endpoint URL the request was posted to
    pub url: String,

    /// Decoded method call
    pub call: MethodCall,
}

// Mock transport for local testing
/// Scripted in-memory transport
///
/// Responses are served in the order they were queued. Every request is
/// decoded and recorded, which lets tests assert exactly which remote calls
/// were made without a server.
pub struct MockTransport {
    name: String,
    responses: Mutex<VecDeque<MethodResponse>>,
    requests: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Create an empty mock transport
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response
    pub async fn push_response(&self, response: MethodResponse) {
        self.responses.lock().await.push_back(response);
    }

    /// Queue a successful return value
    pub async fn push_value(&self, value: impl Into<Value>) {
        self.push_response(MethodResponse::Success(value.into())).await;
    }

    /// Queue a remote fault
    pub async fn push_fault(&self, code: impl Into<Value>, message: impl Into<String>) {
        self.push_response(MethodResponse::Fault(Fault::new(code, message))).await;
    }

    /// Requests seen so far, oldest first
    pub async fn requests(&self) -> Vec<RecordedCall> {
        self.requests.lock().await.clone()
    }

    /// Number of requests seen so far
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let call = XmlRpcCodec::decode_call(&body)?;

        self.requests.lock().await.push(RecordedCall {
            url: url.to_string(),
            call,
        });

        let response = self
            .responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| TransportError::Connection("No scripted response".to_string()))?;

        Ok(XmlRpcCodec::encode_response(&response)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_and_replies() {
        let transport = MockTransport::new();
        transport.push_value(42).await;

        let call = MethodCall::new("version", vec![]);
        let body = XmlRpcCodec::encode_call(&call).unwrap();
        let reply = transport
            .post("http://odoo/xmlrpc/2/common", body)
            .await
            .unwrap();

        assert_eq!(
            XmlRpcCodec::decode_response(&reply).unwrap(),
            MethodResponse::Success(Value::Int(42))
        );

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://odoo/xmlrpc/2/common");
        assert_eq!(requests[0].call, call);
    }

    #[tokio::test]
    async fn test_mock_without_script_fails() {
        let transport = MockTransport::new();
        let body = XmlRpcCodec::encode_call(&MethodCall::new("version", vec![])).unwrap();

        let result = transport.post("http://odoo/xmlrpc/2/common", body).await;

        assert!(matches!(result, Err(TransportError::Connection(_))));
        assert_eq!(transport.request_count().await, 1);
    }

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        assert_eq!(transport.name(), "http");
    }
}

//! Integration test for HttpTransport against a local HTTP server

use rpc_core::xmlrpc_proto::Value;
use rpc_core::{Endpoint, HttpTransport, TransportError};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERSION_RESPONSE: &str = r#"<?xml version='1.0'?>
<methodResponse>
<params>
<param>
<value><struct>
<member>
<name>server_version</name>
<value><string>17.0</string></value>
</member>
</struct></value>
</param>
</params>
</methodResponse>
"#;

fn http_endpoint(server: &MockServer, suffix: &str) -> Endpoint {
    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    Endpoint::new(format!("{}{}", server.uri(), suffix), Arc::new(transport))
}

#[tokio::test]
async fn test_http_call_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .and(header("content-type", "text/xml"))
        .and(body_string_contains("<methodName>version</methodName>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VERSION_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = http_endpoint(&server, "/xmlrpc/2/common");
    let result = endpoint.call("version", vec![]).await.unwrap();

    let members = result.into_struct().unwrap();
    assert_eq!(members["server_version"], Value::from("17.0"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let endpoint = http_endpoint(&server, "/xmlrpc/2/common");
    let err = endpoint.call("version", vec![]).await.unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("Unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_http_error_status_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let endpoint = http_endpoint(&server, "/xmlrpc/2/object");
    let err = endpoint.call("execute_kw", vec![]).await.unwrap_err();

    assert!(matches!(
        err,
        TransportError::Status { status: 502, ref body } if body.is_empty()
    ));
}

#[tokio::test]
async fn test_http_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let endpoint = http_endpoint(&server, "/xmlrpc/2/object");
    let err = endpoint.call("execute_kw", vec![]).await.unwrap_err();

    assert!(matches!(err, TransportError::Protocol(_)));
}

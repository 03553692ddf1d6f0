//! Error mapping when the backend answers, but not with what we asked for.
//!
//! Each test serves exactly one canned HTTP response from a local socket.

use std::{
    io::{Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use cds_client::HttpClinicalApi;
use cds_contracts::error::{CdsError, GENERIC_ERROR_MESSAGE};
use cds_core::{query_flow::QueryState, traits::ClinicalApi, QueryFlow};

/// Bind an ephemeral port, accept one connection, reply with `status` and
/// `body`, and hand back the request head the client sent.
fn serve_once(status: &str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let head_end = loop {
            if let Some(at) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break at + 4;
            }
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0, "client closed before sending headers");
            request.extend_from_slice(&buf[..n]);
        };
        // Drain the body so closing the socket does not reset the connection.
        let expected = head_end + content_length(&request[..head_end]);
        while request.len() < expected {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    (base_url, handle)
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

#[tokio::test]
async fn server_error_maps_to_status_with_body() {
    let (base_url, server) = serve_once("500 Internal Server Error", "boom");
    let api = HttpClinicalApi::new(&base_url).unwrap();

    let result = api.health().await;
    assert_eq!(
        result,
        Err(CdsError::Status {
            status: 500,
            body: "boom".to_string()
        })
    );

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /health "), "sent {request}");
}

#[tokio::test]
async fn not_found_maps_to_status() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"detail":"Guideline not found"}"#);
    let api = HttpClinicalApi::new(&base_url).unwrap();

    match api.get_guideline("missing").await {
        Err(CdsError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Guideline not found"));
        }
        other => panic!("expected Status error, got {:?}", other),
    }
    server.join().unwrap();
}

#[tokio::test]
async fn wrong_shape_maps_to_decode() {
    // `HealthStatus` requires `status`.
    let (base_url, server) = serve_once("200 OK", "{}");
    let api = HttpClinicalApi::new(&base_url).unwrap();

    match api.health().await {
        Err(CdsError::Decode { reason }) => assert!(reason.contains("/health"), "{reason}"),
        other => panic!("expected Decode error, got {:?}", other),
    }
    server.join().unwrap();
}

#[tokio::test]
async fn query_flow_collapses_status_error_to_generic_message() {
    let (base_url, server) = serve_once("503 Service Unavailable", r#"{"detail":"model offline"}"#);
    let api = HttpClinicalApi::new(&base_url).unwrap();
    let mut flow = QueryFlow::default();
    flow.form.query = "65-year-old male with chest pain, elevated troponins".to_string();

    let err = flow.submit(&api).await.unwrap_err();
    assert!(matches!(err, CdsError::Status { status: 503, .. }));
    assert_eq!(flow.state(), QueryState::Error(GENERIC_ERROR_MESSAGE.to_string()));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /clinical/query "), "sent {request}");
}

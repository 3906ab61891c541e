//! Canned-response HTTP/1.1 server for exercising [`crate::GitHubClient`]
//! end to end.
//!
//! Routes are keyed by `"METHOD /path?query"` exactly as the client sends
//! them. Unrouted requests get a GitHub-style 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::{ClientConfig, GitHubClient};

const NOT_FOUND_BODY: &str = r#"{"message":"Not Found"}"#;

pub(crate) struct TestServer {
    api_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    accept: JoinHandle<()>,
}

impl TestServer {
    pub(crate) async fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(target, status, body)| (target.to_string(), (status, body)))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let accept = tokio::spawn({
            let requests = Arc::clone(&requests);
            async move {
                while let Ok((socket, _)) = listener.accept().await {
                    tokio::spawn(respond(
                        socket,
                        Arc::clone(&routes),
                        Arc::clone(&requests),
                    ));
                }
            }
        });

        Self {
            api_url,
            requests,
            accept,
        }
    }

    pub(crate) fn client(&self) -> GitHubClient {
        GitHubClient::new(ClientConfig {
            api_url: self.api_url.clone(),
            token: Some("test-token".into()),
        })
        .unwrap()
    }

    /// `"METHOD /path?query"` for every request received, in arrival order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.accept.abort();
    }
}

async fn respond(
    mut socket: TcpStream,
    routes: Arc<HashMap<String, (u16, String)>>,
    requests: Arc<Mutex<Vec<String>>>,
) {
    let Some(request_line) = read_request_line(&mut socket).await else {
        return;
    };
    let mut parts = request_line.split_whitespace();
    let key = format!(
        "{} {}",
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default()
    );
    requests.lock().unwrap().push(key.clone());

    let (status, body) = routes
        .get(&key)
        .cloned()
        .unwrap_or((404, NOT_FOUND_BODY.to_string()));
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Reads up to the blank line ending the request head; none of the client's
/// requests carry a body.
async fn read_request_line(socket: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .map(str::to_string)
}

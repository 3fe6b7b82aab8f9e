//! A mock incoming-webhook endpoint for integration tests.

#![allow(dead_code)]

use slackhook::Message;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const WEBHOOK_PATH: &str = "/services/T000/B000/XXXX";

/// Starts a server whose webhook path answers with `response`.
pub async fn start_webhook(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// Starts a server that fails the test on drop unless exactly `count` posts arrive.
pub async fn start_webhook_expecting(count: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(count)
        .mount(&server)
        .await;
    server
}

pub fn webhook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), WEBHOOK_PATH)
}

/// Polls the server until at least `count` requests arrived or `timeout` passes.
pub async fn wait_for_requests(server: &MockServer, count: usize, timeout: Duration) -> Vec<Request> {
    let deadline = Instant::now() + timeout;
    loop {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= count || Instant::now() >= deadline {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Decodes every message the server has received so far.
pub async fn received_messages(server: &MockServer) -> Vec<Message> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("body should be a message"))
        .collect()
}

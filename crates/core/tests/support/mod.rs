//! Shared test helpers for `zeropush-core` integration tests.
//!
//! [`MockTransport`] answers requests from scripted routes and records
//! everything it receives, so tests can assert on both outcomes and the
//! exact requests sent.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use zeropush_core::{
    HttpMethod, HttpRequest, HttpResponse, PushClient, ResponseHeaders, Transport, TransportError,
};
use zeropush_domain::ClientConfig;

pub const TEST_TOKEN: &str = "test-server-token";

type Matcher = Box<dyn Fn(&HttpRequest) -> bool + Send + Sync>;
type Reply = Result<HttpResponse, TransportError>;

struct Route {
    matches: Matcher,
    replies: VecDeque<Reply>,
}

/// In-memory [`Transport`] with scripted replies.
///
/// Routes added later take precedence. A route replies with its queued
/// replies in order and repeats the last one once the queue is down to a
/// single entry. Unmatched requests get a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose credential check succeeds.
    pub fn authenticated() -> Self {
        Self::new().respond(
            HttpMethod::Get,
            "/verify_credentials",
            HttpResponse::new(200, json!({ "message": "authenticated" }).to_string()),
        )
    }

    /// Hold every request for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(self, method: HttpMethod, path: &str, response: HttpResponse) -> Self {
        self.respond_sequence(method, path, vec![response])
    }

    pub fn respond_json(self, method: HttpMethod, path: &str, body: Value) -> Self {
        self.respond(method, path, HttpResponse::new(200, body.to_string()))
    }

    pub fn respond_sequence(
        self,
        method: HttpMethod,
        path: &str,
        responses: Vec<HttpResponse>,
    ) -> Self {
        let path = path.to_string();
        self.route(
            move |request| request.method == method && request.path == path,
            responses.into_iter().map(Ok).collect(),
        )
    }

    pub fn fail(self, method: HttpMethod, path: &str, error: TransportError) -> Self {
        let path = path.to_string();
        self.route(
            move |request| request.method == method && request.path == path,
            VecDeque::from([Err(error)]),
        )
    }

    /// Reply with `response` to requests accepted by `matches`.
    pub fn respond_when<F>(self, matches: F, response: HttpResponse) -> Self
    where
        F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        self.route(matches, VecDeque::from([Ok(response)]))
    }

    fn route<F>(self, matches: F, replies: VecDeque<Reply>) -> Self
    where
        F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        self.routes.lock().push(Route { matches: Box::new(matches), replies });
        self
    }

    /// Every request received, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|request| request.path == path).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    fn reply(&self, request: &HttpRequest) -> Reply {
        let mut routes = self.routes.lock();
        let Some(route) = routes.iter_mut().rev().find(|route| (route.matches)(request)) else {
            return Ok(HttpResponse::new(404, json!({ "message": "No route" }).to_string()));
        };

        if route.replies.len() > 1 {
            route.replies.pop_front().unwrap()
        } else {
            route.replies.front().cloned().unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply(&request)
    }
}

/// 200 response with a JSON body and the given headers.
pub fn json_response(body: Value, headers: &[(&str, &str)]) -> HttpResponse {
    HttpResponse::new(200, body.to_string())
        .with_headers(headers.iter().copied().collect::<ResponseHeaders>())
}

pub fn message(text: &str) -> HttpResponse {
    HttpResponse::new(200, json!({ "message": text }).to_string())
}

pub fn config() -> ClientConfig {
    ClientConfig { fan_out_concurrency: 4, ..ClientConfig::with_token(TEST_TOKEN) }
}

pub fn client(transport: &Arc<MockTransport>) -> PushClient {
    client_with(transport, &config())
}

pub fn client_with(transport: &Arc<MockTransport>, config: &ClientConfig) -> PushClient {
    let transport: Arc<dyn Transport> = transport.clone();
    PushClient::new(transport, config).unwrap()
}

/// Requests other than the credential check.
pub fn operation_requests(transport: &MockTransport) -> Vec<HttpRequest> {
    transport
        .requests()
        .into_iter()
        .filter(|request| request.path != "/verify_credentials")
        .collect()
}

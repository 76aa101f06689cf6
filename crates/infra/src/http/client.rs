use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use url::Url;
use zeropush_core::{
    HttpMethod, HttpRequest, HttpResponse, ResponseHeaders, Transport, TransportError,
};
use zeropush_domain::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use zeropush_domain::{ClientConfig, PushError};

use crate::errors::{transport_error, InfraError};

/// HTTP client for the ZeroPush service, backed by `reqwest`.
///
/// Every status code is handed back to the caller as a response; only
/// requests that never produced one are errors. Connection failures can be
/// retried (`max_attempts`), since such a request never reached the service.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `request`, query parameters appended in order.
    pub fn url_for(&self, request: &HttpRequest) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", request.path))
            .map_err(|err| TransportError::new(format!("invalid request URL: {err}")))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    fn prepare(&self, request: &HttpRequest) -> Result<RequestBuilder, TransportError> {
        let url = self.url_for(request)?;
        let mut builder = self.client.request(method(request.method), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }

    /// Execute the provided request builder, retrying connection failures.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                TransportError::new("request body cannot be cloned; buffer the body to retry")
            })?;

            let request = cloned_builder.build().map_err(|err| transport_error(&err))?;

            let method = request.method().clone();
            let path = request.url().path().to_string();
            debug!(attempt = attempt + 1, %method, %path, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    debug!(
                        attempt = attempt + 1,
                        %method,
                        %path,
                        status = %response.status(),
                        "received HTTP response"
                    );
                    return Ok(response);
                }
                Err(err) => {
                    debug!(
                        attempt = attempt + 1,
                        %method,
                        %path,
                        error = %err,
                        "HTTP request failed"
                    );

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(transport_error(&err));
                }
            }
        }

        Err(TransportError::new("http client exhausted retries without producing a result"))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.prepare(&request)?;
        let response = self.execute(builder).await?;

        let status = response.status().as_u16();
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
            .collect();
        let body = response.text().await.map_err(|err| transport_error(&err))?;

        Ok(HttpResponse { status, body, headers })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            default_headers: None,
            system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    /// Builder preset with the base URL, timeout and user agent of `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::default()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries) for
    /// requests that fail to connect. Defaults to a single attempt.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` and connect directly.
    pub fn no_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, PushError> {
        let base_url = Url::parse(self.base_url.trim())
            .map_err(|err| PushError::from(InfraError::from(err)))?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if !self.system_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| PushError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            base_url,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

// Only failures where the request cannot have reached the service.
fn should_retry_error(err: &reqwest::Error) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method as http_method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::builder().base_url(server.uri()).no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn returns_error_statuses_as_responses() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(path("/devices/abc"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.send(HttpRequest::get("/devices/abc")).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "missing");
    }

    #[tokio::test]
    async fn sends_query_body_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(path("/register"))
            .and(query_param("trace", "1"))
            .and(body_json(json!({ "device_token": "abc" })))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = HttpRequest::post("/register")
            .with_query("trace", 1)
            .with_body(json!({ "device_token": "abc" }));
        let response = client.send(request).await.unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn exposes_headers_lowercased() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .respond_with(ResponseTemplate::new(200).insert_header("X-Push-Quota", "500"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.send(HttpRequest::get("/channels")).await.unwrap();

        assert_eq!(response.headers.get("x-push-quota"), Some("500"));
    }

    #[test]
    fn keeps_base_path_and_encoded_segments() {
        let client =
            HttpClient::builder().base_url("https://push.example.com/api/").build().unwrap();
        let request = HttpRequest::delete("/channels/world%20news").with_query("since", 5);

        let url = client.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "https://push.example.com/api/channels/world%20news?since=5");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(PushError::Config(_))));
    }

    /// Local listener that counts and immediately drops every connection,
    /// so TLS handshakes fail while connecting.
    async fn dropping_listener() -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        (format!("https://{addr}"), accepted)
    }

    #[tokio::test]
    async fn connect_failures_are_not_retried_by_default() {
        let (base_url, accepted) = dropping_listener().await;
        let client = HttpClient::builder().base_url(base_url).no_proxy().build().unwrap();

        let err = client.send(HttpRequest::get("/verify_credentials")).await.unwrap_err();

        assert!(!err.timed_out);
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connect_failures_are_retried_when_configured() {
        let (base_url, accepted) = dropping_listener().await;
        let client = HttpClient::builder()
            .base_url(base_url)
            .base_backoff(Duration::from_millis(5))
            .max_attempts(3)
            .no_proxy()
            .build()
            .unwrap();

        client.send(HttpRequest::get("/verify_credentials")).await.unwrap_err();

        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client =
            HttpClient::builder().base_url(format!("http://{addr}")).no_proxy().build().unwrap();

        let err = client.send(HttpRequest::get("/verify_credentials")).await.unwrap_err();
        assert!(!err.timed_out);
    }

    #[tokio::test]
    async fn builder_from_config_applies_user_agent() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(header("user-agent", "acme-backend/2.1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: server.uri(),
            user_agent: "acme-backend/2.1".into(),
            ..ClientConfig::default()
        };
        let client = HttpClientBuilder::from_config(&config).no_proxy().build().unwrap();

        let response = client.send(HttpRequest::get("/channels")).await.unwrap();
        assert_eq!(response.status, 200);
    }
}

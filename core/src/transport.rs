//! Executing `HttpRequest`s.
//!
//! `Transport` is the only I/O seam in the crate. `HttpTransport` speaks real
//! HTTP through reqwest; tests substitute scripted implementations.
//! `Connection` sits in front of a transport and stamps the session
//! credential onto every request before it leaves.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;

/// Performs one HTTP exchange.
///
/// Any response, whatever its status, is `Ok`; `Err` means no response was
/// obtained and should be `ApiError::Transport`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// reqwest-backed transport. No retries and no timeout beyond reqwest's own.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// An `ApiClient`, the transport that executes its requests, and the session
/// whose credential rides along with each of them.
#[derive(Clone)]
pub struct Connection {
    client: ApiClient,
    transport: Arc<dyn Transport>,
    session: Session,
}

impl Connection {
    pub fn new(client: ApiClient, transport: Arc<dyn Transport>, session: Session) -> Self {
        Self {
            client,
            transport,
            session,
        }
    }

    /// Connect to `origin` over HTTP with a fresh, empty session.
    pub fn http(origin: &str) -> Self {
        Self::new(
            ApiClient::new(origin),
            Arc::new(HttpTransport::new()),
            Session::new(),
        )
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Attach the session credential and execute `request`.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.session.attach(&mut request);
        let method = request.method.as_str();
        let path = request.path.clone();
        tracing::debug!(method, %path, "sending request");

        match self.transport.execute(request).await {
            Ok(response) => {
                tracing::debug!(method, %path, status = response.status, "received response");
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(method, %path, error = %err, "request failed");
                Err(err)
            }
        }
    }
}

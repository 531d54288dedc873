//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `ApiClient` holds only the API base URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that reads an
//! `HttpResponse`. The session credential is not the client's concern; the
//! `Connection` attaches it on the way out.
//!
//! Every parse goes through [`decode`], which owns the response rules:
//! non-2xx becomes `ApiError::Http` carrying the server's `error` text,
//! 204 and empty bodies are "no value", anything else is JSON.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthResponse, CreateTodo, ErrorEnvelope, LoginRequest, SessionInfo, SignupRequest, Todo,
    TodoEnvelope, TodoId, TodosEnvelope, UpdateTodo,
};

/// Path prefix every endpoint lives under.
pub const API_BASE: &str = "/api/v1";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Method, extra headers and body for [`ApiClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `payload` as the JSON body.
    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// `origin` is scheme and authority, e.g. `http://localhost:8080`.
    pub fn new(origin: &str) -> Self {
        Self {
            base_url: format!("{}{API_BASE}", origin.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` relative to the API base.
    ///
    /// `content-type: application/json` is always present unless `options`
    /// supplies its own value for it.
    pub fn request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut req = HttpRequest {
            method: options.method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: options.body,
        };
        for (name, value) in &options.headers {
            req.set_header(name, value);
        }
        req
    }

    // --- auth ---

    pub fn build_signup(&self, input: &SignupRequest) -> Result<HttpRequest, ApiError> {
        Ok(self.request("/auth/signup", RequestOptions::new(HttpMethod::Post).json(input)?))
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        Ok(self.request("/auth/login", RequestOptions::new(HttpMethod::Post).json(input)?))
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.request("/auth/logout", RequestOptions::new(HttpMethod::Post))
    }

    pub fn build_me(&self) -> HttpRequest {
        self.request("/me", RequestOptions::default())
    }

    /// Signup and login share the `{user, message?}` body.
    pub fn parse_auth(&self, response: &HttpResponse) -> Result<AuthResponse, ApiError> {
        require_body(decode(response)?)
    }

    pub fn parse_logout(&self, response: &HttpResponse) -> Result<(), ApiError> {
        decode::<IgnoredAny>(response)?;
        Ok(())
    }

    /// Any non-2xx answer means "not logged in", not a failure.
    pub fn parse_me(&self, response: &HttpResponse) -> Result<Option<SessionInfo>, ApiError> {
        if !response.is_success() {
            return Ok(None);
        }
        decode(response)
    }

    // --- todos ---

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request("/todos", RequestOptions::default())
    }

    pub fn build_get_todo(&self, id: TodoId) -> HttpRequest {
        self.request(&format!("/todos/{id}"), RequestOptions::default())
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(self.request("/todos", RequestOptions::new(HttpMethod::Post).json(input)?))
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(self.request(
            &format!("/todos/{id}"),
            RequestOptions::new(HttpMethod::Put).json(input)?,
        ))
    }

    /// Toggle carries no body: the server decides the new state.
    pub fn build_toggle_todo(&self, id: TodoId) -> HttpRequest {
        self.request(&format!("/todos/{id}/toggle"), RequestOptions::new(HttpMethod::Patch))
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(&format!("/todos/{id}"), RequestOptions::new(HttpMethod::Delete))
    }

    /// A missing or null `todos` field, or no body at all, yields an empty list.
    pub fn parse_list_todos(&self, response: &HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let envelope: Option<TodosEnvelope> = decode(response)?;
        Ok(envelope.and_then(|e| e.todos).unwrap_or_default())
    }

    /// Unwrap the `{todo}` envelope of create, get, update and toggle.
    pub fn parse_todo(&self, response: &HttpResponse) -> Result<Todo, ApiError> {
        let envelope: TodoEnvelope = require_body(decode(response)?)?;
        Ok(envelope.todo)
    }

    pub fn parse_delete_todo(&self, response: &HttpResponse) -> Result<(), ApiError> {
        decode::<IgnoredAny>(response)?;
        Ok(())
    }
}

/// Normalize a response into a value, "no value", or an `ApiError`.
///
/// - non-2xx: `ApiError::Http` with the body's `error` field as message, or
///   `Request failed with status <code>` when there is none;
/// - 204 or a blank body: `Ok(None)`, the body is never parsed;
/// - otherwise: the body decoded as `T`.
///
/// There is no schema check beyond what `T`'s `Deserialize` demands.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    if !response.is_success() {
        return Err(http_error(response));
    }
    if response.status == 204 || response.body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn http_error(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));
    ApiError::Http {
        status: response.status,
        message,
    }
}

fn require_body<T>(value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Decode("expected a JSON body, got none".to_string()))
}

//! Client-side data access for the todo service.
//!
//! # Overview
//! Layers, leaf first:
//! - `http` / `client`: requests and responses as plain data; `ApiClient`
//!   builds and parses them without touching the network.
//! - `transport` / `session`: the one I/O seam, and the cookie credential
//!   that `Connection` stamps onto every request.
//! - `services`: one typed method per backend endpoint.
//! - `todos` / `auth`: view state that mirrors server data and reconciles it
//!   after each confirmed mutation.
//!
//! # Design
//! - `ApiClient` is stateless; it holds only the API base URL.
//! - Services never catch errors. The state stores catch at their boundary
//!   and keep the message for display.
//! - Nothing is applied to local state before the server confirms it.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod todos;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use auth::{AuthState, Identity};
pub use client::{decode, ApiClient, RequestOptions, API_BASE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use services::{AuthService, TodoService};
pub use session::Session;
pub use todos::{LoadState, TodoList};
pub use transport::{Connection, HttpTransport, Transport};
pub use types::{
    AuthResponse, CreateTodo, LoginRequest, SessionInfo, SignupRequest, Todo, TodoId, UpdateTodo,
    User, UserId,
};

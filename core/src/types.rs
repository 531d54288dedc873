//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch any
//! schema drift between the two. Identifiers are server-assigned integers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type TodoId = i64;

/// An account as returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A single todo item owned by the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a successful signup or login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Who the current session belongs to, as reported by `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// `{todos, count}` envelope of `GET /todos`. A missing or null `todos`
/// reads as no todos; `count` is redundant with the vector and ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TodosEnvelope {
    #[serde(default)]
    pub todos: Option<Vec<Todo>>,
}

/// `{todo}` envelope shared by create, get, update and toggle.
#[derive(Debug, Deserialize)]
pub(crate) struct TodoEnvelope {
    pub todo: Todo,
}

/// `{error}` envelope of non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

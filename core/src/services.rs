//! Typed endpoint wrappers: one method per backend operation.
//!
//! Services build the request, send it through the `Connection`, and unwrap
//! the response envelope. They never catch errors; deciding what a failure
//! means is left to the state stores above them. The one exception is
//! [`AuthService::me`], where "no session" is an expected answer.

use tracing::instrument;

use crate::error::ApiError;
use crate::transport::Connection;
use crate::types::{
    AuthResponse, CreateTodo, LoginRequest, SessionInfo, SignupRequest, Todo, TodoId, UpdateTodo,
};

/// Signup, login, logout and session lookup.
///
/// Owns the session lifecycle: the credential is stored after a successful
/// signup or login and dropped after a confirmed logout.
#[derive(Clone)]
pub struct AuthService {
    conn: Connection,
}

impl AuthService {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let input = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.conn.client().build_signup(&input)?;
        let response = self.conn.send(request).await?;
        let auth = self.conn.client().parse_auth(&response)?;
        self.conn.session().store_from(&response);
        tracing::info!(user_id = auth.user.id, "signed up");
        Ok(auth)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let input = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.conn.client().build_login(&input)?;
        let response = self.conn.send(request).await?;
        let auth = self.conn.client().parse_auth(&response)?;
        self.conn.session().store_from(&response);
        tracing::info!(user_id = auth.user.id, "logged in");
        Ok(auth)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.conn.send(self.conn.client().build_logout()).await?;
        self.conn.client().parse_logout(&response)?;
        self.conn.session().clear();
        tracing::info!("logged out");
        Ok(())
    }

    /// Who the server thinks we are. Every failure reads as "nobody".
    #[instrument(skip(self))]
    pub async fn me(&self) -> Option<SessionInfo> {
        let response = match self.conn.send(self.conn.client().build_me()).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "session check failed");
                return None;
            }
        };
        match self.conn.client().parse_me(&response) {
            Ok(info) => info,
            Err(err) => {
                tracing::debug!(error = %err, "session check returned an unreadable body");
                None
            }
        }
    }
}

/// CRUD on the current user's todos.
#[derive(Clone)]
pub struct TodoService {
    conn: Connection,
}

impl TodoService {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.conn.send(self.conn.client().build_list_todos()).await?;
        self.conn.client().parse_list_todos(&response)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.conn.send(self.conn.client().build_get_todo(id)).await?;
        self.conn.client().parse_todo(&response)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Todo, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
            description: description.map(str::to_string),
        };
        let request = self.conn.client().build_create_todo(&input)?;
        let response = self.conn.send(request).await?;
        self.conn.client().parse_todo(&response)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: TodoId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.conn.client().build_update_todo(id, changes)?;
        let response = self.conn.send(request).await?;
        self.conn.client().parse_todo(&response)
    }

    #[instrument(skip(self))]
    pub async fn toggle(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.conn.send(self.conn.client().build_toggle_todo(id)).await?;
        self.conn.client().parse_todo(&response)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.conn.send(self.conn.client().build_delete_todo(id)).await?;
        self.conn.client().parse_delete_todo(&response)
    }
}

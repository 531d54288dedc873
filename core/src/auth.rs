//! Authentication view state.
//!
//! `AuthState` mirrors who is logged in. It is filled from signup/login
//! responses or, after a restart, from `GET /me`. A failed session check is
//! the normal "visitor" case and leaves no error behind.

use crate::error::ApiError;
use crate::services::AuthService;
use crate::types::{AuthResponse, SessionInfo, User, UserId};

/// The logged-in user as far as the client knows. `name` is only known when
/// the identity came from signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: Some(user.name),
        }
    }
}

impl From<SessionInfo> for Identity {
    fn from(info: SessionInfo) -> Self {
        Self {
            user_id: info.user_id,
            email: info.email,
            name: None,
        }
    }
}

pub struct AuthState {
    service: AuthService,
    user: Option<Identity>,
    loading: bool,
    error: Option<String>,
}

impl AuthState {
    /// Starts out loading until `check_session` has run.
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            user: None,
            loading: true,
            error: None,
        }
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ask the server who we are. A confirmed identity keeps the name learned
    /// at login; an unconfirmed one is dropped.
    pub async fn check_session(&mut self) -> Option<&Identity> {
        self.loading = true;
        let confirmed = self.service.me().await.map(Identity::from);
        self.loading = false;
        self.user = match (confirmed, self.user.take()) {
            (Some(mut fresh), Some(known)) if known.user_id == fresh.user_id => {
                fresh.name = fresh.name.or(known.name);
                Some(fresh)
            }
            (confirmed, _) => confirmed,
        };
        self.user.as_ref()
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&Identity, ApiError> {
        let result = self.service.signup(name, email, password).await;
        self.accept(result)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Identity, ApiError> {
        let result = self.service.login(email, password).await;
        self.accept(result)
    }

    /// The identity is dropped only once the server confirms.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        match self.service.logout().await {
            Ok(()) => {
                self.user = None;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn accept(&mut self, result: Result<AuthResponse, ApiError>) -> Result<&Identity, ApiError> {
        self.loading = false;
        match result {
            Ok(auth) => {
                self.error = None;
                let user = self.user.insert(Identity::from(auth.user));
                Ok(&*user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "authentication failed");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

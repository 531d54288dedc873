use todo_core::{ApiError, AuthState};

use super::Route;

pub struct Navbar;

impl Navbar {
    pub fn render(auth: &AuthState) -> String {
        let who = auth.user().map(|u| u.email.as_str()).unwrap_or("");
        format!("📝 Todos    {who}")
    }

    /// Log out and, once the server has confirmed, go to the login screen.
    pub async fn logout(auth: &mut AuthState) -> Result<Route, ApiError> {
        auth.logout().await?;
        Ok(Route::Login)
    }
}

use todo_core::AuthState;

pub struct LoginView;

impl LoginView {
    pub fn render(auth: &AuthState) -> String {
        let mut out = String::from(
            "📝 Todos\n\nLog in to see your tasks:\n  login <email> <password>\n  signup <name> <email> <password>",
        );
        if let Some(error) = auth.error() {
            out.push_str(&format!("\n\n! {error}"));
        }
        out
    }
}

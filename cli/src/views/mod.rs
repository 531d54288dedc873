//! Text views: each renders state to a string and forwards user intents to
//! the state stores in `todo_core`. No view talks to a service directly.

mod add_todo_form;
mod dashboard;
mod login;
mod navbar;
mod todo_item;

pub use add_todo_form::AddTodoForm;
pub use dashboard::{Dashboard, TodoIntent};
pub use login::LoginView;
pub use navbar::Navbar;
pub use todo_item::TodoItem;

/// Which screen the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

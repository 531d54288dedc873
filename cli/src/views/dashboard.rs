use todo_core::{AuthState, Todo, TodoId, TodoList, TodoService};

use super::{AddTodoForm, Navbar, TodoItem};

/// What the user asked to do with one todo. Carries only the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoIntent {
    Toggle(TodoId),
    Delete(TodoId),
}

pub struct Dashboard {
    todos: TodoList,
    form: AddTodoForm,
}

impl Dashboard {
    pub async fn mount(service: TodoService) -> Self {
        Self {
            todos: TodoList::mount(service).await,
            form: AddTodoForm::new(),
        }
    }

    /// Fill the form and submit it.
    pub async fn add(&mut self, title: &str, description: Option<&str>) -> Option<Todo> {
        self.form.set_title(title);
        self.form.set_description(description);
        self.form.submit(&mut self.todos).await
    }

    pub async fn dispatch(&mut self, intent: TodoIntent) {
        match intent {
            TodoIntent::Toggle(id) => self.todos.toggle_todo(id).await,
            TodoIntent::Delete(id) => self.todos.delete_todo(id).await,
        }
    }

    pub async fn refresh(&mut self) {
        self.todos.refresh().await;
    }

    pub fn render(&self, auth: &AuthState) -> String {
        let mut lines = vec![Navbar::render(auth), String::new(), "My Tasks".to_string()];
        lines.push(self.form.render());
        lines.push(String::new());

        if self.todos.todos().is_empty() {
            lines.push("No tasks yet".to_string());
            lines.push("Add your first task above!".to_string());
        } else {
            lines.extend(self.todos.todos().iter().map(|t| TodoItem::new(t).render()));
        }

        if let Some(error) = self.todos.error() {
            lines.push(String::new());
            lines.push(format!("! {error}"));
        }
        lines.join("\n")
    }
}

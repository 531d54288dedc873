use todo_core::{Todo, TodoList};

/// Input state for adding a todo.
///
/// Blank titles never reach the server, and neither does a second submit
/// while one is in flight. The typed text survives a failed submit.
#[derive(Debug, Default)]
pub struct AddTodoForm {
    title: String,
    description: String,
    is_adding: bool,
}

impl AddTodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.unwrap_or_default().to_string();
    }

    pub fn can_submit(&self) -> bool {
        !self.is_adding && !self.title.trim().is_empty()
    }

    /// Add the todo through `todos`. `None` when nothing was added, either
    /// because the input was rejected locally or because the server failed;
    /// in the latter case the list holds the error message.
    pub async fn submit(&mut self, todos: &mut TodoList) -> Option<Todo> {
        if !self.can_submit() {
            return None;
        }

        self.is_adding = true;
        let title = self.title.trim().to_string();
        let description = Some(self.description.trim()).filter(|d| !d.is_empty());
        let result = todos.add_todo(&title, description).await;
        self.is_adding = false;

        match result {
            Ok(todo) => {
                self.title.clear();
                self.description.clear();
                Some(todo)
            }
            Err(err) => {
                tracing::debug!(error = %err, "keeping unsaved input");
                None
            }
        }
    }

    pub fn render(&self) -> String {
        if self.title.is_empty() {
            "What needs to be done?  [Add Task]".to_string()
        } else {
            format!("{}  [Add Task]", self.title)
        }
    }
}

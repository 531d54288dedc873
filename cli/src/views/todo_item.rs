use todo_core::Todo;

/// One line (two with a description) per todo.
pub struct TodoItem<'a> {
    todo: &'a Todo,
}

impl<'a> TodoItem<'a> {
    pub fn new(todo: &'a Todo) -> Self {
        Self { todo }
    }

    pub fn render(&self) -> String {
        let mark = if self.todo.completed { 'x' } else { ' ' };
        let mut out = format!("[{mark}] #{:<4} {}", self.todo.id, self.todo.title);
        if let Some(description) = self.todo.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str("\n         ");
            out.push_str(description);
        }
        out
    }
}

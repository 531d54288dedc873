//! In-memory view state for the current user's todo list.
//!
//! # Design
//! `TodoList` holds the authoritative local copy of the list for one view.
//! Every mutation is applied only after the server confirms it, using the
//! entity the server returned; nothing is applied optimistically, so a
//! failure leaves the list exactly as it was and only sets `error`.
//!
//! Responses are applied in completion order with no version check: when two
//! updates to the same todo race, whichever finishes last wins.

use crate::error::ApiError;
use crate::services::TodoService;
use crate::types::{Todo, TodoId, UpdateTodo};

/// Lifecycle of the list's contents. Every refresh passes through `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Todo list state plus the mutators that keep it in sync with the server.
pub struct TodoList {
    service: TodoService,
    todos: Vec<Todo>,
    state: LoadState,
    error: Option<String>,
}

impl TodoList {
    /// An empty, not yet loaded list.
    pub fn new(service: TodoService) -> Self {
        Self {
            service,
            todos: Vec::new(),
            state: LoadState::Idle,
            error: None,
        }
    }

    /// Create the list and run the initial load.
    pub async fn mount(service: TodoService) -> Self {
        let mut list = Self::new(service);
        list.refresh().await;
        list
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the most recent failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload from the server. On failure the previous contents stay.
    pub async fn refresh(&mut self) {
        self.state = LoadState::Loading;
        self.error = None;
        match self.service.list().await {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.todos = todos;
                self.state = LoadState::Ready;
            }
            Err(err) => {
                self.record(&err, "load todos");
                self.state = LoadState::Error;
            }
        }
    }

    /// Create a todo and put it at the top of the list.
    ///
    /// The error is recorded and also returned, so a form can keep the text
    /// the user typed.
    pub async fn add_todo(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, ApiError> {
        match self.service.create(title, description).await {
            Ok(todo) => {
                self.todos.insert(0, todo.clone());
                Ok(todo)
            }
            Err(err) => {
                self.record(&err, "add todo");
                Err(err)
            }
        }
    }

    /// Flip completion on the server and take its version of the todo.
    pub async fn toggle_todo(&mut self, id: TodoId) {
        match self.service.toggle(id).await {
            Ok(updated) => self.replace(updated),
            Err(err) => self.record(&err, "toggle todo"),
        }
    }

    /// Apply `changes` on the server and take its version of the todo.
    pub async fn update_todo(&mut self, id: TodoId, changes: &UpdateTodo) {
        match self.service.update(id, changes).await {
            Ok(updated) => self.replace(updated),
            Err(err) => self.record(&err, "update todo"),
        }
    }

    /// Delete on the server, then drop the todo locally. The request goes
    /// out even when `id` is not in the list.
    pub async fn delete_todo(&mut self, id: TodoId) {
        match self.service.delete(id).await {
            Ok(()) => self.todos.retain(|t| t.id != id),
            Err(err) => self.record(&err, "delete todo"),
        }
    }

    /// Forget everything, e.g. when leaving the dashboard or logging out.
    pub fn clear(&mut self) {
        self.todos.clear();
        self.state = LoadState::Idle;
        self.error = None;
    }

    fn replace(&mut self, updated: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }

    fn record(&mut self, err: &ApiError, action: &str) {
        tracing::warn!(error = %err, "failed to {action}");
        self.error = Some(err.to_string());
    }
}

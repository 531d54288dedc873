//! Scripted transport for view and shell tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todo_core::{ApiClient, ApiError, Connection, HttpRequest, HttpResponse, Session, Transport};

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, status: u16, body: &str) {
        self.push_with_cookie(status, body, None);
    }

    pub fn push_with_cookie(&self, status: u16, body: &str, cookie: Option<&str>) {
        let headers = cookie
            .map(|c| vec![("set-cookie".to_string(), c.to_string())])
            .unwrap_or_default();
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            headers,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no scripted response".to_string()))
    }
}

pub(crate) fn scripted() -> (Arc<ScriptedTransport>, Connection) {
    let transport = Arc::new(ScriptedTransport::default());
    let conn = Connection::new(
        ApiClient::new("http://api.test"),
        transport.clone(),
        Session::new(),
    );
    (transport, conn)
}

pub(crate) fn todo_json(id: i64, title: &str, completed: bool) -> String {
    format!(
        r#"{{"id":{id},"user_id":1,"title":"{title}","completed":{completed},"created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}}"#
    )
}

pub(crate) fn list_json(todos: &[String]) -> String {
    format!(r#"{{"todos":[{}],"count":{}}}"#, todos.join(","), todos.len())
}

pub(crate) const AUTH_JSON: &str = r#"{"user":{"id":1,"name":"Ada","email":"ada@example.com","created_at":"2024-01-01T00:00:00Z"},"message":"Login successful"}"#;

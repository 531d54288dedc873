//! Scripted transport shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::{Connection, Transport};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, response: Result<HttpResponse, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.push(Ok(json(status, body)));
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
            .expect("no scripted response left")
    }
}

pub(crate) fn json(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub(crate) fn todo_json(id: i64, title: &str, completed: bool) -> String {
    format!(
        r#"{{"id":{id},"user_id":1,"title":"{title}","completed":{completed},"created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}}"#
    )
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

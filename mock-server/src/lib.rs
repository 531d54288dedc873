//! In-memory stand-in for the todo backend.
//!
//! Serves the REST API under `/api/v1` with cookie sessions, so the client
//! crate can be exercised end to end without a database.

mod error;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use error::AppError;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth_token";

const COOKIE_MAX_AGE: cookie::time::Duration = cookie::time::Duration::hours(24);
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Serialize)]
struct AuthResponse {
    user: User,
    message: &'static str,
}

struct Account {
    user: User,
    password: String,
}

/// Users, live sessions and todos.
#[derive(Default)]
pub struct Store {
    accounts: Vec<Account>,
    sessions: HashMap<String, i64>,
    todos: HashMap<i64, Todo>,
    last_user_id: i64,
    last_todo_id: i64,
}

impl Store {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    fn open_session(&mut self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user_id);
        token
    }

    /// The caller's todo, or `NotFound` for a missing id or someone else's.
    fn owned_todo(&self, id: i64, user_id: i64) -> Result<&Todo, AppError> {
        self.todos
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(AppError::NotFound)
    }

    fn owned_todo_mut(&mut self, id: i64, user_id: i64) -> Result<&mut Todo, AppError> {
        self.todos
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(AppError::NotFound)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/todos/{id}/toggle", patch(toggle_todo));
    Router::new().nest("/api/v1", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .max_age(COOKIE_MAX_AGE)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn expired_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Session token from the `auth_token` cookie, else from a bearer header.
fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    let from_cookie = jar
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

fn authenticate(store: &Store, jar: &CookieJar, headers: &HeaderMap) -> Result<i64, AppError> {
    let token =
        session_token(jar, headers).ok_or(AppError::Unauthorized("authentication required"))?;
    store
        .sessions
        .get(&token)
        .copied()
        .ok_or(AppError::Unauthorized("invalid or expired token"))
}

fn validate_signup(input: &SignupRequest) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if !input.email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

async fn signup(
    State(db): State<Db>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    validate_signup(&input)?;

    let mut store = db.write().await;
    if store.account_by_email(&input.email).is_some() {
        return Err(AppError::Conflict("email already exists"));
    }
    store.last_user_id += 1;
    let user = User {
        id: store.last_user_id,
        name: input.name.trim().to_string(),
        email: input.email,
        created_at: Utc::now(),
    };
    store.accounts.push(Account {
        user: user.clone(),
        password: input.password,
    });
    let token = store.open_session(user.id);
    tracing::info!(user_id = user.id, "account created");

    let body = AuthResponse {
        user,
        message: "Account created successfully",
    };
    Ok((StatusCode::CREATED, jar.add(session_cookie(token)), Json(body)).into_response())
}

async fn login(
    State(db): State<Db>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;

    let mut store = db.write().await;
    let user = store
        .account_by_email(&input.email)
        .filter(|a| a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or(AppError::Unauthorized("invalid credentials"))?;
    let token = store.open_session(user.id);
    tracing::info!(user_id = user.id, "logged in");

    let body = AuthResponse {
        user,
        message: "Login successful",
    };
    Ok((jar.add(session_cookie(token)), Json(body)).into_response())
}

async fn logout(State(db): State<Db>, jar: CookieJar, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&jar, &headers) {
        db.write().await.sessions.remove(&token);
    }
    (StatusCode::NO_CONTENT, jar.add(expired_cookie())).into_response()
}

async fn me(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let store = db.read().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let email = store
        .accounts
        .iter()
        .find(|a| a.user.id == user_id)
        .map(|a| a.user.email.clone())
        .ok_or(AppError::Unauthorized("invalid or expired token"))?;
    Ok(Json(json!({ "user_id": user_id, "email": email })))
}

async fn list_todos(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let store = db.read().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let mut todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    todos.sort_by(|a, b| b.id.cmp(&a.id));
    let count = todos.len();
    Ok(Json(json!({ "todos": todos, "count": count })))
}

async fn create_todo(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let Json(input) = payload?;
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    store.last_todo_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: store.last_todo_id,
        user_id,
        title: title.to_string(),
        description: input.description.filter(|d| !d.trim().is_empty()),
        completed: false,
        created_at: now,
        updated_at: now,
    };
    store.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(json!({ "todo": todo }))))
}

async fn get_todo(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let store = db.read().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let todo = store.owned_todo(id, user_id)?;
    Ok(Json(json!({ "todo": todo })))
}

async fn update_todo(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let Json(input) = payload?;
    let todo = store.owned_todo_mut(id, user_id)?;
    if let Some(title) = input.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        todo.title = title.to_string();
    }
    if let Some(description) = input.description {
        todo.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Utc::now();
    Ok(Json(json!({ "todo": todo })))
}

async fn toggle_todo(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    let todo = store.owned_todo_mut(id, user_id)?;
    todo.completed = !todo.completed;
    todo.updated_at = Utc::now();
    Ok(Json(json!({ "todo": todo })))
}

async fn delete_todo(
    State(db): State<Db>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &jar, &headers)?;
    store.owned_todo(id, user_id)?;
    store.todos.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn token(map: &HeaderMap) -> Option<String> {
        session_token(&CookieJar::from_headers(map), map)
    }

    #[test]
    fn token_is_read_from_cookie_among_others() {
        let map = headers(&[(header::COOKIE, "theme=dark; auth_token=abc; lang=en")]);
        assert_eq!(token(&map).as_deref(), Some("abc"));
    }

    #[test]
    fn bearer_header_is_the_fallback() {
        let map = headers(&[
            (header::COOKIE, "auth_token="),
            (header::AUTHORIZATION, "Bearer xyz"),
        ]);
        assert_eq!(token(&map).as_deref(), Some("xyz"));
        assert_eq!(token(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookies_carry_lifetime() {
        let live = session_cookie("abc".to_string());
        assert_eq!(live.name(), AUTH_COOKIE);
        assert_eq!(live.value(), "abc");
        assert_eq!(live.max_age(), Some(COOKIE_MAX_AGE));
        assert_eq!(live.http_only(), Some(true));
        assert_eq!(live.path(), Some("/"));

        let expired = expired_cookie().to_string();
        assert!(expired.starts_with("auth_token=;"));
        assert!(expired.contains("Max-Age=0"));
    }

    #[test]
    fn owned_todo_hides_other_users_entries() {
        let mut store = Store::default();
        let now = Utc::now();
        store.todos.insert(
            1,
            Todo {
                id: 1,
                user_id: 7,
                title: "mine".to_string(),
                description: None,
                completed: false,
                created_at: now,
                updated_at: now,
            },
        );
        assert_eq!(store.owned_todo(1, 7).unwrap().title, "mine");
        assert!(matches!(store.owned_todo(1, 8), Err(AppError::NotFound)));
        assert!(matches!(store.owned_todo(2, 7), Err(AppError::NotFound)));
    }

    #[test]
    fn authenticate_distinguishes_missing_and_unknown_tokens() {
        let mut store = Store::default();
        let token = store.open_session(7);

        let none = HeaderMap::new();
        let err = authenticate(&store, &CookieJar::from_headers(&none), &none).unwrap_err();
        assert_eq!(err.to_string(), "authentication required");

        let unknown = headers(&[(header::COOKIE, "auth_token=nope")]);
        let err = authenticate(&store, &CookieJar::from_headers(&unknown), &unknown).unwrap_err();
        assert_eq!(err.to_string(), "invalid or expired token");

        let cookie = format!("auth_token={token}");
        let known = headers(&[(header::COOKIE, cookie.as_str())]);
        let jar = CookieJar::from_headers(&known);
        assert_eq!(authenticate(&store, &jar, &known).unwrap(), 7);
    }

    #[test]
    fn signup_validation() {
        let mut input = SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(validate_signup(&input).is_ok());

        input.password = "short".to_string();
        assert!(validate_signup(&input).is_err());

        input.password = "secret1".to_string();
        input.email = "not-an-email".to_string();
        assert!(validate_signup(&input).is_err());

        input.email = "ada@example.com".to_string();
        input.name = "   ".to_string();
        assert!(validate_signup(&input).is_err());
    }

    #[test]
    fn todo_omits_missing_description() {
        let now = Utc::now();
        let todo = Todo {
            id: 1,
            user_id: 1,
            title: "Test".to_string(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["completed"], false);
    }
}

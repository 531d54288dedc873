//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the services and the
//! state stores over real HTTP through `HttpTransport`. Validates that
//! request building, the session cookie, and response parsing agree with
//! the actual server.

use todo_core::{
    ApiError, AuthService, AuthState, Connection, LoadState, TodoList, TodoService, UpdateTodo,
};

/// Start the mock server on a random port and return its origin.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn signup_then_me_returns_same_identity() {
    let conn = Connection::http(&start_server());
    let auth = AuthService::new(conn.clone());

    assert!(auth.me().await.is_none(), "fresh session must be anonymous");

    let signed_up = auth
        .signup("Ada", "ada@example.com", "secret1")
        .await
        .unwrap();
    assert!(conn.session().is_active());

    let me = auth.me().await.expect("session after signup");
    assert_eq!(me.user_id, signed_up.user.id);
    assert_eq!(me.email, signed_up.user.email);

    auth.logout().await.unwrap();
    assert!(!conn.session().is_active());
    assert!(auth.me().await.is_none());
}

#[tokio::test]
async fn login_surfaces_server_error_verbatim() {
    let conn = Connection::http(&start_server());
    let auth = AuthService::new(conn);
    auth.signup("Bob", "bob@example.com", "secret1").await.unwrap();
    auth.logout().await.unwrap();

    let err = auth.login("bob@example.com", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
    assert_eq!(err.to_string(), "invalid credentials");

    let ok = auth.login("bob@example.com", "secret1").await.unwrap();
    assert_eq!(ok.message.as_deref(), Some("Login successful"));
}

#[tokio::test]
async fn todo_list_lifecycle() {
    let conn = Connection::http(&start_server());
    let mut auth = AuthState::new(AuthService::new(conn.clone()));
    auth.signup("Cy", "cy@example.com", "secret1").await.unwrap();

    // Step 1: mount, empty.
    let mut list = TodoList::mount(TodoService::new(conn.clone())).await;
    assert_eq!(list.state(), LoadState::Ready);
    assert!(list.todos().is_empty());

    // Step 2: add two; newest is on top.
    let first = list.add_todo("Integration test", None).await.unwrap();
    let second = list.add_todo("Second", Some("with notes")).await.unwrap();
    assert_eq!(list.todos().len(), 2);
    assert_eq!(list.todos()[0].id, second.id);
    assert_eq!(list.todos()[0].description.as_deref(), Some("with notes"));

    // Step 3: toggle takes the server's entity.
    list.toggle_todo(first.id).await;
    let toggled = list.todos().iter().find(|t| t.id == first.id).unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at >= first.updated_at);

    // Step 4: update title.
    let changes = UpdateTodo {
        title: Some("Renamed".to_string()),
        ..UpdateTodo::default()
    };
    list.update_todo(second.id, &changes).await;
    assert_eq!(list.todos()[0].title, "Renamed");

    // Step 5: single fetch agrees with the local copy.
    let fetched = TodoService::new(conn.clone()).get(first.id).await.unwrap();
    assert!(fetched.completed);

    // Step 6: delete.
    list.delete_todo(first.id).await;
    assert_eq!(list.todos().len(), 1);
    assert_eq!(list.error(), None);

    // Step 7: deleting again fails on the server and changes nothing locally.
    list.delete_todo(first.id).await;
    assert_eq!(list.todos().len(), 1);
    assert_eq!(list.error(), Some("resource not found"));

    // Step 8: refresh agrees with local state.
    list.refresh().await;
    assert_eq!(list.todos().len(), 1);
    assert_eq!(list.todos()[0].id, second.id);

    // Step 9: after logout the list can no longer load.
    auth.logout().await.unwrap();
    list.refresh().await;
    assert_eq!(list.state(), LoadState::Error);
    assert_eq!(list.error(), Some("authentication required"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let conn = Connection::http(&format!("http://{addr}"));
    let mut list = TodoList::mount(TodoService::new(conn)).await;
    assert_eq!(list.state(), LoadState::Error);
    assert!(list.error().unwrap().starts_with("network error"));
    list.dismiss_error();
    assert_eq!(list.error(), None);
}

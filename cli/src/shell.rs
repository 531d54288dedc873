//! The interactive loop: routes between the login screen and the dashboard
//! and turns commands into view calls.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use todo_core::{ApiError, AuthService, AuthState, Connection, TodoService};

use crate::command::{self, Command, HELP};
use crate::views::{Dashboard, LoginView, Navbar, Route, TodoIntent};

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Shell {
    conn: Connection,
    auth: AuthState,
    /// Present exactly while the dashboard route is active.
    dashboard: Option<Dashboard>,
}

impl Shell {
    pub fn new(conn: Connection) -> Self {
        let auth = AuthState::new(AuthService::new(conn.clone()));
        Self {
            conn,
            auth,
            dashboard: None,
        }
    }

    pub fn route(&self) -> Route {
        if self.dashboard.is_some() {
            Route::Dashboard
        } else {
            Route::Login
        }
    }

    /// Restore a previous session if the server still knows us.
    pub async fn start(&mut self) -> String {
        if self.auth.check_session().await.is_some() {
            self.open_dashboard().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        match &self.dashboard {
            Some(dashboard) => dashboard.render(&self.auth),
            None => LoginView::render(&self.auth),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        let output = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => HELP.to_string(),
            Command::Whoami => match self.auth.check_session().await {
                Some(user) => format!("logged in as {} (user {})", user.email, user.user_id),
                None => {
                    self.navigate(Route::Login);
                    format!("not logged in\n\n{}", self.render())
                }
            },
            Command::Signup {
                name,
                email,
                password,
            } => {
                let result = self.auth.signup(&name, &email, &password).await.map(|_| ());
                self.authenticated(result).await
            }
            Command::Login { email, password } => {
                let result = self.auth.login(&email, &password).await.map(|_| ());
                self.authenticated(result).await
            }
            Command::Logout => match Navbar::logout(&mut self.auth).await {
                Ok(route) => {
                    self.navigate(route);
                    self.render()
                }
                Err(err) => format!("{}\n\n! logout failed: {err}", self.render()),
            },
            Command::Add { title, description } => {
                let Some(dashboard) = self.dashboard.as_mut() else {
                    return Flow::Continue("log in first".to_string());
                };
                dashboard.add(&title, description.as_deref()).await;
                self.render()
            }
            Command::Toggle(id) => self.dispatch(TodoIntent::Toggle(id)).await,
            Command::Delete(id) => self.dispatch(TodoIntent::Delete(id)).await,
            Command::Refresh => {
                let Some(dashboard) = self.dashboard.as_mut() else {
                    return Flow::Continue("log in first".to_string());
                };
                dashboard.refresh().await;
                self.render()
            }
        };
        Flow::Continue(output)
    }

    async fn dispatch(&mut self, intent: TodoIntent) -> String {
        match self.dashboard.as_mut() {
            Some(dashboard) => {
                dashboard.dispatch(intent).await;
                self.render()
            }
            None => "log in first".to_string(),
        }
    }

    async fn authenticated(&mut self, result: Result<(), ApiError>) -> String {
        match result {
            Ok(()) => {
                self.open_dashboard().await;
                self.render()
            }
            // The login screen already shows the auth error.
            Err(err) if self.dashboard.is_some() => format!("{}\n\n! {err}", self.render()),
            Err(_) => self.render(),
        }
    }

    async fn open_dashboard(&mut self) {
        self.dashboard = Some(Dashboard::mount(TodoService::new(self.conn.clone())).await);
    }

    fn navigate(&mut self, route: Route) {
        if route == Route::Login {
            // Leaving the dashboard drops its list.
            self.dashboard = None;
        }
    }
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(shell: &mut Shell) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", shell.start().await)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let prompt = match shell.route() {
            Route::Login => "login",
            Route::Dashboard => "todos",
        };
        write!(stdout, "\n{prompt}> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };
        match shell.execute(command).await {
            Flow::Continue(output) => writeln!(stdout, "{output}")?,
            Flow::Quit => break,
        }
    }
    Ok(())
}

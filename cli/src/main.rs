//! Terminal client for the todo service.

mod command;
mod shell;
mod views;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use todo_core::Connection;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todo", version, about = "Todo list in your terminal")]
struct Cli {
    /// Server origin; the API is served under /api/v1
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:8080")]
    server: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(server = %cli.server, "starting");

    let mut shell = shell::Shell::new(Connection::http(&cli.server));
    shell::run(&mut shell).await
}

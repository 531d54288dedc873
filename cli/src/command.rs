//! Parsing shell input into commands.

use thiserror::Error;
use todo_core::TodoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup {
        name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Whoami,
    /// Title is passed through untrimmed; the form decides what is empty.
    Add {
        title: String,
        description: Option<String>,
    },
    Toggle(TodoId),
    Delete(TodoId),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a todo id")]
    InvalidId(String),
}

pub const HELP: &str = "\
commands:
  signup <name> <email> <password>   create an account and log in
  login <email> <password>           log in
  whoami                             ask the server who you are
  logout                             end the session
  add <title> [| <description>]      add a task
  toggle <id>                        mark a task done / not done
  delete <id>                        remove a task
  refresh                            reload tasks from the server
  help                               show this text
  quit                               leave";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    match word.to_ascii_lowercase().as_str() {
        "signup" => {
            // The name may contain spaces; email and password are the last two words.
            if args.len() < 3 {
                return Err(CommandError::Usage("signup <name> <email> <password>"));
            }
            let (name, creds) = args.split_at(args.len() - 2);
            Ok(Command::Signup {
                name: name.join(" "),
                email: creds[0].to_string(),
                password: creds[1].to_string(),
            })
        }
        "login" => match args.as_slice() {
            [email, password] => Ok(Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(CommandError::Usage("login <email> <password>")),
        },
        "logout" => Ok(Command::Logout),
        "whoami" | "me" => Ok(Command::Whoami),
        "add" => {
            let (title, description) = match rest.split_once('|') {
                Some((title, description)) => {
                    let description = description.trim();
                    (title, Some(description.to_string()).filter(|d| !d.is_empty()))
                }
                None => (rest, None),
            };
            Ok(Command::Add {
                title: title.to_string(),
                description,
            })
        }
        "toggle" | "done" => Ok(Command::Toggle(parse_id(&args, "toggle <id>")?)),
        "delete" | "rm" => Ok(Command::Delete(parse_id(&args, "delete <id>")?)),
        "refresh" | "ls" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_id(args: &[&str], usage: &'static str) -> Result<TodoId, CommandError> {
    match args {
        [id] => {
            let id = id.trim_start_matches('#');
            id.parse().map_err(|_| CommandError::InvalidId(id.to_string()))
        }
        _ => Err(CommandError::Usage(usage)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_name_may_have_spaces() {
        let cmd = parse("signup Ada Lovelace ada@example.com secret1").unwrap();
        assert_eq!(
            cmd,
            Command::Signup {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );
    }

    #[test]
    fn signup_needs_three_parts() {
        assert_eq!(
            parse("signup ada@example.com secret1"),
            Err(CommandError::Usage("signup <name> <email> <password>"))
        );
    }

    #[test]
    fn login_takes_exactly_two_arguments() {
        assert!(matches!(parse("login a@b.c pw"), Ok(Command::Login { .. })));
        assert!(parse("login a@b.c").is_err());
    }

    #[test]
    fn add_splits_description_on_pipe() {
        assert_eq!(
            parse("add Buy milk | two litres").unwrap(),
            Command::Add {
                title: "Buy milk ".to_string(),
                description: Some("two litres".to_string()),
            }
        );
        assert_eq!(
            parse("add Buy milk |   ").unwrap(),
            Command::Add {
                title: "Buy milk ".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn add_with_blank_title_still_parses() {
        assert_eq!(
            parse("add    ").unwrap(),
            Command::Add {
                title: "   ".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn ids_accept_hash_prefix() {
        assert_eq!(parse("toggle #12").unwrap(), Command::Toggle(12));
        assert_eq!(parse("rm 3").unwrap(), Command::Delete(3));
        assert_eq!(parse("delete abc"), Err(CommandError::InvalidId("abc".to_string())));
        assert_eq!(parse("toggle"), Err(CommandError::Usage("toggle <id>")));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse("frobnicate"), Err(CommandError::Unknown("frobnicate".to_string())));
        assert_eq!(parse("QUIT").unwrap(), Command::Quit);
    }
}

//! Interactive session.
//!
//! Unlike the one-shot commands, the shell keeps one `TodoApp` alive, so
//! toggles and title edits (which never reach the server) persist until the
//! user quits or signs out.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use tick_core::auth::AuthBackend;
use tick_core::session::AuthMode;
use tick_core::store::KeyValueStore;
use tick_core::todos::TodoBackend;
use tick_core::{StatusFilter, TodoApp};

use crate::commands::common::{
    format_header, format_note_lines, format_view_summary, open_app, parse_position,
};
use crate::error::CliError;

const SHELL_HELP: &str = "\
Commands:
  login <email> <password>
  register <username> <email> <password> <confirm>
  logout
  mode login|register
  list
  refresh
  add <title...>
  edit <n> <title...>
  toggle <n>
  delete <n>
  filter all|todo|done
  search [text...]
  help
  quit";

const SIGN_IN_FIRST: &str = "Sign in first with 'login <email> <password>'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login {
        email: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
        confirm_password: String,
    },
    Logout,
    Mode(AuthMode),
    List,
    Refresh,
    Add(String),
    Edit {
        index: usize,
        title: String,
    },
    Toggle(usize),
    Delete(usize),
    Filter(StatusFilter),
    Search(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(Vec<String>),
    Quit,
}

impl ShellOutcome {
    fn say(line: impl Into<String>) -> Self {
        Self::Continue(vec![line.into()])
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args = words.collect::<Vec<_>>();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("login", [email, password]) => ShellCommand::Login {
            email: (*email).to_string(),
            password: (*password).to_string(),
        },
        ("login", _) => return Err("usage: login <email> <password>".to_string()),
        ("register", [username, email, password, confirm]) => ShellCommand::Register {
            username: (*username).to_string(),
            email: (*email).to_string(),
            password: (*password).to_string(),
            confirm_password: (*confirm).to_string(),
        },
        ("register", _) => {
            return Err("usage: register <username> <email> <password> <confirm>".to_string())
        }
        ("logout", []) => ShellCommand::Logout,
        ("mode", [mode]) => match mode.to_ascii_lowercase().as_str() {
            "login" => ShellCommand::Mode(AuthMode::Login),
            "register" => ShellCommand::Mode(AuthMode::Register),
            _ => return Err("usage: mode login|register".to_string()),
        },
        ("list" | "ls", []) => ShellCommand::List,
        ("refresh" | "sync", []) => ShellCommand::Refresh,
        ("add" | "new", []) => return Err("usage: add <title...>".to_string()),
        ("add" | "new", title) => ShellCommand::Add(title.join(" ")),
        ("edit", [position, title @ ..]) if !title.is_empty() => ShellCommand::Edit {
            index: parse_position(position)?,
            title: title.join(" "),
        },
        ("edit", _) => return Err("usage: edit <n> <title...>".to_string()),
        ("toggle" | "done", [position]) => ShellCommand::Toggle(parse_position(position)?),
        ("delete" | "rm", [position]) => ShellCommand::Delete(parse_position(position)?),
        ("filter", [filter]) => ShellCommand::Filter(filter.parse()?),
        ("search", text) => ShellCommand::Search(text.join(" ")),
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        (
            "logout" | "list" | "ls" | "refresh" | "sync" | "toggle" | "done" | "delete" | "rm"
            | "filter" | "mode",
            _,
        ) => return Err(format!("Wrong arguments for '{verb}'. Type 'help'.")),
        _ => return Err(format!("Unknown command '{verb}'. Type 'help'.")),
    };

    Ok(Some(command))
}

/// Apply one command to the app and describe the result.
pub async fn execute<A, K, B>(app: &mut TodoApp<A, K, B>, command: ShellCommand) -> ShellOutcome
where
    A: AuthBackend,
    K: KeyValueStore,
    B: TodoBackend,
{
    let needs_session = !matches!(
        command,
        ShellCommand::Login { .. }
            | ShellCommand::Register { .. }
            | ShellCommand::Mode(_)
            | ShellCommand::Help
            | ShellCommand::Quit
            | ShellCommand::Logout
    );
    if needs_session && !app.session().is_logged_in() {
        return ShellOutcome::say(SIGN_IN_FIRST);
    }

    match command {
        ShellCommand::Login { email, password } => {
            if app.login(&email, &password).await {
                let mut lines = vec![format_header(app)];
                lines.extend(render_list(app));
                ShellOutcome::Continue(lines)
            } else {
                ShellOutcome::say(session_error(app))
            }
        }
        ShellCommand::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            if app.session().is_logged_in() {
                return ShellOutcome::say("Sign out before registering a new account.");
            }
            app.switch_mode(AuthMode::Register);
            if app
                .register(&username, &email, &password, &confirm_password)
                .await
            {
                app.switch_mode(AuthMode::Login);
                ShellOutcome::say(format!(
                    "Registered {email}. Now sign in with 'login <email> <password>'."
                ))
            } else {
                ShellOutcome::say(session_error(app))
            }
        }
        ShellCommand::Logout => {
            app.logout();
            ShellOutcome::say("Signed out.")
        }
        ShellCommand::Mode(mode) => {
            if app.session().is_logged_in() {
                return ShellOutcome::say("Already signed in.");
            }
            app.switch_mode(mode);
            ShellOutcome::say(match mode {
                AuthMode::Login => "Login mode.",
                AuthMode::Register => "Register mode.",
            })
        }
        ShellCommand::List => ShellOutcome::Continue(render_list(app)),
        ShellCommand::Refresh => {
            let count = app.refresh().await;
            let mut lines = vec![format!("Fetched {count} note(s) from the server.")];
            lines.extend(render_list(app));
            ShellOutcome::Continue(lines)
        }
        ShellCommand::Add(title) => {
            app.notes_mut().start_create();
            if app.create_or_update(&title).await {
                ShellOutcome::Continue(render_list(app))
            } else {
                ShellOutcome::say("The server rejected the note; see log output.")
            }
        }
        ShellCommand::Edit { index, title } => {
            if !app.notes_mut().start_edit(index) {
                return ShellOutcome::say(no_such_note(index));
            }
            if app.create_or_update(&title).await {
                ShellOutcome::Continue(render_list(app))
            } else {
                app.notes_mut().cancel_edit();
                ShellOutcome::say("A note title cannot be empty.")
            }
        }
        ShellCommand::Toggle(index) => {
            if app.toggle_done(index) {
                ShellOutcome::Continue(render_list(app))
            } else {
                ShellOutcome::say(no_such_note(index))
            }
        }
        ShellCommand::Delete(index) => {
            let Some(id) = app.notes().get(index).map(|note| note.id.clone()) else {
                return ShellOutcome::say(no_such_note(index));
            };
            if app.delete(&id).await {
                ShellOutcome::Continue(render_list(app))
            } else {
                ShellOutcome::say(format!("Could not delete note {id}."))
            }
        }
        ShellCommand::Filter(filter) => {
            app.notes_mut().set_filter(filter);
            ShellOutcome::Continue(render_list(app))
        }
        ShellCommand::Search(text) => {
            app.notes_mut().set_search(&text);
            ShellOutcome::Continue(render_list(app))
        }
        ShellCommand::Help => ShellOutcome::say(SHELL_HELP),
        ShellCommand::Quit => ShellOutcome::Quit,
    }
}

fn render_list<A: AuthBackend, K: KeyValueStore, B: TodoBackend>(
    app: &TodoApp<A, K, B>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(summary) = format_view_summary(app.notes().view()) {
        lines.push(summary);
    }
    lines.extend(format_note_lines(
        &app.notes().visible_entries(),
        app.notes().len(),
    ));
    lines
}

fn session_error<A: AuthBackend, K: KeyValueStore, B: TodoBackend>(
    app: &TodoApp<A, K, B>,
) -> String {
    app.session()
        .error()
        .unwrap_or("Request failed.")
        .to_string()
}

fn no_such_note(index: usize) -> String {
    format!("No note number {}.", index + 1)
}

fn prompt<A: AuthBackend, K: KeyValueStore, B: TodoBackend>(app: &TodoApp<A, K, B>) -> String {
    match app.session().mode() {
        None => "tick> ".to_string(),
        Some(AuthMode::Login) => "tick (login)> ".to_string(),
        Some(AuthMode::Register) => "tick (register)> ".to_string(),
    }
}

pub async fn run_shell(api_base: Option<String>) -> Result<(), CliError> {
    let mut app = open_app(api_base)?;
    if app.restore().await {
        println!("{}", format_header(&app));
        for line in render_list(&app) {
            println!("{line}");
        }
    } else {
        println!("{SIGN_IN_FIRST} Type 'help' for commands.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", prompt(&app));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = match parse_shell_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match execute(&mut app, command).await {
            ShellOutcome::Continue(output) => {
                for line in output {
                    println!("{line}");
                }
            }
            ShellOutcome::Quit => break,
        }
    }

    Ok(())
}

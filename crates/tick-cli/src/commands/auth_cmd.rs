use tick_core::session::AuthMode;

use crate::cli::AuthCommands;
use crate::commands::common::{format_header, open_app};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, api_base: Option<String>) -> Result<(), CliError> {
    let mut app = open_app(api_base)?;

    match command {
        AuthCommands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            app.switch_mode(AuthMode::Register);
            if !app
                .register(&username, &email, &password, &confirm_password)
                .await
            {
                return Err(auth_failure(app.session().error()));
            }
            println!("Registered {email}. Sign in with `tick auth login`.");
        }
        AuthCommands::Login { email, password } => {
            if !app.login(&email, &password).await {
                return Err(auth_failure(app.session().error()));
            }
            println!("{}", format_header(&app));
            println!("{} note(s) on the server", app.notes().len());
        }
        AuthCommands::Status => {
            // Identity only; no list round-trip needed.
            if app.restore_session() {
                println!("{}", format_header(&app));
            } else {
                println!("Not signed in.");
            }
        }
        AuthCommands::Logout => {
            let was_signed_in = app.restore_session();
            app.logout();
            if was_signed_in {
                println!("Signed out.");
            } else {
                println!("No stored session; cleared credentials anyway.");
            }
        }
    }

    Ok(())
}

fn auth_failure(message: Option<&str>) -> CliError {
    CliError::Auth(message.unwrap_or("request failed").to_string())
}

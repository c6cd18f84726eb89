//! GoBarber CLI - sign in, sign up and recover passwords from the terminal.
//!
//! The session is kept in the configured storage backend, so a sign-in
//! survives between invocations until `gobarber sign-out`.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gobarber_core::forms::{self, FormOutcome};
use gobarber_core::{ApiClient, AuthProvider, Config, Credentials, ForgotPasswordData, SignUpData, User};

const USAGE: &str = "\
Usage: gobarber <command> [args]

Commands:
  sign-in [email]                        Sign in (password is prompted; defaults
                                         to the last e-mail used)
  sign-up <name> <email>                 Create an account (password is prompted)
  forgot-password <email>                Request a password recovery e-mail
  sign-out                               Forget the stored session
  whoami                                 Show the signed-in user
  update-user <name> <email> [avatar]    Update the signed-in user's profile

Environment:
  GOBARBER_API_URL    Backend address (default http://localhost:3333)
  GOBARBER_STORAGE    Session storage: file, keyring or memory
  RUST_LOG            Log filter, e.g. RUST_LOG=debug";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

enum Command {
    SignIn { email: Option<String> },
    SignUp { name: String, email: String },
    ForgotPassword { email: String },
    SignOut,
    WhoAmI,
    UpdateUser { name: String, email: String, avatar_url: Option<String> },
}

fn parse_args(args: &[String]) -> Option<Command> {
    let arg = |i: usize| args.get(i).cloned();
    let command = match args.first()?.as_str() {
        "sign-in" => Command::SignIn { email: arg(1) },
        "sign-up" => Command::SignUp { name: arg(1)?, email: arg(2)? },
        "forgot-password" => Command::ForgotPassword { email: arg(1)? },
        "sign-out" => Command::SignOut,
        "whoami" => Command::WhoAmI,
        "update-user" => Command::UpdateUser {
            name: arg(1)?,
            email: arg(2)?,
            avatar_url: arg(3),
        },
        _ => return None,
    };
    Some(command)
}

fn prompt_password(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

/// Show a pending indicator on `out` while `fut` runs, like a disabled
/// submit button. The indicator is cosmetic, so write errors are ignored.
async fn pending_on<W: Write, F: std::future::Future>(out: &mut W, label: &str, fut: F) -> F::Output {
    write!(out, "{}...", label).ok();
    out.flush().ok();
    let output = fut.await;
    writeln!(out).ok();
    output
}

async fn with_loading<F: std::future::Future>(label: &str, fut: F) -> F::Output {
    pending_on(&mut io::stderr(), label, fut).await
}

/// Print a form outcome and map it to an exit code
fn report(outcome: &FormOutcome) -> ExitCode {
    match outcome {
        FormOutcome::Invalid(errors) => {
            eprintln!("{}", errors);
            ExitCode::FAILURE
        }
        FormOutcome::Success(toast) => {
            if let Some(toast) = toast {
                println!("{}", toast);
            }
            ExitCode::SUCCESS
        }
        FormOutcome::Failed(toast) => {
            eprintln!("{}", toast);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, mut config: Config) -> Result<ExitCode> {
    let api = ApiClient::new(config.api_base_url()).context("Failed to create API client")?;
    let storage = config.open_storage()?;
    let auth = AuthProvider::new(storage, Arc::new(api.clone()));
    debug!(api = api.base_url(), "Client ready");

    let code = match command {
        Command::SignIn { email } => {
            let email = email
                .or_else(|| config.last_email.clone())
                .context("No e-mail given and none remembered from a previous sign-in")?;
            let password = prompt_password("Password: ")?;
            let credentials = Credentials::new(email, password);
            let outcome = with_loading("Signing in", forms::sign_in(&auth, &credentials)).await;
            if outcome.is_success() {
                if let Some(user) = auth.user() {
                    println!("Signed in as {}", user.display());
                }
                config.last_email = Some(credentials.email);
                config.save().context("Failed to save config")?;
            }
            report(&outcome)
        }
        Command::SignUp { name, email } => {
            let password = prompt_password("Choose a password: ")?;
            let data = SignUpData { name, email, password };
            let outcome = with_loading("Creating account", forms::sign_up(&api, &data)).await;
            report(&outcome)
        }
        Command::ForgotPassword { email } => {
            let data = ForgotPasswordData { email };
            let outcome =
                with_loading("Requesting recovery e-mail", forms::forgot_password(&api, &data)).await;
            report(&outcome)
        }
        Command::SignOut => {
            auth.sign_out();
            println!("Signed out");
            ExitCode::SUCCESS
        }
        Command::WhoAmI => match auth.user() {
            Some(user) => {
                println!("{}", user.display());
                if let Some(ref avatar) = user.avatar_url {
                    println!("avatar: {}", avatar);
                }
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Not signed in");
                ExitCode::FAILURE
            }
        },
        Command::UpdateUser { name, email, avatar_url } => {
            let Some(current) = auth.user() else {
                eprintln!("Not signed in");
                return Ok(ExitCode::FAILURE);
            };
            let user = User {
                name,
                email,
                avatar_url: avatar_url.or_else(|| current.avatar_url.clone()),
                ..current
            };
            if auth.update_user(user) {
                println!("Profile updated");
                ExitCode::SUCCESS
            } else {
                eprintln!("Could not update profile");
                ExitCode::FAILURE
            }
        }
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        return Ok(ExitCode::from(2));
    };

    let config = Config::load()?;
    info!(api = config.api_base_url(), storage = ?config.storage, "GoBarber CLI starting");

    run(command, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(
            parse_args(&args(&["sign-in", "johndoe@example.com"])),
            Some(Command::SignIn { email: Some(ref email) }) if email == "johndoe@example.com"
        ));
        assert!(matches!(parse_args(&args(&["sign-in"])), Some(Command::SignIn { email: None })));
        assert!(matches!(
            parse_args(&args(&["update-user", "John", "j@x.com"])),
            Some(Command::UpdateUser { avatar_url: None, .. })
        ));
        assert!(matches!(parse_args(&args(&["sign-out"])), Some(Command::SignOut)));
    }

    #[tokio::test]
    async fn test_pending_indicator_wraps_output() {
        let mut out = Vec::new();
        let value = pending_on(&mut out, "Signing in", async { 42 }).await;

        assert_eq!(value, 42);
        assert_eq!(String::from_utf8(out).unwrap(), "Signing in...\n");
    }

    #[test]
    fn test_parse_args_rejects_incomplete() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["sign-up", "John"])).is_none());
        assert!(parse_args(&args(&["dashboard"])).is_none());
    }
}

//! Command-line front end: runs one login or registration flow.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::app::AuthApp;
use crate::auth::{AuthAction, AuthState, Credentials, ErrorInfo, User};
use crate::config::Config;
use crate::effects::{Lane, LaneOutcome};
use crate::service::HttpAuthService;

/// Upper bound for waiting on a lane when the request timeout is disabled.
const UNBOUNDED_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Parser)]
#[command(name = "authflow", version, about = "Log in or register against an auth service")]
pub struct Cli {
    /// Config file (default: ~/.config/authflow/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account, then log in with it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

/// Form errors caught before anything is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("'{email}' is not a valid email address")]
    InvalidEmail { email: String },
}

impl Command {
    /// Build the credentials for this command, rejecting incomplete forms.
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        let credentials = match self {
            Command::Login { email, password } => Credentials::login(email.trim(), password.as_str()),
            Command::Register {
                email,
                password,
                first_name,
                last_name,
            } => Credentials {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                ..Credentials::login(email.trim(), password.as_str())
            },
        };
        validate(&credentials)?;
        Ok(credentials)
    }
}

pub fn validate(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.email.is_empty() {
        return Err(ValidationError::MissingField { field: "email" });
    }
    if credentials.password.is_empty() {
        return Err(ValidationError::MissingField { field: "password" });
    }

    let valid_email = credentials
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(ValidationError::InvalidEmail {
            email: credentials.email.clone(),
        });
    }

    Ok(())
}

/// How a flow ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    LoggedIn(User),
    Failed(ErrorInfo),
    /// No terminal state was reached in time.
    Unfinished,
}

impl Report {
    pub fn from_state(state: &AuthState) -> Self {
        match (&state.current_user, &state.error) {
            (Some(user), _) => Report::LoggedIn(user.clone()),
            (None, Some(error)) => Report::Failed(error.clone()),
            (None, None) => Report::Unfinished,
        }
    }

    /// Print the outcome for the user and map it to an exit code.
    pub fn finish(&self) -> ExitCode {
        match self {
            Report::LoggedIn(user) => {
                println!("Logged in as {} <{}>", user.display_name(), user.email);
                ExitCode::SUCCESS
            }
            Report::Failed(error) => {
                eprintln!("Error: {}", error);
                ExitCode::from(1)
            }
            Report::Unfinished => {
                eprintln!("Error: no response from the auth service");
                ExitCode::from(1)
            }
        }
    }
}

/// Run the command described by `cli` against the configured HTTP service.
pub async fn run(cli: Cli) -> anyhow::Result<Report> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let credentials = cli.command.credentials()?;

    let service = HttpAuthService::new(config.service.clone())
        .context("Failed to build HTTP client")?;
    let app = AuthApp::new(Arc::new(service), &config.orchestration)?;

    let wait = config
        .orchestration
        .request_timeout()
        .map(|t| t + Duration::from_secs(1))
        .unwrap_or(UNBOUNDED_WAIT);

    let flow = async {
        match cli.command {
            Command::Login { .. } => {
                app.dispatch(AuthAction::LoginStart { credentials });
                app.settle(Lane::Login, wait).await;
            }
            Command::Register { .. } => {
                app.dispatch(AuthAction::RegisterStart { credentials });
                app.settle(Lane::Register, wait).await;
                if app.last_outcome(Lane::Register) == Some(LaneOutcome::Succeeded) {
                    app.settle(Lane::Login, wait).await;
                }
            }
        }
        Report::from_state(&app.state())
    };

    tokio::select! {
        report = flow => Ok(report),
        _ = tokio::signal::ctrl_c() => {
            app.shutdown();
            anyhow::bail!("Interrupted");
        }
    }
}

//! LetsPark CLI - a command-line client for LetsPark parking reservations.
//!
//! Log in, check recent bookings and reviews, and confirm payments from the
//! terminal. Credentials are kept between runs in the configured token store.

mod app;
mod render;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use letspark_core::{Config, TokenStoreKind};

#[derive(Debug, Parser)]
#[command(name = "letspark", version, about = "Find, book and manage parking from the terminal")]
struct Cli {
    /// Backend base URL (overrides config and LETSPARK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Keep credentials in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the issued tokens
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create a new account
    Signup {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
    },
    /// Show recent bookings and reviews
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Confirm a checkout session after payment
    VerifyPayment { session_id: Option<String> },
    /// Check whether a valid session is available
    Token,
    /// Forget stored credentials
    Logout,
}

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.apply_overrides(cli.base_url.clone(), None);
    if cli.ephemeral {
        config.token_store = TokenStoreKind::Memory;
    }
    config
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli);
    info!(base_url = %config.base_url, store = ?config.token_store, "LetsPark CLI starting");

    let mut app = App::new(config)?;

    match cli.command {
        Command::Login { username } => app.login(username).await,
        Command::Signup { username, email } => app.signup(username, email).await,
        Command::Dashboard { json } => app.dashboard(json).await,
        Command::VerifyPayment { session_id } => app.verify_payment(session_id.as_deref()).await,
        Command::Token => app.check_token().await,
        Command::Logout => app.logout(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

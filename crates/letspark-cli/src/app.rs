//! Command handlers for the LetsPark CLI.
//!
//! `App` wires the configured token store, API client and services together
//! and turns each service result into terminal output and an exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use tracing::{debug, warn};

use letspark_core::{
    ApiClient, AuthService, BookingsView, Config, Credential, DashboardService, LoginForm,
    PaymentService, SessionStore, SignupForm, TokenGuard,
};

use crate::render;

pub struct App {
    config: Config,
    api: ApiClient,
    session: SessionStore,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;
        let session = SessionStore::open(&config)?;
        debug!(has_session = session.has_session(), "Session store ready");

        Ok(Self {
            config,
            api,
            session,
        })
    }

    fn guard(&self) -> TokenGuard {
        TokenGuard::from_config(self.api.clone(), self.session.clone(), &self.config)
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, username: Option<String>) -> Result<ExitCode> {
        let username = match username {
            Some(u) => u,
            None => Self::prompt_username(self.config.last_username.as_deref())?,
        };
        let password = Self::prompt_password("Password: ")?;

        println!("Authenticating...");
        match self.auth().login(&LoginForm::new(username.clone(), password)).await {
            Ok(()) => {
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                println!("Login successful!");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                Ok(ExitCode::FAILURE)
            }
        }
    }

    pub async fn signup(&self, username: String, email: String) -> Result<ExitCode> {
        let password = Self::prompt_password("Password: ")?;
        let confirm_password = Self::prompt_password("Confirm password: ")?;

        let form = SignupForm {
            username,
            email,
            password,
            confirm_password,
        };

        match self.auth().signup(&form).await {
            Ok(()) => {
                println!("Signup successful! Please login.");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                Ok(ExitCode::FAILURE)
            }
        }
    }

    pub fn logout(&self) -> Result<ExitCode> {
        self.auth().logout()?;
        println!("Logged out.");
        Ok(ExitCode::SUCCESS)
    }

    /// Report whether the guard can produce a usable access token
    pub async fn check_token(&self) -> Result<ExitCode> {
        match self.guard().obtain_valid_credential().await {
            Credential::Valid(_) => {
                println!("Session is valid.");
                Ok(ExitCode::SUCCESS)
            }
            Credential::Unavailable => {
                println!("No valid session, please log in.");
                Ok(ExitCode::FAILURE)
            }
        }
    }

    fn prompt_username(last_user: Option<&str>) -> Result<String> {
        match last_user {
            Some(last) => print!("Username [{}]: ", last),
            None => print!("Username: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        Ok(match (input.is_empty(), last_user) {
            (true, Some(last)) => last.to_string(),
            _ => input.to_string(),
        })
    }

    fn prompt_password(prompt: &str) -> Result<String> {
        let password = rpassword::prompt_password(prompt)?;
        Ok(password)
    }

    // =========================================================================
    // Dashboard & payments
    // =========================================================================

    pub async fn dashboard(&self, json: bool) -> Result<ExitCode> {
        let dashboard = DashboardService::new(self.guard()).load().await;

        if json {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        } else {
            render::dashboard(&dashboard);
        }

        Ok(match dashboard.bookings {
            BookingsView::Loaded(_) => ExitCode::SUCCESS,
            BookingsView::NoSession => ExitCode::FAILURE,
        })
    }

    pub async fn verify_payment(&self, session_id: Option<&str>) -> Result<ExitCode> {
        println!("Verifying your payment...");
        match PaymentService::new(self.api.clone()).verify(session_id).await {
            Ok(receipt) => {
                render::receipt(&receipt);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                render::payment_error(&e);
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

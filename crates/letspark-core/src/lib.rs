//! Core library for the LetsPark parking-reservation client.
//!
//! This crate holds everything a front end needs to talk to the LetsPark
//! backend:
//!
//! - `api`: the `ApiClient` and its typed error
//! - `auth`: credential storage, the session token guard and login/signup
//! - `dashboard`: recent bookings and reviews for the signed-in user
//! - `payment`: checkout session verification
//! - `models`: typed request/response shapes
//! - `config`: on-disk configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod payment;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AccessToken, AuthError, AuthService, Credential, LoginForm, RefreshFailurePolicy,
    RefreshToken, SessionStore, SignupForm, TokenGuard, TokenKind, TokenStore, ValidationError,
};
pub use config::{Config, TokenStoreKind};
pub use dashboard::{BookingsView, Dashboard, DashboardError, DashboardService};
pub use payment::{PaymentError, PaymentService};

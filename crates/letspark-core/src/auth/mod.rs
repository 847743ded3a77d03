//! Authentication module for managing credentials and sessions.
//!
//! This module provides:
//! - `TokenStore`: pluggable storage for the access/refresh pair
//!   (`MemoryTokenStore`, `FileTokenStore`, `KeyringTokenStore`)
//! - `SessionStore`: the typed view of the stored pair used everywhere else
//! - `TokenGuard`: hands out an accepted access token, refreshing it once
//!   on a 401
//! - `AuthService`: login, signup and logout
//!
//! Token expiry is never computed locally; the server decides.

pub mod credentials;
pub mod forms;
pub mod guard;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

pub use credentials::KeyringTokenStore;
pub use forms::{LoginForm, SignupForm, ValidationError};
pub use guard::{Credential, RefreshFailurePolicy, TokenGuard};
pub use service::{AuthError, AuthService};
pub use session::{FileTokenStore, SessionStore};
pub use store::{MemoryTokenStore, TokenKind, TokenStore};
pub use token::{AccessToken, RefreshToken};

//! REST API client module for the LetsPark backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! LetsPark API to authenticate, fetch bookings and reviews, and verify
//! payments.
//!
//! Protected endpoints use JWT bearer tokens obtained from the login
//! endpoint and renewed through the token refresh endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

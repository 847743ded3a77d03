//! Data behind the user dashboard: recent bookings and public reviews.
//!
//! Bookings are protected and go through the `TokenGuard` first; reviews
//! are public. A failed fetch is logged and shown as an empty list, only a
//! missing session is reported to the caller.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::ApiClient;
use crate::auth::TokenGuard;
use crate::models::{Booking, Review};

/// Number of most recent bookings shown on the dashboard
pub const RECENT_BOOKINGS_LIMIT: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("No valid session, please log in.")]
    NoSession,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum BookingsView {
    Loaded(Vec<Booking>),
    NoSession,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub bookings: BookingsView,
    pub reviews: Vec<Review>,
}

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
    guard: TokenGuard,
}

impl DashboardService {
    pub fn new(guard: TokenGuard) -> Self {
        Self {
            api: guard.api().clone(),
            guard,
        }
    }

    /// Most recent bookings, newest first
    pub async fn recent_bookings(&self) -> Result<Vec<Booking>, DashboardError> {
        let Some(token) = self.guard.obtain_valid_credential().await.into_token() else {
            error!("No valid token, redirect to login");
            return Err(DashboardError::NoSession);
        };

        match self.api.fetch_user_bookings(&token).await {
            Ok(bookings) => {
                debug!(count = bookings.len(), "Bookings received");
                Ok(most_recent(bookings, RECENT_BOOKINGS_LIMIT))
            }
            Err(e) => {
                error!(error = %e, "Error fetching bookings");
                Ok(Vec::new())
            }
        }
    }

    pub async fn reviews(&self) -> Vec<Review> {
        match self.api.fetch_reviews().await {
            Ok(reviews) => {
                debug!(count = reviews.len(), "Reviews received");
                reviews
            }
            Err(e) => {
                warn!(error = %e, "Error fetching reviews");
                Vec::new()
            }
        }
    }

    /// Fetch bookings and reviews concurrently
    pub async fn load(&self) -> Dashboard {
        let (bookings, reviews) = futures::join!(self.recent_bookings(), self.reviews());

        let bookings = match bookings {
            Ok(bookings) => BookingsView::Loaded(bookings),
            Err(DashboardError::NoSession) => BookingsView::NoSession,
        };

        Dashboard { bookings, reviews }
    }
}

/// Last `limit` items of an oldest-first list, newest first
fn most_recent<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    let start = items.len().saturating_sub(limit);
    let mut recent = items.split_off(start);
    recent.reverse();
    recent
}

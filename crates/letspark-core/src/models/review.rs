use serde::{Deserialize, Serialize};

use super::de;
use crate::utils::excerpt;

/// Number of star slots a rating is drawn with
pub const MAX_STARS: usize = 5;

/// Review text longer than this is shortened in listings
const REVIEW_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Review {
    pub name: String,
    pub created_at: String,
    #[serde(deserialize_with = "de::number_or_string")]
    pub rating: f64,
    pub review: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    pub fn symbol(self) -> char {
        match self {
            Star::Full => '★',
            Star::Half => '⯪',
            Star::Empty => '☆',
        }
    }
}

impl Review {
    /// Star slots for the rating: whole points are full stars, a fractional
    /// remainder adds one half star, the rest are empty.
    pub fn stars(&self) -> [Star; MAX_STARS] {
        let rating = self.rating.clamp(0.0, MAX_STARS as f64);
        let full = rating.floor() as usize;
        let has_half = rating.fract() != 0.0;

        let mut stars = [Star::Empty; MAX_STARS];
        for (i, star) in stars.iter_mut().enumerate() {
            if i < full {
                *star = Star::Full;
            } else if i == full && has_half {
                *star = Star::Half;
            }
        }
        stars
    }

    pub fn stars_display(&self) -> String {
        self.stars().iter().map(|s| s.symbol()).collect()
    }

    pub fn rating_display(&self) -> String {
        format!("{:.1}", self.rating)
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.review, REVIEW_EXCERPT_CHARS)
    }

    /// Upper-cased first letter of the reviewer's name, for avatars
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

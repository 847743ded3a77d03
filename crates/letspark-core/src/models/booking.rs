use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Premise {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Booking {
    pub name: String,
    pub premise: Premise,
    /// Booked duration in hours
    #[serde(deserialize_with = "de::number_or_string")]
    pub duration: f64,
    pub booking_time: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub status: BookingStatus,
}

impl Booking {
    pub fn display_duration(&self) -> String {
        format!("{} hrs", self.duration)
    }
}

/// Booking lifecycle state. Unknown values from the server are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
            BookingStatus::Other(s) => s,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            "pending" => BookingStatus::Pending,
            _ => BookingStatus::Other(s),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_booking() {
        let json = r#"{"id": 7, "name": "Downtown spot", "premise": {"id": 2, "name": "City Garage"}, "duration": 3, "booking_time": "2025-06-01T09:00:00Z", "status": "confirmed"}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.premise.name, "City Garage");
        assert_eq!(booking.duration, 3.0);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.display_duration(), "3 hrs");
    }

    #[test]
    fn test_parse_booking_decimal_string_duration() {
        let json = r#"{"name": "Airport", "premise": {"name": "Lot B"}, "duration": "1.50", "booking_time": "2025-06-01 09:00", "status": "pending"}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.duration, 1.5);
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: BookingStatus = serde_json::from_str(r#""expired""#).unwrap();
        assert_eq!(status, BookingStatus::Other("expired".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""expired""#);
    }
}

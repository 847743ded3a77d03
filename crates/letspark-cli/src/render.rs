//! Plain-text output for dashboard and payment results.

use letspark_core::models::{Booking, PaymentReceipt, Review};
use letspark_core::utils::format_date;
use letspark_core::{BookingsView, Dashboard, DashboardError, PaymentError};

pub fn dashboard(dashboard: &Dashboard) {
    println!("Recent bookings");
    match &dashboard.bookings {
        BookingsView::Loaded(bookings) if bookings.is_empty() => println!("  No bookings yet."),
        BookingsView::Loaded(bookings) => {
            for booking in bookings {
                println!("  {}", booking_line(booking));
            }
        }
        BookingsView::NoSession => println!("  {}", DashboardError::NoSession),
    }

    println!();
    println!("What our customers say");
    if dashboard.reviews.is_empty() {
        println!("  No reviews available.");
    }
    for review in &dashboard.reviews {
        println!("  {}", review_header(review));
        println!("    {}", review.excerpt());
    }
}

fn booking_line(booking: &Booking) -> String {
    format!(
        "{} - {} | {} | {} | {}",
        booking.premise.name,
        booking.name,
        booking.display_duration(),
        booking.booking_time,
        booking.status
    )
}

fn review_header(review: &Review) -> String {
    format!(
        "[{}] {} {} {} ({})",
        review.initial().unwrap_or('?'),
        review.name,
        review.stars_display(),
        review.rating_display(),
        format_date(&review.created_at)
    )
}

pub fn receipt(receipt: &PaymentReceipt) {
    println!("Payment Successful");
    println!("Your {} plan is now active", receipt.plan_id);
    println!();
    println!("  Payment ID:  {}", receipt.payment_id_display());
    println!("  Amount Paid: {}", receipt.amount_display());
    println!("  Plan:        {}", receipt.plan_display());
    if let Some(next) = receipt.next_billing_display() {
        println!("  Next Billing Date: {}", next);
    }
    let status_note = if receipt.is_paid() { "" } else { " (not yet settled)" };
    println!("  Status:      {}{}", receipt.payment_status, status_note);
}

pub fn payment_error(err: &PaymentError) {
    eprintln!("{}", err);
    eprintln!("Re-run `letspark verify-payment <SESSION_ID>` to try again, or `letspark dashboard` to go back.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use letspark_core::models::{BookingStatus, Premise};

    #[test]
    fn test_booking_line() {
        let booking = Booking {
            name: "Morning slot".to_string(),
            premise: Premise {
                name: "City Garage".to_string(),
            },
            duration: 2.5,
            booking_time: "2025-06-01 09:00".to_string(),
            status: BookingStatus::Cancelled,
        };
        assert_eq!(
            booking_line(&booking),
            "City Garage - Morning slot | 2.5 hrs | 2025-06-01 09:00 | cancelled"
        );
    }

    #[test]
    fn test_review_header() {
        let review = Review {
            name: "dave".to_string(),
            created_at: "2025-02-03T10:00:00Z".to_string(),
            rating: 3.0,
            review: "Fine".to_string(),
        };
        assert_eq!(review_header(&review), "[D] dave ★★★☆☆ 3.0 (Feb 03, 2025)");
    }
}

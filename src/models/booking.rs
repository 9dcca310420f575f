//! Booking model
//!
//! A booking is a passenger's seat request against a ride, carrying its own
//! status and payment sub-state. Bookings are owned by the ride aggregate and
//! never shared across rides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub passenger_id: i64,
    pub passenger_name: Option<String>,
    pub seats_requested: i32,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub amount_paid: Option<f64>,
    pub payment_collected_at: Option<DateTime<Utc>>,
    pub requested_at: DateTime<Utc>,
}

impl Booking {
    /// Create a fresh pending booking for a passenger
    pub fn new(
        ride_id: Uuid,
        passenger_id: i64,
        seats_requested: i32,
        passenger_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ride_id,
            passenger_id,
            passenger_name,
            seats_requested,
            status: BookingStatus::Pending,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Pending,
            amount_paid: None,
            payment_collected_at: None,
            requested_at: now,
        }
    }

    /// Number of seats this booking holds once approved; at least one
    pub fn seats_held(&self) -> i32 {
        self.seats_requested.max(1)
    }

    /// Whether the owner has collected payment for this booking
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Removed,
}

impl BookingStatus {
    /// Terminal records are pruned from the ride's active booking map
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Removed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_defaults() {
        let ride_id = Uuid::new_v4();
        let booking = Booking::new(ride_id, 42, 2, Some("Alice".to_string()), Utc::now());

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_method, PaymentMethod::Cash);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.seats_held(), 2);
        assert!(booking.amount_paid.is_none());
        assert!(!booking.is_paid());
    }

    #[test]
    fn test_seats_held_is_at_least_one() {
        let mut booking = Booking::new(Uuid::new_v4(), 1, 0, None, Utc::now());
        booking.seats_requested = 0;
        assert_eq!(booking.seats_held(), 1);
    }

    #[test]
    fn test_status_serializes_in_wire_format() {
        let json = serde_json::to_string(&BookingStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let json = serde_json::to_string(&PaymentMethod::Cash).unwrap();
        assert_eq!(json, "\"CASH\"");
        let status: BookingStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(status, BookingStatus::Approved);
    }
}

//! Ride aggregate model
//!
//! A ride is a scheduled trip offer with fixed seat capacity and price, owned
//! by a vehicle owner. The aggregate owns its booking records and membership
//! sets and is always loaded, mutated and persisted as one unit. All state
//! transitions go through the methods on [`Ride`]; each method validates its
//! preconditions before touching any field, so a failed call leaves the
//! aggregate unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RideConfig;
use crate::models::booking::{Booking, BookingStatus, PaymentStatus};
use crate::utils::errors::{Result, RideLinkError};

/// Ride lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Scheduled => "SCHEDULED",
            RideStatus::InProgress => "IN_PROGRESS",
            RideStatus::Completed => "COMPLETED",
            RideStatus::Canceled => "CANCELED",
        }
    }

    /// Terminal rides accept no further lifecycle transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Canceled)
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RideStatus {
    type Err = RideLinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SCHEDULED" => Ok(RideStatus::Scheduled),
            "IN_PROGRESS" => Ok(RideStatus::InProgress),
            "COMPLETED" => Ok(RideStatus::Completed),
            "CANCELED" => Ok(RideStatus::Canceled),
            other => Err(RideLinkError::InvalidInput(format!(
                "Unknown ride status: {}",
                other
            ))),
        }
    }
}

/// Recognized recurrence tags for recurring rides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringSchedule {
    Daily,
    Weekly,
}

impl RecurringSchedule {
    /// Parse a free-form schedule tag; unrecognized tags mean "no recurrence"
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(RecurringSchedule::Daily),
            "weekly" => Some(RecurringSchedule::Weekly),
            _ => None,
        }
    }

    pub fn interval(&self) -> Duration {
        match self {
            RecurringSchedule::Daily => Duration::days(1),
            RecurringSchedule::Weekly => Duration::days(7),
        }
    }
}

/// Ride aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub owner_id: i64,
    pub owner_name: Option<String>,
    pub owner_contact: Option<String>,
    pub origin: String,
    pub destination: String,
    pub start_time: DateTime<Utc>,
    pub total_seats: i32,
    pub seats_available: i32,
    pub price_per_seat: f64,
    /// Free-form recurrence tag; only "Daily"/"Weekly" trigger rescheduling
    pub schedule: Option<String>,
    pub status: RideStatus,
    /// Legacy flag kept alongside status: true while not completed/canceled
    pub active: bool,
    /// Passenger ids with an unresolved pending booking, in arrival order
    pub requests: Vec<i64>,
    /// Passenger ids with an approved booking
    pub accepted_passengers: Vec<i64>,
    /// Passenger ids whose request was rejected; append-only history
    pub canceled_requests: Vec<i64>,
    /// Active booking per passenger, keyed by passenger id. Terminal records
    /// are pruned; `canceled_requests` is the durable rejection history.
    pub bookings: BTreeMap<i64, Booking>,
    /// Optimistic concurrency token, bumped by the repository on every save
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Ride {
    /// Create a new scheduled ride for an owner
    pub fn new(
        request: CreateRideRequest,
        owner_id: i64,
        owner_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if request.total_seats < 1 {
            return Err(RideLinkError::InvalidInput(
                "Total seats must be at least 1".to_string(),
            ));
        }
        if request.price_per_seat <= 0.0 {
            return Err(RideLinkError::InvalidInput(
                "Price per seat must be positive".to_string(),
            ));
        }
        if request.origin.trim().is_empty() || request.destination.trim().is_empty() {
            return Err(RideLinkError::InvalidInput(
                "Origin and destination are required".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            owner_name,
            owner_contact: request.owner_contact,
            origin: request.origin,
            destination: request.destination,
            start_time: request.start_time,
            total_seats: request.total_seats,
            seats_available: request.total_seats,
            price_per_seat: request.price_per_seat,
            schedule: request.schedule,
            status: RideStatus::Scheduled,
            active: true,
            requests: Vec::new(),
            accepted_passengers: Vec::new(),
            canceled_requests: Vec::new(),
            bookings: BTreeMap::new(),
            version: 0,
            created_at: now,
        })
    }

    /// Recognized recurrence of this ride, if any
    pub fn recurrence(&self) -> Option<RecurringSchedule> {
        self.schedule.as_deref().and_then(RecurringSchedule::parse)
    }

    /// Whether the passenger has an unresolved pending request
    pub fn has_pending_request(&self, passenger_id: i64) -> bool {
        matches!(
            self.bookings.get(&passenger_id),
            Some(b) if b.status == BookingStatus::Pending
        )
    }

    /// Whether the passenger holds an approved booking
    pub fn is_accepted(&self, passenger_id: i64) -> bool {
        matches!(
            self.bookings.get(&passenger_id),
            Some(b) if b.status == BookingStatus::Approved
        )
    }

    /// Total seats currently held by approved bookings
    pub fn approved_seats(&self) -> i32 {
        self.bookings
            .values()
            .filter(|b| b.status == BookingStatus::Approved)
            .map(Booking::seats_held)
            .sum()
    }

    /// Check the seat ledger: available seats stay within bounds and
    /// reconcile with the approved bookings
    pub fn seat_ledger_consistent(&self) -> bool {
        self.seats_available >= 0
            && self.seats_available <= self.total_seats
            && self.total_seats - self.seats_available == self.approved_seats()
            && self
                .requests
                .iter()
                .all(|id| !self.accepted_passengers.contains(id))
    }

    fn assert_ledger(&self) {
        debug_assert!(self.seat_ledger_consistent(), "seat ledger out of balance");
    }

    /// Create or replace a pending booking for a passenger. Seats are not
    /// held during the pending window; they are consumed on acceptance.
    pub fn request_seats(
        &mut self,
        passenger_id: i64,
        seats_requested: i32,
        passenger_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Booking> {
        if passenger_id == self.owner_id {
            return Err(RideLinkError::OwnRideBooking);
        }
        if self.has_pending_request(passenger_id) || self.requests.contains(&passenger_id) {
            return Err(RideLinkError::DuplicateRequest { passenger_id });
        }
        if self.is_accepted(passenger_id) || self.accepted_passengers.contains(&passenger_id) {
            return Err(RideLinkError::AlreadyBooked { passenger_id });
        }
        if seats_requested < 1 {
            return Err(RideLinkError::InvalidSeatCount {
                requested: seats_requested,
            });
        }
        if self.seats_available < seats_requested {
            return Err(RideLinkError::InsufficientSeats {
                available: self.seats_available,
                requested: seats_requested,
            });
        }

        // Drop any stale leftover record before inserting the fresh one
        self.bookings.remove(&passenger_id);
        self.requests.push(passenger_id);
        let booking = Booking::new(self.id, passenger_id, seats_requested, passenger_name, now);
        self.bookings.insert(passenger_id, booking);

        self.assert_ledger();
        Ok(&self.bookings[&passenger_id])
    }

    /// Passenger withdraws their own pending request. Self-cancellation is
    /// not recorded in `canceled_requests`; that history is for rejections.
    pub fn cancel_own_request(&mut self, passenger_id: i64) -> Result<()> {
        if !self.has_pending_request(passenger_id) {
            return Err(RideLinkError::NoPendingRequest { passenger_id });
        }

        self.requests.retain(|id| *id != passenger_id);
        self.bookings.remove(&passenger_id);

        self.assert_ledger();
        Ok(())
    }

    /// Owner accepts a pending request, consuming seats. Returns the number
    /// of seats allocated.
    pub fn accept_request(&mut self, passenger_id: i64) -> Result<i32> {
        if !self.has_pending_request(passenger_id) {
            return Err(RideLinkError::NotInRequests { passenger_id });
        }
        if self.seats_available <= 0 {
            return Err(RideLinkError::NoSeatsAvailable);
        }
        let seats = self
            .bookings
            .get(&passenger_id)
            .map(Booking::seats_held)
            .unwrap_or(1);
        if self.seats_available < seats {
            return Err(RideLinkError::NoSeatsAvailable);
        }

        self.requests.retain(|id| *id != passenger_id);
        self.accepted_passengers.push(passenger_id);
        self.seats_available -= seats;
        if let Some(booking) = self.bookings.get_mut(&passenger_id) {
            booking.status = BookingStatus::Approved;
            booking.payment_status = PaymentStatus::Pending;
        }

        self.assert_ledger();
        Ok(seats)
    }

    /// Owner rejects a pending request. The passenger is appended to the
    /// rejection history; the pending record is discarded.
    pub fn reject_request(&mut self, passenger_id: i64) -> Result<()> {
        if !self.has_pending_request(passenger_id) {
            return Err(RideLinkError::NotInRequests { passenger_id });
        }

        self.requests.retain(|id| *id != passenger_id);
        if !self.canceled_requests.contains(&passenger_id) {
            self.canceled_requests.push(passenger_id);
        }
        self.bookings.remove(&passenger_id);

        self.assert_ledger();
        Ok(())
    }

    /// Owner removes an accepted passenger while the ride has not started.
    /// Returns the number of seats restored.
    pub fn remove_passenger(&mut self, passenger_id: i64) -> Result<i32> {
        if !self.is_accepted(passenger_id) && !self.accepted_passengers.contains(&passenger_id) {
            return Err(RideLinkError::NotAcceptedPassenger { passenger_id });
        }
        if self.status != RideStatus::Scheduled {
            return Err(RideLinkError::RideNotEditable {
                status: self.status,
            });
        }

        let restored = self
            .bookings
            .get(&passenger_id)
            .filter(|b| b.status == BookingStatus::Approved)
            .map(Booking::seats_held)
            .unwrap_or(1);

        self.bookings.remove(&passenger_id);
        self.accepted_passengers.retain(|id| *id != passenger_id);
        self.seats_available += restored;

        self.assert_ledger();
        Ok(restored)
    }

    /// Owner marks payment collected for an approved booking. A booking pays
    /// at most once; repeated collection is rejected.
    pub fn mark_payment_collected(
        &mut self,
        passenger_id: i64,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let booking = self
            .bookings
            .get_mut(&passenger_id)
            .filter(|b| b.status == BookingStatus::Approved)
            .ok_or(RideLinkError::NoApprovedBooking { passenger_id })?;

        if booking.payment_status == PaymentStatus::Completed {
            return Err(RideLinkError::PaymentAlreadyCollected { passenger_id });
        }

        booking.payment_status = PaymentStatus::Completed;
        booking.amount_paid = Some(amount);
        booking.payment_collected_at = Some(now);
        Ok(())
    }

    /// Transition SCHEDULED -> IN_PROGRESS
    pub fn start(&mut self, now: DateTime<Utc>, policy: &RideConfig) -> Result<()> {
        if self.status != RideStatus::Scheduled {
            return Err(RideLinkError::InvalidRideState {
                action: "started",
                status: self.status,
            });
        }
        if policy.enforce_start_window {
            let latest = self.start_time + Duration::minutes(policy.start_window_minutes);
            if now < self.start_time || now > latest {
                return Err(RideLinkError::OutsideStartWindow {
                    scheduled: self.start_time,
                    window_minutes: policy.start_window_minutes,
                });
            }
        }
        if self.accepted_passengers.is_empty() {
            return Err(RideLinkError::NoAcceptedPassengers);
        }

        self.status = RideStatus::InProgress;
        Ok(())
    }

    /// Transition IN_PROGRESS -> COMPLETED
    pub fn complete(&mut self) -> Result<()> {
        if self.status != RideStatus::InProgress {
            return Err(RideLinkError::InvalidRideState {
                action: "ended",
                status: self.status,
            });
        }

        self.status = RideStatus::Completed;
        self.active = false;
        Ok(())
    }

    /// Transition to CANCELED; allowed from any non-completed status
    pub fn cancel(&mut self) -> Result<()> {
        if self.status == RideStatus::Completed {
            return Err(RideLinkError::InvalidRideState {
                action: "canceled",
                status: self.status,
            });
        }

        self.status = RideStatus::Canceled;
        self.active = false;
        Ok(())
    }

    /// Build the next occurrence of a recurring ride: same itinerary, capacity
    /// and price, fresh membership, start time strictly after `now`.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> Option<Ride> {
        let step = self.recurrence()?.interval();
        let mut next_start = self.start_time + step;
        while next_start <= now {
            next_start = next_start + step;
        }

        Some(Ride {
            id: Uuid::new_v4(),
            owner_id: self.owner_id,
            owner_name: self.owner_name.clone(),
            owner_contact: self.owner_contact.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            start_time: next_start,
            total_seats: self.total_seats,
            seats_available: self.total_seats,
            price_per_seat: self.price_per_seat,
            schedule: self.schedule.clone(),
            status: RideStatus::Scheduled,
            active: true,
            requests: Vec::new(),
            accepted_passengers: Vec::new(),
            canceled_requests: Vec::new(),
            bookings: BTreeMap::new(),
            version: 0,
            created_at: now,
        })
    }

    /// Apply a partial update. Absent fields are left unchanged; explicit
    /// invalid values are rejected rather than treated as absent. Validation
    /// runs before any field is written.
    pub fn apply_update(&mut self, patch: &UpdateRideRequest) -> Result<()> {
        if let Some(seats) = patch.total_seats {
            if seats < 1 {
                return Err(RideLinkError::InvalidInput(
                    "Total seats must be at least 1".to_string(),
                ));
            }
            let approved = self.approved_seats();
            if seats < approved {
                return Err(RideLinkError::InvalidInput(format!(
                    "Total seats cannot be less than the {} seats already booked",
                    approved
                )));
            }
        }
        if let Some(price) = patch.price_per_seat {
            if price <= 0.0 {
                return Err(RideLinkError::InvalidInput(
                    "Price per seat must be positive".to_string(),
                ));
            }
        }
        if matches!(&patch.origin, Some(o) if o.trim().is_empty()) {
            return Err(RideLinkError::InvalidInput("Origin cannot be empty".to_string()));
        }
        if matches!(&patch.destination, Some(d) if d.trim().is_empty()) {
            return Err(RideLinkError::InvalidInput(
                "Destination cannot be empty".to_string(),
            ));
        }

        if let Some(origin) = &patch.origin {
            self.origin = origin.clone();
        }
        if let Some(destination) = &patch.destination {
            self.destination = destination.clone();
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(price) = patch.price_per_seat {
            self.price_per_seat = price;
        }
        if let Some(schedule) = &patch.schedule {
            self.schedule = Some(schedule.clone());
        }
        if let Some(contact) = &patch.owner_contact {
            self.owner_contact = Some(contact.clone());
        }
        if let Some(seats) = patch.total_seats {
            self.total_seats = seats;
            self.seats_available = seats - self.approved_seats();
        }

        self.assert_ledger();
        Ok(())
    }
}

/// Request payload for creating a ride
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRideRequest {
    pub origin: String,
    pub destination: String,
    pub start_time: DateTime<Utc>,
    pub total_seats: i32,
    pub price_per_seat: f64,
    pub schedule: Option<String>,
    pub owner_contact: Option<String>,
}

/// Partial update of a ride. `None` leaves the field unchanged; lifecycle
/// status and membership are never updatable through a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRideRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub total_seats: Option<i32>,
    pub price_per_seat: Option<f64>,
    pub schedule: Option<String>,
    pub owner_contact: Option<String>,
}

/// Search filter for ride listings
#[derive(Debug, Clone, Default)]
pub struct RideSearchFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub vehicle_type: Option<String>,
}

/// Read view of a ride enriched with the owner's average rating
#[derive(Debug, Clone, Serialize)]
pub struct RideView {
    #[serde(flatten)]
    pub ride: Ride,
    pub owner_rating: f64,
}

impl RideView {
    pub fn new(ride: Ride, owner_rating: f64) -> Self {
        Self { ride, owner_rating }
    }
}

/// One page of ride views with the total row count
#[derive(Debug, Clone, Serialize)]
pub struct RidePage {
    pub rides: Vec<RideView>,
    pub total: i64,
}

/// A user's rides bucketed by their relationship to them
#[derive(Debug, Clone, Serialize)]
pub struct MyRidesResponse {
    pub approved_rides: Vec<RideView>,
    pub pending_requests: Vec<RideView>,
    pub canceled_rides: Vec<RideView>,
    pub total_approved: i64,
    pub total_pending: i64,
    pub total_canceled: i64,
}

/// Earnings totals per payment method for an owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsSummary {
    pub cash_earnings: f64,
    pub card_earnings: f64,
    pub total_earnings: f64,
    pub cash_payments_count: u32,
    pub card_payments_count: u32,
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    const OWNER: i64 = 100;

    fn relaxed_policy() -> RideConfig {
        RideConfig {
            enforce_start_window: false,
            start_window_minutes: 15,
            auto_reschedule: true,
            max_save_attempts: 3,
        }
    }

    fn windowed_policy() -> RideConfig {
        RideConfig {
            enforce_start_window: true,
            ..relaxed_policy()
        }
    }

    fn test_ride(total_seats: i32) -> Ride {
        Ride::new(
            CreateRideRequest {
                origin: "Colombo".to_string(),
                destination: "Kandy".to_string(),
                start_time: Utc::now(),
                total_seats,
                price_per_seat: 500.0,
                schedule: None,
                owner_contact: None,
            },
            OWNER,
            Some("Owner".to_string()),
            Utc::now(),
        )
        .unwrap()
    }

    fn ride_with_accepted(total_seats: i32, passenger_id: i64, seats: i32) -> Ride {
        let mut ride = test_ride(total_seats);
        ride.request_seats(passenger_id, seats, None, Utc::now()).unwrap();
        ride.accept_request(passenger_id).unwrap();
        ride
    }

    #[test]
    fn test_new_ride_validation() {
        let mut request = CreateRideRequest {
            origin: "Colombo".to_string(),
            destination: "Galle".to_string(),
            start_time: Utc::now(),
            total_seats: 0,
            price_per_seat: 500.0,
            schedule: None,
            owner_contact: None,
        };
        assert_matches!(
            Ride::new(request.clone(), OWNER, None, Utc::now()),
            Err(RideLinkError::InvalidInput(_))
        );

        request.total_seats = 3;
        request.price_per_seat = 0.0;
        assert_matches!(
            Ride::new(request.clone(), OWNER, None, Utc::now()),
            Err(RideLinkError::InvalidInput(_))
        );

        request.price_per_seat = 500.0;
        let ride = Ride::new(request, OWNER, None, Utc::now()).unwrap();
        assert_eq!(ride.status, RideStatus::Scheduled);
        assert_eq!(ride.seats_available, 3);
        assert!(ride.active);
        assert!(ride.seat_ledger_consistent());
    }

    #[test]
    fn test_booking_flow_with_partial_capacity() {
        // 3 seats: A requests 2 (no hold), owner accepts, B cannot get 2,
        // B gets 1, owner rejects B.
        let mut ride = test_ride(3);

        ride.request_seats(1, 2, Some("A".to_string()), Utc::now()).unwrap();
        assert_eq!(ride.seats_available, 3);
        assert!(ride.requests.contains(&1));

        assert_eq!(ride.accept_request(1).unwrap(), 2);
        assert_eq!(ride.seats_available, 1);
        assert!(ride.accepted_passengers.contains(&1));
        assert!(!ride.requests.contains(&1));

        assert_matches!(
            ride.request_seats(2, 2, None, Utc::now()),
            Err(RideLinkError::InsufficientSeats { available: 1, requested: 2 })
        );

        ride.request_seats(2, 1, None, Utc::now()).unwrap();
        assert!(ride.requests.contains(&2));

        ride.reject_request(2).unwrap();
        assert!(!ride.requests.contains(&2));
        assert!(ride.canceled_requests.contains(&2));
        assert_eq!(ride.seats_available, 1);
        assert!(ride.seat_ledger_consistent());
    }

    #[test]
    fn test_request_preconditions() {
        let mut ride = test_ride(3);

        assert_matches!(
            ride.request_seats(OWNER, 1, None, Utc::now()),
            Err(RideLinkError::OwnRideBooking)
        );
        assert_matches!(
            ride.request_seats(1, 0, None, Utc::now()),
            Err(RideLinkError::InvalidSeatCount { requested: 0 })
        );

        ride.request_seats(1, 1, None, Utc::now()).unwrap();
        assert_matches!(
            ride.request_seats(1, 1, None, Utc::now()),
            Err(RideLinkError::DuplicateRequest { passenger_id: 1 })
        );

        ride.accept_request(1).unwrap();
        assert_matches!(
            ride.request_seats(1, 1, None, Utc::now()),
            Err(RideLinkError::AlreadyBooked { passenger_id: 1 })
        );
    }

    #[test]
    fn test_cancel_own_request() {
        let mut ride = test_ride(3);
        ride.request_seats(1, 1, None, Utc::now()).unwrap();

        ride.cancel_own_request(1).unwrap();
        assert!(ride.requests.is_empty());
        assert!(ride.bookings.is_empty());
        // Self-cancellation is not part of the rejection history
        assert!(ride.canceled_requests.is_empty());

        assert_matches!(
            ride.cancel_own_request(1),
            Err(RideLinkError::NoPendingRequest { passenger_id: 1 })
        );
    }

    #[test]
    fn test_accept_unknown_passenger_leaves_ride_unchanged() {
        let mut ride = test_ride(3);
        let before = ride.clone();

        assert_matches!(
            ride.accept_request(7),
            Err(RideLinkError::NotInRequests { passenger_id: 7 })
        );
        assert_eq!(ride.seats_available, before.seats_available);
        assert_eq!(ride.requests, before.requests);
        assert_eq!(ride.accepted_passengers, before.accepted_passengers);
    }

    #[test]
    fn test_last_seat_race_has_one_winner() {
        // Both passengers were allowed to request the last seat; acceptance
        // re-checks availability so only one allocation can land.
        let mut ride = test_ride(1);
        ride.request_seats(1, 1, None, Utc::now()).unwrap();
        ride.request_seats(2, 1, None, Utc::now()).unwrap();

        ride.accept_request(1).unwrap();
        assert_eq!(ride.seats_available, 0);

        assert_matches!(ride.accept_request(2), Err(RideLinkError::NoSeatsAvailable));
        assert_eq!(ride.seats_available, 0);
        assert!(ride.seat_ledger_consistent());
    }

    #[test]
    fn test_remove_passenger_restores_seats() {
        let mut ride = ride_with_accepted(3, 1, 2);
        assert_eq!(ride.seats_available, 1);

        assert_eq!(ride.remove_passenger(1).unwrap(), 2);
        assert_eq!(ride.seats_available, 3);
        assert!(ride.accepted_passengers.is_empty());
        assert!(ride.bookings.is_empty());

        assert_matches!(
            ride.remove_passenger(1),
            Err(RideLinkError::NotAcceptedPassenger { passenger_id: 1 })
        );
    }

    #[test]
    fn test_remove_passenger_blocked_once_started() {
        let mut ride = ride_with_accepted(3, 1, 2);
        ride.start(Utc::now(), &relaxed_policy()).unwrap();

        assert_matches!(
            ride.remove_passenger(1),
            Err(RideLinkError::RideNotEditable { status: RideStatus::InProgress })
        );
        assert_eq!(ride.seats_available, 1);
        assert!(ride.accepted_passengers.contains(&1));
    }

    #[test]
    fn test_mark_payment_collected() {
        let mut ride = ride_with_accepted(3, 1, 2);

        assert_matches!(
            ride.mark_payment_collected(2, 1000.0, Utc::now()),
            Err(RideLinkError::NoApprovedBooking { passenger_id: 2 })
        );

        ride.mark_payment_collected(1, 1000.0, Utc::now()).unwrap();
        let booking = &ride.bookings[&1];
        assert_eq!(booking.payment_status, PaymentStatus::Completed);
        assert_eq!(booking.amount_paid, Some(1000.0));
        assert!(booking.payment_collected_at.is_some());

        assert_matches!(
            ride.mark_payment_collected(1, 1000.0, Utc::now()),
            Err(RideLinkError::PaymentAlreadyCollected { passenger_id: 1 })
        );
    }

    #[test]
    fn test_start_requires_scheduled_status_and_passengers() {
        let mut ride = test_ride(3);
        assert_matches!(ride.start(Utc::now(), &relaxed_policy()), Err(RideLinkError::NoAcceptedPassengers));
        assert_eq!(ride.status, RideStatus::Scheduled);

        let mut ride = ride_with_accepted(3, 1, 1);
        ride.start(Utc::now(), &relaxed_policy()).unwrap();
        assert_eq!(ride.status, RideStatus::InProgress);

        assert_matches!(
            ride.start(Utc::now(), &relaxed_policy()),
            Err(RideLinkError::InvalidRideState { action: "started", status: RideStatus::InProgress })
        );
    }

    #[test]
    fn test_start_window_enforcement() {
        let now = Utc::now();

        let mut ride = ride_with_accepted(3, 1, 1);
        ride.start_time = now + Duration::hours(1);
        assert_matches!(
            ride.start(now, &windowed_policy()),
            Err(RideLinkError::OutsideStartWindow { .. })
        );

        ride.start_time = now - Duration::minutes(20);
        assert_matches!(
            ride.start(now, &windowed_policy()),
            Err(RideLinkError::OutsideStartWindow { .. })
        );

        ride.start_time = now - Duration::minutes(5);
        ride.start(now, &windowed_policy()).unwrap();
        assert_eq!(ride.status, RideStatus::InProgress);
    }

    #[test]
    fn test_complete_only_from_in_progress() {
        let mut ride = test_ride(3);
        assert_matches!(
            ride.complete(),
            Err(RideLinkError::InvalidRideState { action: "ended", status: RideStatus::Scheduled })
        );

        let mut ride = ride_with_accepted(3, 1, 1);
        ride.start(Utc::now(), &relaxed_policy()).unwrap();
        ride.complete().unwrap();
        assert_eq!(ride.status, RideStatus::Completed);
        assert!(!ride.active);

        assert_matches!(ride.complete(), Err(RideLinkError::InvalidRideState { .. }));
    }

    #[test]
    fn test_cancel_from_scheduled_and_in_progress_only() {
        let mut ride = test_ride(3);
        ride.cancel().unwrap();
        assert_eq!(ride.status, RideStatus::Canceled);
        assert!(!ride.active);

        let mut ride = ride_with_accepted(3, 1, 1);
        ride.start(Utc::now(), &relaxed_policy()).unwrap();
        ride.cancel().unwrap();
        assert_eq!(ride.status, RideStatus::Canceled);

        let mut ride = ride_with_accepted(3, 1, 1);
        ride.start(Utc::now(), &relaxed_policy()).unwrap();
        ride.complete().unwrap();
        assert_matches!(
            ride.cancel(),
            Err(RideLinkError::InvalidRideState { action: "canceled", status: RideStatus::Completed })
        );
    }

    #[test]
    fn test_next_occurrence_daily() {
        let now = Utc::now();
        let mut ride = ride_with_accepted(3, 1, 2);
        ride.schedule = Some("Daily".to_string());
        ride.start_time = now - Duration::days(3);

        let next = ride.next_occurrence(now).unwrap();
        assert!(next.start_time > now);
        assert!(next.start_time <= now + Duration::days(1));
        assert_eq!(next.status, RideStatus::Scheduled);
        assert_eq!(next.seats_available, next.total_seats);
        assert!(next.requests.is_empty());
        assert!(next.accepted_passengers.is_empty());
        assert!(next.bookings.is_empty());
        assert_eq!(next.owner_id, ride.owner_id);
        assert_eq!(next.schedule, ride.schedule);
        assert_ne!(next.id, ride.id);
    }

    #[test]
    fn test_next_occurrence_weekly_and_unknown_tags() {
        let now = Utc::now();
        let mut ride = test_ride(3);
        ride.schedule = Some("Weekly".to_string());
        ride.start_time = now - Duration::days(1);

        let next = ride.next_occurrence(now).unwrap();
        assert_eq!(next.start_time, ride.start_time + Duration::days(7));

        ride.schedule = Some("Fortnightly".to_string());
        assert!(ride.next_occurrence(now).is_none());
        ride.schedule = None;
        assert!(ride.next_occurrence(now).is_none());
    }

    #[test]
    fn test_apply_update_patch_semantics() {
        let mut ride = ride_with_accepted(4, 1, 2);

        // Absent fields stay untouched
        ride.apply_update(&UpdateRideRequest::default()).unwrap();
        assert_eq!(ride.origin, "Colombo");
        assert_eq!(ride.total_seats, 4);

        // Explicit invalid values are rejected, not ignored
        assert_matches!(
            ride.apply_update(&UpdateRideRequest {
                price_per_seat: Some(0.0),
                ..Default::default()
            }),
            Err(RideLinkError::InvalidInput(_))
        );
        assert_matches!(
            ride.apply_update(&UpdateRideRequest {
                total_seats: Some(1),
                ..Default::default()
            }),
            Err(RideLinkError::InvalidInput(_))
        );

        // Growing capacity recomputes availability from approved bookings
        ride.apply_update(&UpdateRideRequest {
            total_seats: Some(6),
            origin: Some("Negombo".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ride.total_seats, 6);
        assert_eq!(ride.seats_available, 4);
        assert_eq!(ride.origin, "Negombo");
        assert!(ride.seat_ledger_consistent());
    }

    #[test]
    fn test_failed_update_leaves_ride_unchanged() {
        let mut ride = ride_with_accepted(4, 1, 2);
        let before = ride.clone();

        let result = ride.apply_update(&UpdateRideRequest {
            origin: Some("Matara".to_string()),
            price_per_seat: Some(-10.0),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(ride.origin, before.origin);
        assert_eq!(ride.price_per_seat, before.price_per_seat);
    }

    proptest! {
        #[test]
        fn prop_seat_ledger_holds_under_any_operation_sequence(
            ops in prop::collection::vec((0u8..5u8, 1i64..6i64, 1i32..4i32), 0..60)
        ) {
            let mut ride = test_ride(4);
            for (op, passenger, seats) in ops {
                let _ = match op {
                    0 => ride.request_seats(passenger, seats, None, Utc::now()).map(|_| ()),
                    1 => ride.accept_request(passenger).map(|_| ()),
                    2 => ride.reject_request(passenger),
                    3 => ride.remove_passenger(passenger).map(|_| ()),
                    _ => ride.cancel_own_request(passenger),
                };
                prop_assert!(ride.seat_ledger_consistent());
                prop_assert!(
                    ride.requests.iter().all(|id| !ride.accepted_passengers.contains(id))
                );
            }
        }
    }
}

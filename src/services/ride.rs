//! Ride service implementation
//!
//! This service orchestrates the ride aggregate: it loads one ride, applies a
//! single state transition through the aggregate's methods, and persists the
//! whole aggregate atomically. Saves that lose a concurrent-write race are
//! retried against a fresh copy a bounded number of times. Notifications and
//! rating enrichment are best-effort and never fail the triggering operation.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::database::repositories::{MembershipColumn, RideRepository};
use crate::models::booking::PaymentMethod;
use crate::models::notification::NotificationSeverity;
use crate::models::ride::{
    CreateRideRequest, EarningsSummary, MyRidesResponse, Ride, RidePage, RideSearchFilter,
    RideStatus, RideView, UpdateRideRequest,
};
use crate::services::notification::NotificationService;
use crate::services::review::ReviewService;
use crate::services::user::UserService;
use crate::utils::errors::{Result, RideLinkError};

/// Ride service for offer management, seat booking and the ride lifecycle
#[derive(Clone)]
pub struct RideService {
    ride_repository: RideRepository,
    user_service: UserService,
    review_service: ReviewService,
    notification_service: NotificationService,
    settings: Settings,
}

impl RideService {
    /// Create a new RideService instance
    pub fn new(
        ride_repository: RideRepository,
        user_service: UserService,
        review_service: ReviewService,
        notification_service: NotificationService,
        settings: Settings,
    ) -> Self {
        Self {
            ride_repository,
            user_service,
            review_service,
            notification_service,
            settings,
        }
    }

    /// Load-mutate-save cycle for one ride aggregate. On a lost write race
    /// the aggregate is reloaded and the mutation reapplied, up to the
    /// configured number of attempts.
    async fn mutate_ride<F, T>(&self, ride_id: Uuid, mut apply: F) -> Result<(Ride, T)>
    where
        F: FnMut(&mut Ride) -> Result<T>,
    {
        let max_attempts = self.settings.ride.max_save_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut ride = self
                .ride_repository
                .find_by_id(ride_id)
                .await?
                .ok_or(RideLinkError::RideNotFound { ride_id })?;

            let outcome = apply(&mut ride)?;

            match self.ride_repository.save(&ride).await {
                Ok(saved) => return Ok((saved, outcome)),
                Err(RideLinkError::StaleRide { .. }) if attempt < max_attempts => {
                    warn!(
                        ride_id = %ride_id,
                        attempt = attempt,
                        "Concurrent ride update detected, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Owner's average rating for display; enrichment failures degrade to 0.0
    async fn owner_rating(&self, owner_id: i64) -> f64 {
        match self.review_service.average_rating(owner_id).await {
            Ok(rating) => rating,
            Err(e) => {
                warn!(owner_id = owner_id, error = %e, "Failed to fetch owner rating");
                0.0
            }
        }
    }

    async fn to_view(&self, ride: Ride) -> RideView {
        let rating = self.owner_rating(ride.owner_id).await;
        RideView::new(ride, rating)
    }

    async fn to_views(&self, rides: Vec<Ride>) -> Vec<RideView> {
        let mut ratings: HashMap<i64, f64> = HashMap::new();
        let mut views = Vec::with_capacity(rides.len());

        for ride in rides {
            let rating = match ratings.get(&ride.owner_id) {
                Some(rating) => *rating,
                None => {
                    let rating = self.owner_rating(ride.owner_id).await;
                    ratings.insert(ride.owner_id, rating);
                    rating
                }
            };
            views.push(RideView::new(ride, rating));
        }

        views
    }

    /// Create a new ride offer
    pub async fn create_ride(
        &self,
        request: CreateRideRequest,
        owner_id: i64,
    ) -> Result<RideView> {
        info!(owner_id = owner_id, origin = %request.origin, destination = %request.destination, "Creating new ride");

        let owner = self.user_service.get_user_by_id(owner_id).await?;
        let ride = Ride::new(request, owner.id, Some(owner.name), Utc::now())?;
        let created = self.ride_repository.create(&ride).await?;

        info!(ride_id = %created.id, "Successfully created ride");
        Ok(self.to_view(created).await)
    }

    /// Fetch a single ride
    pub async fn get_ride(&self, ride_id: Uuid) -> Result<RideView> {
        let ride = self
            .ride_repository
            .find_by_id(ride_id)
            .await?
            .ok_or(RideLinkError::RideNotFound { ride_id })?;

        Ok(self.to_view(ride).await)
    }

    /// Bookable rides, optionally narrowed by origin/destination substring
    pub async fn get_public_rides(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Vec<RideView>> {
        let origin = origin.filter(|s| !s.is_empty());
        let destination = destination.filter(|s| !s.is_empty());
        let rides = self.ride_repository.find_public(origin, destination).await?;

        info!(count = rides.len(), "Found public rides");
        Ok(self.to_views(rides).await)
    }

    /// Search bookable rides with date, time-of-day and vehicle type filters
    pub async fn search_rides(&self, filter: RideSearchFilter) -> Result<Vec<RideView>> {
        let rides = self
            .ride_repository
            .find_public(
                filter.origin.as_deref().filter(|s| !s.is_empty()),
                filter.destination.as_deref().filter(|s| !s.is_empty()),
            )
            .await?;

        let mut matched = Vec::new();
        for ride in rides {
            if !matches_time_filter(&ride, &filter) {
                continue;
            }
            if let Some(vehicle_type) = filter.vehicle_type.as_deref().filter(|s| !s.is_empty()) {
                // Vehicle type lives on the owner profile; a failed lookup
                // excludes the ride rather than failing the search
                match self.user_service.get_user_by_id(ride.owner_id).await {
                    Ok(owner) => {
                        let matches = owner
                            .vehicle_type
                            .as_deref()
                            .is_some_and(|v| v.eq_ignore_ascii_case(vehicle_type));
                        if !matches {
                            continue;
                        }
                    }
                    Err(e) => {
                        warn!(ride_id = %ride.id, error = %e, "Error filtering by vehicle type");
                        continue;
                    }
                }
            }
            matched.push(ride);
        }

        info!(count = matched.len(), "Search found rides after filtering");
        Ok(self.to_views(matched).await)
    }

    /// List all rides with pagination
    pub async fn list_rides(&self, limit: i64, offset: i64) -> Result<RidePage> {
        let rides = self.ride_repository.list(limit, offset).await?;
        let total = self.ride_repository.count().await?;

        Ok(RidePage {
            rides: self.to_views(rides).await,
            total,
        })
    }

    /// Rides offered by an owner, paginated
    pub async fn get_my_offers(&self, owner_id: i64, limit: i64, offset: i64) -> Result<RidePage> {
        let rides = self
            .ride_repository
            .find_by_owner_paginated(owner_id, limit, offset)
            .await?;
        let total = self.ride_repository.count_by_owner(owner_id).await?;

        Ok(RidePage {
            rides: self.to_views(rides).await,
            total,
        })
    }

    /// A user's rides bucketed into approved / pending / rejected
    pub async fn get_my_rides(&self, user_id: i64, limit: i64, offset: i64) -> Result<MyRidesResponse> {
        let approved = self
            .ride_repository
            .find_accepted_for(user_id, limit, offset)
            .await?;
        let pending = self
            .ride_repository
            .find_requested_for(user_id, limit, offset)
            .await?;
        let canceled = self
            .ride_repository
            .find_canceled_for(user_id, limit, offset)
            .await?;

        let total_approved = self
            .ride_repository
            .count_membership(MembershipColumn::AcceptedPassengers, user_id)
            .await?;
        let total_pending = self
            .ride_repository
            .count_membership(MembershipColumn::Requests, user_id)
            .await?;
        let total_canceled = self
            .ride_repository
            .count_membership(MembershipColumn::CanceledRequests, user_id)
            .await?;

        Ok(MyRidesResponse {
            approved_rides: self.to_views(approved).await,
            pending_requests: self.to_views(pending).await,
            canceled_rides: self.to_views(canceled).await,
            total_approved,
            total_pending,
            total_canceled,
        })
    }

    /// Partially update a ride; owner or admin only
    pub async fn update_ride(
        &self,
        ride_id: Uuid,
        patch: UpdateRideRequest,
        actor_id: i64,
    ) -> Result<RideView> {
        info!(ride_id = %ride_id, actor_id = actor_id, "Updating ride");

        let actor = self.user_service.get_user_by_id(actor_id).await?;
        let is_admin = actor.is_admin();

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| {
                if !is_admin && ride.owner_id != actor_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only ride owner or admin can update the ride".to_string(),
                    ));
                }
                ride.apply_update(&patch)
            })
            .await?;

        info!(ride_id = %ride_id, "Successfully updated ride");
        Ok(self.to_view(ride).await)
    }

    /// Hard-delete a ride; owner only
    pub async fn delete_ride(&self, ride_id: Uuid, actor_id: i64) -> Result<()> {
        info!(ride_id = %ride_id, actor_id = actor_id, "Deleting ride");

        let ride = self
            .ride_repository
            .find_by_id(ride_id)
            .await?
            .ok_or(RideLinkError::RideNotFound { ride_id })?;

        if ride.owner_id != actor_id {
            return Err(RideLinkError::PermissionDenied(
                "Only ride owner can delete the ride".to_string(),
            ));
        }

        self.ride_repository.delete(ride_id).await?;
        info!(ride_id = %ride_id, "Successfully deleted ride");
        Ok(())
    }

    /// Passenger requests seats on a ride
    pub async fn request_seats(
        &self,
        ride_id: Uuid,
        passenger_id: i64,
        seats_requested: i32,
    ) -> Result<RideView> {
        info!(
            ride_id = %ride_id,
            passenger_id = passenger_id,
            seats = seats_requested,
            "Passenger requesting seats"
        );

        // Display enrichment only; an unknown profile does not block booking
        let passenger_name = match self.user_service.get_user_by_id(passenger_id).await {
            Ok(user) => Some(user.name),
            Err(e) => {
                warn!(passenger_id = passenger_id, error = %e, "Could not fetch passenger name");
                None
            }
        };

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| {
                ride.request_seats(passenger_id, seats_requested, passenger_name.clone(), Utc::now())
                    .map(|_| ())
            })
            .await?;

        let requester = passenger_name.as_deref().unwrap_or("a user");
        self.notification_service
            .dispatch(
                ride.owner_id,
                format!(
                    "New booking request from {} {} to {}",
                    requester, ride.origin, ride.destination
                ),
                NotificationSeverity::Info,
                Some(ride_id),
            )
            .await;

        Ok(self.to_view(ride).await)
    }

    /// Passenger withdraws their pending request
    pub async fn cancel_request(&self, ride_id: Uuid, passenger_id: i64) -> Result<RideView> {
        info!(ride_id = %ride_id, passenger_id = passenger_id, "Canceling booking request");

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| ride.cancel_own_request(passenger_id))
            .await?;

        self.notification_service
            .dispatch(
                ride.owner_id,
                "A passenger canceled their request for your ride",
                NotificationSeverity::Warning,
                Some(ride_id),
            )
            .await;

        Ok(self.to_view(ride).await)
    }

    /// Owner accepts a pending request, allocating seats
    pub async fn accept_request(
        &self,
        ride_id: Uuid,
        passenger_id: i64,
        owner_id: i64,
    ) -> Result<RideView> {
        info!(ride_id = %ride_id, passenger_id = passenger_id, owner_id = owner_id, "Accepting booking request");

        let (ride, seats) = self
            .mutate_ride(ride_id, |ride| {
                if ride.owner_id != owner_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only ride owner can accept requests".to_string(),
                    ));
                }
                ride.accept_request(passenger_id)
            })
            .await?;

        info!(ride_id = %ride_id, passenger_id = passenger_id, seats = seats, "Accepted passenger");

        self.notification_service
            .dispatch(
                passenger_id,
                format!(
                    "Your request for ride {} -> {} has been accepted!",
                    ride.origin, ride.destination
                ),
                NotificationSeverity::Success,
                Some(ride_id),
            )
            .await;

        Ok(self.to_view(ride).await)
    }

    /// Owner rejects a pending request
    pub async fn reject_request(
        &self,
        ride_id: Uuid,
        passenger_id: i64,
        owner_id: i64,
    ) -> Result<RideView> {
        info!(ride_id = %ride_id, passenger_id = passenger_id, owner_id = owner_id, "Rejecting booking request");

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| {
                if ride.owner_id != owner_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only ride owner can reject requests".to_string(),
                    ));
                }
                ride.reject_request(passenger_id)
            })
            .await?;

        self.notification_service
            .dispatch(
                passenger_id,
                format!(
                    "Your request for ride {} -> {} has been rejected.",
                    ride.origin, ride.destination
                ),
                NotificationSeverity::Error,
                Some(ride_id),
            )
            .await;

        Ok(self.to_view(ride).await)
    }

    /// Owner removes an accepted passenger before the ride starts
    pub async fn remove_passenger(
        &self,
        ride_id: Uuid,
        passenger_id: i64,
        owner_id: i64,
    ) -> Result<RideView> {
        info!(ride_id = %ride_id, passenger_id = passenger_id, owner_id = owner_id, "Removing passenger");

        let (ride, restored) = self
            .mutate_ride(ride_id, |ride| {
                if ride.owner_id != owner_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only ride owner can remove passengers".to_string(),
                    ));
                }
                ride.remove_passenger(passenger_id)
            })
            .await?;

        info!(
            ride_id = %ride_id,
            passenger_id = passenger_id,
            restored = restored,
            "Removed passenger and restored seats"
        );
        Ok(self.to_view(ride).await)
    }

    /// Owner records a collected payment on an approved booking
    pub async fn mark_payment_collected(
        &self,
        ride_id: Uuid,
        passenger_id: i64,
        owner_id: i64,
        amount: f64,
    ) -> Result<RideView> {
        info!(ride_id = %ride_id, passenger_id = passenger_id, amount = amount, "Marking payment collected");

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| {
                if ride.owner_id != owner_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only ride owner can mark payment as collected".to_string(),
                    ));
                }
                ride.mark_payment_collected(passenger_id, amount, Utc::now())
            })
            .await?;

        self.notification_service
            .dispatch(
                passenger_id,
                format!("Payment of {:.2} for your ride has been confirmed.", amount),
                NotificationSeverity::Success,
                Some(ride_id),
            )
            .await;

        Ok(self.to_view(ride).await)
    }

    /// Owner starts a scheduled ride
    pub async fn start_ride(&self, ride_id: Uuid, owner_id: i64) -> Result<RideView> {
        info!(ride_id = %ride_id, owner_id = owner_id, "Starting ride");

        let ride = self
            .ride_repository
            .find_by_id(ride_id)
            .await?
            .ok_or(RideLinkError::RideNotFound { ride_id })?;
        if ride.owner_id != owner_id {
            return Err(RideLinkError::PermissionDenied(
                "Only the ride owner can start the ride".to_string(),
            ));
        }

        // One ride at a time per owner
        let in_progress = self
            .ride_repository
            .find_by_owner_and_status(owner_id, RideStatus::InProgress)
            .await?;
        if let Some(other) = in_progress.iter().find(|r| r.id != ride_id) {
            return Err(RideLinkError::RideAlreadyInProgress { ride_id: other.id });
        }

        let policy = self.settings.ride.clone();
        let (ride, _) = self
            .mutate_ride(ride_id, |ride| ride.start(Utc::now(), &policy))
            .await?;

        self.notification_service
            .dispatch(
                owner_id,
                "You started the ride. Drive safely!",
                NotificationSeverity::Success,
                Some(ride_id),
            )
            .await;
        for passenger_id in &ride.accepted_passengers {
            self.notification_service
                .dispatch(
                    *passenger_id,
                    "The ride has started! Please have your payment ready.",
                    NotificationSeverity::Info,
                    Some(ride_id),
                )
                .await;
        }

        Ok(self.to_view(ride).await)
    }

    /// Owner ends an in-progress ride. Recurring rides spawn their next
    /// occurrence when the policy allows; a failed respawn never fails the
    /// completed ride.
    pub async fn end_ride(&self, ride_id: Uuid, owner_id: i64) -> Result<RideView> {
        info!(ride_id = %ride_id, owner_id = owner_id, "Ending ride");

        let (ride, _) = self
            .mutate_ride(ride_id, |ride| {
                if ride.owner_id != owner_id {
                    return Err(RideLinkError::PermissionDenied(
                        "Only the ride owner can end the ride".to_string(),
                    ));
                }
                ride.complete()
            })
            .await?;

        if self.settings.ride.auto_reschedule {
            if let Some(next) = ride.next_occurrence(Utc::now()) {
                match self.ride_repository.create(&next).await {
                    Ok(created) => {
                        info!(
                            ride_id = %ride_id,
                            next_ride_id = %created.id,
                            next_start = %created.start_time,
                            "Spawned next occurrence of recurring ride"
                        );
                    }
                    Err(e) => {
                        tracing::error!(ride_id = %ride_id, error = %e, "Failed to reschedule recurring ride");
                    }
                }
            }
        }

        for passenger_id in &ride.accepted_passengers {
            self.notification_service
                .dispatch(
                    *passenger_id,
                    "The ride has ended. Please take a moment to rate your driver.",
                    NotificationSeverity::Info,
                    Some(ride_id),
                )
                .await;
        }

        Ok(self.to_view(ride).await)
    }

    /// Cancel a ride; owner or admin only
    pub async fn cancel_ride(&self, ride_id: Uuid, actor_id: i64) -> Result<RideView> {
        info!(ride_id = %ride_id, actor_id = actor_id, "Cancelling ride");

        let existing = self
            .ride_repository
            .find_by_id(ride_id)
            .await?
            .ok_or(RideLinkError::RideNotFound { ride_id })?;

        if existing.owner_id != actor_id && !self.user_service.is_admin(actor_id).await? {
            return Err(RideLinkError::PermissionDenied(
                "Only the ride owner or an admin can cancel the ride".to_string(),
            ));
        }

        let (ride, _) = self.mutate_ride(ride_id, |ride| ride.cancel()).await?;

        for passenger_id in &ride.accepted_passengers {
            self.notification_service
                .dispatch(
                    *passenger_id,
                    "The ride has been canceled by the owner.",
                    NotificationSeverity::Warning,
                    Some(ride_id),
                )
                .await;
        }

        Ok(self.to_view(ride).await)
    }

    /// Earnings collected today, bucketed by payment method
    pub async fn get_today_earnings(&self, owner_id: i64) -> Result<EarningsSummary> {
        let rides = self.ride_repository.find_by_owner(owner_id).await?;
        let today = Local::now().date_naive();

        Ok(summarize_earnings(&rides, Some(today)))
    }

    /// All-time earnings, bucketed by payment method
    pub async fn get_total_earnings(&self, owner_id: i64) -> Result<EarningsSummary> {
        let rides = self.ride_repository.find_by_owner(owner_id).await?;

        Ok(summarize_earnings(&rides, None))
    }
}

/// Apply the date and time-of-day parts of a search filter
fn matches_time_filter(ride: &Ride, filter: &RideSearchFilter) -> bool {
    let local_start = ride.start_time.with_timezone(&Local);

    if let Some(date) = filter.date {
        if local_start.date_naive() != date {
            return false;
        }
    }

    let time = local_start.time();
    if let Some(from) = filter.time_from {
        if time < from {
            return false;
        }
    }
    if let Some(to) = filter.time_to {
        if time > to {
            return false;
        }
    }

    true
}

/// Fold collected payments over an owner's rides, bucketed by method.
/// `on_date` restricts the fold to payments collected on that local date.
fn summarize_earnings(rides: &[Ride], on_date: Option<NaiveDate>) -> EarningsSummary {
    let mut summary = EarningsSummary {
        cash_earnings: 0.0,
        card_earnings: 0.0,
        total_earnings: 0.0,
        cash_payments_count: 0,
        card_payments_count: 0,
        date: on_date.map(|d| d.to_string()),
    };

    for ride in rides {
        for booking in ride.bookings.values() {
            if !booking.is_paid() {
                continue;
            }
            let (Some(amount), Some(collected_at)) =
                (booking.amount_paid, booking.payment_collected_at)
            else {
                continue;
            };
            if let Some(date) = on_date {
                if collected_at.with_timezone(&Local).date_naive() != date {
                    continue;
                }
            }

            match booking.payment_method {
                PaymentMethod::Cash => {
                    summary.cash_earnings += amount;
                    summary.cash_payments_count += 1;
                }
                PaymentMethod::Card => {
                    summary.card_earnings += amount;
                    summary.card_payments_count += 1;
                }
            }
        }
    }

    summary.total_earnings = summary.cash_earnings + summary.card_earnings;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{Booking, BookingStatus, PaymentStatus};
    use crate::models::ride::CreateRideRequest;
    use chrono::{DateTime, Duration, TimeZone};

    fn test_ride(owner_id: i64) -> Ride {
        Ride::new(
            CreateRideRequest {
                origin: "Colombo".to_string(),
                destination: "Jaffna".to_string(),
                start_time: Utc::now(),
                total_seats: 4,
                price_per_seat: 800.0,
                schedule: None,
                owner_contact: None,
            },
            owner_id,
            None,
            Utc::now(),
        )
        .unwrap()
    }

    fn paid_booking(
        ride: &mut Ride,
        passenger_id: i64,
        method: PaymentMethod,
        amount: f64,
        collected_at: DateTime<Utc>,
    ) {
        let mut booking = Booking::new(ride.id, passenger_id, 1, None, collected_at);
        booking.status = BookingStatus::Approved;
        booking.payment_method = method;
        booking.payment_status = PaymentStatus::Completed;
        booking.amount_paid = Some(amount);
        booking.payment_collected_at = Some(collected_at);
        ride.bookings.insert(passenger_id, booking);
        ride.accepted_passengers.push(passenger_id);
        ride.seats_available -= 1;
    }

    #[test]
    fn test_summarize_earnings_buckets_by_method() {
        let now = Utc::now();
        let mut ride = test_ride(10);
        paid_booking(&mut ride, 1, PaymentMethod::Cash, 500.0, now);
        paid_booking(&mut ride, 2, PaymentMethod::Card, 800.0, now);
        paid_booking(&mut ride, 3, PaymentMethod::Cash, 250.0, now);

        // Unpaid approved booking does not count
        let mut unpaid = Booking::new(ride.id, 4, 1, None, now);
        unpaid.status = BookingStatus::Approved;
        ride.bookings.insert(4, unpaid);

        let summary = summarize_earnings(&[ride], None);
        assert_eq!(summary.cash_earnings, 750.0);
        assert_eq!(summary.card_earnings, 800.0);
        assert_eq!(summary.total_earnings, 1550.0);
        assert_eq!(summary.cash_payments_count, 2);
        assert_eq!(summary.card_payments_count, 1);
        assert!(summary.date.is_none());
    }

    #[test]
    fn test_summarize_earnings_filters_by_date() {
        let now = Utc::now();
        let mut ride = test_ride(10);
        paid_booking(&mut ride, 1, PaymentMethod::Cash, 500.0, now);
        paid_booking(&mut ride, 2, PaymentMethod::Cash, 300.0, now - Duration::days(10));

        let today = now.with_timezone(&Local).date_naive();
        let summary = summarize_earnings(&[ride], Some(today));
        assert_eq!(summary.cash_earnings, 500.0);
        assert_eq!(summary.cash_payments_count, 1);
        assert_eq!(summary.date, Some(today.to_string()));
    }

    #[test]
    fn test_summarize_earnings_spans_multiple_rides() {
        let now = Utc::now();
        let mut first = test_ride(10);
        paid_booking(&mut first, 1, PaymentMethod::Card, 400.0, now);
        let mut second = test_ride(10);
        paid_booking(&mut second, 2, PaymentMethod::Card, 600.0, now);

        let summary = summarize_earnings(&[first, second], None);
        assert_eq!(summary.card_earnings, 1000.0);
        assert_eq!(summary.card_payments_count, 2);
    }

    #[test]
    fn test_matches_time_filter() {
        let mut ride = test_ride(10);
        // 09:30 local on a fixed date
        let start_local = Local.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
        ride.start_time = start_local.with_timezone(&Utc);

        let mut filter = RideSearchFilter::default();
        assert!(matches_time_filter(&ride, &filter));

        filter.date = Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert!(matches_time_filter(&ride, &filter));
        filter.date = Some(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert!(!matches_time_filter(&ride, &filter));
        filter.date = None;

        filter.time_from = chrono::NaiveTime::from_hms_opt(9, 0, 0);
        filter.time_to = chrono::NaiveTime::from_hms_opt(10, 0, 0);
        assert!(matches_time_filter(&ride, &filter));

        filter.time_from = chrono::NaiveTime::from_hms_opt(10, 0, 0);
        filter.time_to = None;
        assert!(!matches_time_filter(&ride, &filter));

        filter.time_from = None;
        filter.time_to = chrono::NaiveTime::from_hms_opt(9, 0, 0);
        assert!(!matches_time_filter(&ride, &filter));
    }
}

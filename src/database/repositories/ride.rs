//! Ride repository implementation
//!
//! Rides are persisted one row per aggregate: the membership sets live in
//! array columns and the booking map in a JSONB column, so every mutation is
//! written atomically. Saves are guarded by the aggregate's version column;
//! a lost write race surfaces as a stale-ride error for the service to retry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::ride::{Ride, RideStatus};
use crate::utils::errors::RideLinkError;

const RIDE_COLUMNS: &str = "id, owner_id, owner_name, owner_contact, origin, destination, \
     start_time, total_seats, seats_available, price_per_seat, schedule, status, active, \
     requests, accepted_passengers, canceled_requests, bookings, version, created_at";

#[derive(Debug, FromRow)]
struct RideRow {
    id: Uuid,
    owner_id: i64,
    owner_name: Option<String>,
    owner_contact: Option<String>,
    origin: String,
    destination: String,
    start_time: DateTime<Utc>,
    total_seats: i32,
    seats_available: i32,
    price_per_seat: f64,
    schedule: Option<String>,
    status: String,
    active: bool,
    requests: Vec<i64>,
    accepted_passengers: Vec<i64>,
    canceled_requests: Vec<i64>,
    bookings: Json<BTreeMap<i64, Booking>>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<RideRow> for Ride {
    type Error = RideLinkError;

    fn try_from(row: RideRow) -> Result<Self, RideLinkError> {
        let status: RideStatus = row.status.parse()?;
        Ok(Ride {
            id: row.id,
            owner_id: row.owner_id,
            owner_name: row.owner_name,
            owner_contact: row.owner_contact,
            origin: row.origin,
            destination: row.destination,
            start_time: row.start_time,
            total_seats: row.total_seats,
            seats_available: row.seats_available,
            price_per_seat: row.price_per_seat,
            schedule: row.schedule,
            status,
            active: row.active,
            requests: row.requests,
            accepted_passengers: row.accepted_passengers,
            canceled_requests: row.canceled_requests,
            bookings: row.bookings.0,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

fn rows_to_rides(rows: Vec<RideRow>) -> Result<Vec<Ride>, RideLinkError> {
    rows.into_iter().map(Ride::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct RideRepository {
    pool: PgPool,
}

impl RideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ride aggregate
    pub async fn create(&self, ride: &Ride) -> Result<Ride, RideLinkError> {
        let row = sqlx::query_as::<_, RideRow>(&format!(
            r#"
            INSERT INTO rides ({RIDE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {RIDE_COLUMNS}
            "#
        ))
        .bind(ride.id)
        .bind(ride.owner_id)
        .bind(&ride.owner_name)
        .bind(&ride.owner_contact)
        .bind(&ride.origin)
        .bind(&ride.destination)
        .bind(ride.start_time)
        .bind(ride.total_seats)
        .bind(ride.seats_available)
        .bind(ride.price_per_seat)
        .bind(&ride.schedule)
        .bind(ride.status.as_str())
        .bind(ride.active)
        .bind(&ride.requests)
        .bind(&ride.accepted_passengers)
        .bind(&ride.canceled_requests)
        .bind(Json(&ride.bookings))
        .bind(ride.version)
        .bind(ride.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Find ride by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, RideLinkError> {
        let row = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Ride::try_from).transpose()
    }

    /// Persist a mutated aggregate. The write only lands if nobody else saved
    /// the ride since it was loaded; otherwise the caller gets a stale-ride
    /// error and should reload and reapply.
    pub async fn save(&self, ride: &Ride) -> Result<Ride, RideLinkError> {
        let row = sqlx::query_as::<_, RideRow>(&format!(
            r#"
            UPDATE rides
            SET owner_name = $2,
                owner_contact = $3,
                origin = $4,
                destination = $5,
                start_time = $6,
                total_seats = $7,
                seats_available = $8,
                price_per_seat = $9,
                schedule = $10,
                status = $11,
                active = $12,
                requests = $13,
                accepted_passengers = $14,
                canceled_requests = $15,
                bookings = $16,
                version = version + 1
            WHERE id = $1 AND version = $17
            RETURNING {RIDE_COLUMNS}
            "#
        ))
        .bind(ride.id)
        .bind(&ride.owner_name)
        .bind(&ride.owner_contact)
        .bind(&ride.origin)
        .bind(&ride.destination)
        .bind(ride.start_time)
        .bind(ride.total_seats)
        .bind(ride.seats_available)
        .bind(ride.price_per_seat)
        .bind(&ride.schedule)
        .bind(ride.status.as_str())
        .bind(ride.active)
        .bind(&ride.requests)
        .bind(&ride.accepted_passengers)
        .bind(&ride.canceled_requests)
        .bind(Json(&ride.bookings))
        .bind(ride.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(RideLinkError::StaleRide { ride_id: ride.id }),
        }
    }

    /// Delete a ride
    pub async fn delete(&self, id: Uuid) -> Result<(), RideLinkError> {
        sqlx::query("DELETE FROM rides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Bookable rides, optionally narrowed by origin/destination substring
    pub async fn find_public(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            r#"
            SELECT {RIDE_COLUMNS} FROM rides
            WHERE active = TRUE
              AND seats_available > 0
              AND ($1::TEXT IS NULL OR origin ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR destination ILIKE '%' || $2 || '%')
            ORDER BY start_time ASC
            "#
        ))
        .bind(origin)
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }

    /// List rides with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }

    /// Count total rides
    pub async fn count(&self) -> Result<i64, RideLinkError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rides")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// All rides offered by an owner
    pub async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE owner_id = $1 ORDER BY start_time DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }

    /// Rides offered by an owner, paginated
    pub async fn find_by_owner_paginated(
        &self,
        owner_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE owner_id = $1 ORDER BY start_time DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }

    /// Count rides offered by an owner
    pub async fn count_by_owner(&self, owner_id: i64) -> Result<i64, RideLinkError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rides WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Rides of an owner in a given lifecycle status
    pub async fn find_by_owner_and_status(
        &self,
        owner_id: i64,
        status: RideStatus,
    ) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE owner_id = $1 AND status = $2"
        ))
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }

    /// Rides where the user holds an approved booking
    pub async fn find_accepted_for(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ride>, RideLinkError> {
        self.find_by_membership("accepted_passengers", user_id, limit, offset)
            .await
    }

    /// Rides where the user has an unresolved pending request
    pub async fn find_requested_for(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ride>, RideLinkError> {
        self.find_by_membership("requests", user_id, limit, offset)
            .await
    }

    /// Rides where the user's request was rejected
    pub async fn find_canceled_for(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ride>, RideLinkError> {
        self.find_by_membership("canceled_requests", user_id, limit, offset)
            .await
    }

    /// Count rides where the user appears in a membership set
    pub async fn count_membership(
        &self,
        column: MembershipColumn,
        user_id: i64,
    ) -> Result<i64, RideLinkError> {
        let count: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM rides WHERE $1 = ANY({})",
            column.as_str()
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn find_by_membership(
        &self,
        column: &str,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ride>, RideLinkError> {
        let rows = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE $1 = ANY({column}) \
             ORDER BY start_time DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows_to_rides(rows)
    }
}

/// Membership set columns on the rides table
#[derive(Debug, Clone, Copy)]
pub enum MembershipColumn {
    Requests,
    AcceptedPassengers,
    CanceledRequests,
}

impl MembershipColumn {
    fn as_str(&self) -> &'static str {
        match self {
            MembershipColumn::Requests => "requests",
            MembershipColumn::AcceptedPassengers => "accepted_passengers",
            MembershipColumn::CanceledRequests => "canceled_requests",
        }
    }
}

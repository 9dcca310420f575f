//! Review model
//!
//! Passengers rate drivers after a completed ride. The ride core only reads
//! the aggregated average; submission rules live in the review service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub reviewer_id: i64,
    pub driver_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub ride_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

//! Review repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::review::Review;
use crate::utils::errors::RideLinkError;

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new review
    pub async fn create(
        &self,
        ride_id: Uuid,
        reviewer_id: i64,
        driver_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, RideLinkError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, ride_id, reviewer_id, driver_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, ride_id, reviewer_id, driver_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ride_id)
        .bind(reviewer_id)
        .bind(driver_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Check if the reviewer already reviewed this ride
    pub async fn exists_for_ride_and_reviewer(
        &self,
        ride_id: Uuid,
        reviewer_id: i64,
    ) -> Result<bool, RideLinkError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reviews WHERE ride_id = $1 AND reviewer_id = $2",
        )
        .bind(ride_id)
        .bind(reviewer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Reviews received by a driver, newest first
    pub async fn find_by_driver(&self, driver_id: i64) -> Result<Vec<Review>, RideLinkError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, ride_id, reviewer_id, driver_id, rating, comment, created_at \
             FROM reviews WHERE driver_id = $1 ORDER BY created_at DESC",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Average rating for a driver; `None` when no reviews exist
    pub async fn average_for_driver(&self, driver_id: i64) -> Result<Option<f64>, RideLinkError> {
        let average: (Option<f64>,) = sqlx::query_as(
            "SELECT AVG(rating)::FLOAT8 FROM reviews WHERE driver_id = $1",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(average.0)
    }
}

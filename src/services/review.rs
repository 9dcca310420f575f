//! Review service implementation
//!
//! Passengers rate drivers after completed rides. The ride core only consumes
//! the aggregated average; it is read-side enrichment served through the
//! Redis cache and recomputed from storage on a miss.

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::repositories::{ReviewRepository, RideRepository};
use crate::models::notification::NotificationSeverity;
use crate::models::review::{Review, SubmitReviewRequest};
use crate::models::ride::RideStatus;
use crate::services::notification::NotificationService;
use crate::services::redis::RedisService;
use crate::utils::errors::{Result, RideLinkError};

/// Review service for rating submission and aggregation
#[derive(Clone)]
pub struct ReviewService {
    review_repository: ReviewRepository,
    ride_repository: RideRepository,
    redis_service: RedisService,
    notification_service: NotificationService,
}

impl ReviewService {
    /// Create a new ReviewService instance
    pub fn new(
        review_repository: ReviewRepository,
        ride_repository: RideRepository,
        redis_service: RedisService,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            review_repository,
            ride_repository,
            redis_service,
            notification_service,
        }
    }

    /// Submit a review for a completed ride the reviewer rode on
    pub async fn submit_review(
        &self,
        reviewer_id: i64,
        request: SubmitReviewRequest,
    ) -> Result<Review> {
        info!(ride_id = %request.ride_id, reviewer_id = reviewer_id, "Submitting review");

        if !(1..=5).contains(&request.rating) {
            return Err(RideLinkError::InvalidInput(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let ride = self
            .ride_repository
            .find_by_id(request.ride_id)
            .await?
            .ok_or(RideLinkError::RideNotFound {
                ride_id: request.ride_id,
            })?;

        if ride.status != RideStatus::Completed {
            return Err(RideLinkError::InvalidRideState {
                action: "reviewed",
                status: ride.status,
            });
        }

        if !ride.accepted_passengers.contains(&reviewer_id) {
            return Err(RideLinkError::PermissionDenied(
                "Only passengers of the ride can submit reviews".to_string(),
            ));
        }

        if self
            .review_repository
            .exists_for_ride_and_reviewer(request.ride_id, reviewer_id)
            .await?
        {
            return Err(RideLinkError::DuplicateReview {
                ride_id: request.ride_id,
                reviewer_id,
            });
        }

        let review = self
            .review_repository
            .create(
                request.ride_id,
                reviewer_id,
                ride.owner_id,
                request.rating,
                request.comment,
            )
            .await?;

        // The cached average is stale now; drop it so the next read recomputes
        if let Err(e) = self.redis_service.invalidate_driver_rating(ride.owner_id).await {
            tracing::warn!(driver_id = ride.owner_id, error = %e, "Failed to invalidate rating cache");
        }

        self.notification_service
            .dispatch(
                ride.owner_id,
                format!("You received a new {}-star review", review.rating),
                NotificationSeverity::Info,
                Some(ride.id),
            )
            .await;

        Ok(review)
    }

    /// Average rating for a driver in [0, 5]; 0.0 when no reviews exist.
    /// Served from cache when possible.
    pub async fn average_rating(&self, driver_id: i64) -> Result<f64> {
        if let Ok(Some(cached)) = self.redis_service.get_driver_rating(driver_id).await {
            debug!(driver_id = driver_id, rating = cached, "Rating served from cache");
            return Ok(cached);
        }

        let average = self
            .review_repository
            .average_for_driver(driver_id)
            .await?
            .unwrap_or(0.0);
        let rounded = (average * 10.0).round() / 10.0;

        if let Err(e) = self.redis_service.cache_driver_rating(driver_id, rounded).await {
            tracing::warn!(driver_id = driver_id, error = %e, "Failed to cache driver rating");
        }

        Ok(rounded)
    }

    /// Reviews received by a driver
    pub async fn get_driver_reviews(&self, driver_id: i64) -> Result<Vec<Review>> {
        self.review_repository.find_by_driver(driver_id).await
    }

    /// Check if a reviewer already reviewed a ride
    pub async fn has_reviewed(&self, ride_id: Uuid, reviewer_id: i64) -> Result<bool> {
        self.review_repository
            .exists_for_ride_and_reviewer(ride_id, reviewer_id)
            .await
    }
}

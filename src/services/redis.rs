//! Redis integration service implementation
//!
//! This service handles Redis connection setup and caching utilities for
//! read-side enrichment data, most importantly driver rating lookups that
//! decorate ride listings. Cached values are enrichment only and may be
//! slightly stale; they are invalidated when a new review lands.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{Result, RideLinkError};

/// Redis service for caching and counters
#[derive(Debug, Clone)]
pub struct RedisService {
    client: Client,
    settings: Settings,
}

impl RedisService {
    /// Create a new RedisService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::open(settings.redis.url.as_str()).map_err(RideLinkError::Redis)?;

        Ok(Self { client, settings })
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<redis::aio::Connection> {
        self.client
            .get_async_connection()
            .await
            .map_err(RideLinkError::Redis)
    }

    /// Set a value in Redis with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(value).map_err(RideLinkError::Serialization)?;

        let full_key = format!("{}{}", self.settings.redis.prefix, key);
        let ttl = ttl_seconds.unwrap_or(self.settings.redis.ttl_seconds);

        let _: () = conn
            .set_ex(&full_key, serialized, ttl)
            .await
            .map_err(RideLinkError::Redis)?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.settings.redis.prefix, key);

        let result: Option<String> = conn.get(&full_key).await.map_err(RideLinkError::Redis)?;

        match result {
            Some(data) => {
                let deserialized =
                    serde_json::from_str::<T>(&data).map_err(RideLinkError::Serialization)?;
                debug!(key = %full_key, "Value retrieved from Redis");
                Ok(Some(deserialized))
            }
            None => {
                debug!(key = %full_key, "Key not found in Redis");
                Ok(None)
            }
        }
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.settings.redis.prefix, key);

        let deleted: i32 = conn.del(&full_key).await.map_err(RideLinkError::Redis)?;

        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// Cache the average rating for a driver
    pub async fn cache_driver_rating(&self, driver_id: i64, rating: f64) -> Result<()> {
        let key = format!("driver_rating:{}", driver_id);
        self.set(&key, &rating, Some(self.settings.redis.ttl_seconds))
            .await
    }

    /// Get the cached average rating for a driver
    pub async fn get_driver_rating(&self, driver_id: i64) -> Result<Option<f64>> {
        let key = format!("driver_rating:{}", driver_id);
        self.get(&key).await
    }

    /// Drop a driver's cached rating after a new review
    pub async fn invalidate_driver_rating(&self, driver_id: i64) -> Result<bool> {
        let key = format!("driver_rating:{}", driver_id);
        self.delete(&key).await
    }

    /// Health check for Redis connection
    pub async fn health_check(&self) -> Result<bool> {
        match self.get_connection().await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => {
                        debug!(response = %response, "Redis health check successful");
                        Ok(response == "PONG")
                    }
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        Ok(false)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_service_creation() {
        let settings = Settings::default();
        let result = RedisService::new(settings);

        // Client creation only parses the URL; no connection is made yet
        assert!(result.is_ok());
    }
}

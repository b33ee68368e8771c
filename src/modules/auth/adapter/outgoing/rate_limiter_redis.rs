use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use std::sync::Arc;

use crate::auth::application::ports::outgoing::rate_limiter::{
    RateLimitDecision, RateLimiter, RateLimiterError,
};

/// Redis-backed fixed-window rate limiter.
///
/// ## Redis data model
/// ```text
/// ratelimit:{bucket}:{key} -> counter
/// ```
/// The counter is INCRed on every hit; the TTL set on the first hit of a
/// window makes the whole window disappear on its own. The remaining TTL
/// doubles as the Retry-After value once the limit is exceeded.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Arc<Pool>,
}

impl RedisRateLimiter {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn counter_key(bucket: &str, key: &str) -> String {
        format!("ratelimit:{bucket}:{key}")
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, RateLimiterError> {
        self.pool
            .get()
            .await
            .map_err(|e| RateLimiterError::Backend(format!("Pool error: {}", e)))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn hit(
        &self,
        bucket: &str,
        key: &str,
        limit: u32,
        window_secs: u64,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        let mut conn = self.get_conn().await?;
        let counter_key = Self::counter_key(bucket, key);

        let count: u64 = conn
            .incr(&counter_key, 1u64)
            .await
            .map_err(|e| RateLimiterError::Backend(e.to_string()))?;

        // First hit of the window owns the TTL.
        if count == 1 {
            let _: () = conn
                .expire(&counter_key, window_secs as i64)
                .await
                .map_err(|e| RateLimiterError::Backend(e.to_string()))?;
        }

        if count <= u64::from(limit) {
            return Ok(RateLimitDecision::Allowed);
        }

        let ttl: i64 = conn
            .ttl(&counter_key)
            .await
            .map_err(|e| RateLimiterError::Backend(e.to_string()))?;

        // A key without TTL (-1) would throttle forever; re-arm the window.
        if ttl < 0 {
            let _: () = conn
                .expire(&counter_key, window_secs as i64)
                .await
                .map_err(|e| RateLimiterError::Backend(e.to_string()))?;
        }

        Ok(RateLimitDecision::Limited {
            retry_after_secs: if ttl > 0 { ttl as u64 } else { window_secs },
        })
    }
}

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimiterError {
    #[error("Rate limiter backend error: {0}")]
    Backend(String),
}

/// Fixed-window counter port. `bucket` namespaces the counter (auth vs
/// general API), `key` identifies the client (source address).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn hit(
        &self,
        bucket: &str,
        key: &str,
        limit: u32,
        window_secs: u64,
    ) -> Result<RateLimitDecision, RateLimiterError>;
}

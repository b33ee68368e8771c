use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::auth::application::ports::outgoing::rate_limiter::{
    RateLimitDecision, RateLimiter, RateLimiterError,
};
use crate::shared::api::ApiResponse;

/// A named bucket with its fixed-window quota.
#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    pub bucket: &'static str,
    pub limit: u32,
    pub window_secs: u64,
}

/// Credential endpoints: 5 requests per 15 minutes per client.
pub const AUTH_POLICY: RatePolicy = RatePolicy {
    bucket: "auth",
    limit: 5,
    window_secs: 900,
};

/// General API endpoints: 300 requests per 15 minutes per client.
pub const API_POLICY: RatePolicy = RatePolicy {
    bucket: "api",
    limit: 300,
    window_secs: 900,
};

fn client_key(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Returns the 429 response to short-circuit with, or `None` when the
/// request may proceed. A limiter backend failure fails open: losing
/// rate limiting is better than losing logins.
pub async fn enforce(
    limiter: &Arc<dyn RateLimiter>,
    policy: &RatePolicy,
    req: &HttpRequest,
) -> Option<HttpResponse> {
    let key = client_key(req);

    match limiter
        .hit(policy.bucket, &key, policy.limit, policy.window_secs)
        .await
    {
        Ok(RateLimitDecision::Allowed) => None,
        Ok(RateLimitDecision::Limited { retry_after_secs }) => {
            tracing::warn!(
                bucket = policy.bucket,
                client = %key,
                retry_after_secs,
                "Rate limit exceeded"
            );
            let mut response =
                ApiResponse::too_many_requests("Too many requests. Please try again later.");
            response.headers_mut().insert(
                header::RETRY_AFTER,
                header::HeaderValue::from(retry_after_secs),
            );
            Some(response)
        }
        Err(RateLimiterError::Backend(msg)) => {
            tracing::warn!(
                bucket = policy.bucket,
                error = %msg,
                "Rate limiter unavailable, letting request through"
            );
            None
        }
    }
}

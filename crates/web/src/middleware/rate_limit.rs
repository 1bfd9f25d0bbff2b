use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::error::WebError;

#[derive(Debug)]
struct Bucket {
    tokens: u64,
    last_refill: Instant,
}

/// Global token bucket shared by every request.
///
/// The bucket starts full and gains `refill_amount` tokens at the end of each
/// elapsed `refill_interval`, never exceeding `capacity`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<Bucket>>,
    capacity: u64,
    refill_amount: u64,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: config.capacity,
                last_refill: Instant::now(),
            })),
            capacity: config.capacity,
            refill_amount: config.refill_amount,
            refill_interval: config.refill_interval,
        }
    }

    /// Takes one token, returning false when the bucket is empty
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);

        if bucket.tokens == 0 {
            return false;
        }
        bucket.tokens -= 1;
        true
    }

    fn refill(&self, bucket: &mut Bucket) {
        if self.refill_interval.is_zero() {
            bucket.tokens = self.capacity;
            return;
        }

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        let periods = elapsed.as_nanos() / self.refill_interval.as_nanos();
        if periods == 0 {
            return;
        }

        let added = u64::try_from(periods)
            .unwrap_or(u64::MAX)
            .saturating_mul(self.refill_amount);
        bucket.tokens = bucket.tokens.saturating_add(added).min(self.capacity);

        bucket.last_refill = u32::try_from(periods)
            .ok()
            .and_then(|p| self.refill_interval.checked_mul(p))
            .and_then(|advance| bucket.last_refill.checked_add(advance))
            .unwrap_or(now);
    }
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    if limiter.try_acquire().await {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Rate limit exceeded: method={}, uri={}",
            request.method(),
            request.uri()
        );
        Err(WebError::TooManyRequests)
    }
}

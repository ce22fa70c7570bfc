use std::{num::NonZeroU32, time::Duration};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorRateLimiter};

/// Paces requests to the media server: an average rate, plus an optional
/// minimum gap between any two requests.
pub struct RateLimiter {
    average: DefaultDirectRateLimiter,
    gap: Option<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    pub fn new(requests_per_sec: NonZeroU32, min_gap: Duration) -> Self {
        let average = GovernorRateLimiter::direct(Quota::per_second(requests_per_sec));
        // `with_period` only refuses a zero gap, which means no gap.
        let gap = Quota::with_period(min_gap).map(GovernorRateLimiter::direct);
        RateLimiter { average, gap }
    }

    pub async fn wait_until_ready(&self) {
        // Average first; the gap limiter then lets callers through one at a time.
        self.average.until_ready().await;
        if let Some(gap) = &self.gap {
            gap.until_ready().await;
        }
    }
}

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore, TryAcquireError};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::ProviderError;

/// Token bucket shared by every upstream request
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    tokens_per_second: u32,
    max_tokens: u32,
    max_retries: u32,
    backoff: Duration,
    last_refill: Mutex<Instant>,
}

impl RateLimiter {
    /// `tokens_per_second` is the sustained rate, `max_tokens` the burst size
    pub fn new(tokens_per_second: u32, max_tokens: u32) -> Self {
        let tokens_per_second = tokens_per_second.max(1);
        let max_tokens = max_tokens.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(max_tokens as usize)),
            tokens_per_second,
            max_tokens,
            max_retries: 3,
            backoff: Duration::from_millis(500),
            last_refill: Mutex::new(Instant::now()),
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before the first retry, doubled after each attempt
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait until a token is available and consume it
    pub async fn acquire(&self) {
        let wait = Duration::from_secs_f64(1.0 / f64::from(self.tokens_per_second));

        loop {
            self.refill().await;

            match self.semaphore.try_acquire() {
                Ok(permit) => {
                    // tokens come back through refill(), not on drop
                    permit.forget();
                    return;
                }
                Err(TryAcquireError::NoPermits) => sleep(wait).await,
                Err(TryAcquireError::Closed) => {
                    warn!("rate limiter semaphore closed");
                    sleep(wait).await;
                }
            }
        }
    }

    async fn refill(&self) {
        let mut last_refill = self.last_refill.lock().await;
        let now = Instant::now();

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let earned = (now.duration_since(*last_refill).as_secs_f64()
            * f64::from(self.tokens_per_second)) as u32;
        if earned == 0 {
            return;
        }

        let available = self.semaphore.available_permits() as u32;
        let earned = earned.min(self.max_tokens.saturating_sub(available));
        if earned > 0 {
            self.semaphore.add_permits(earned as usize);
        }
        *last_refill = now;
    }

    /// Run `f` under the limiter, retrying retryable failures with exponential backoff
    pub async fn execute<F, Fut, T>(&self, name: &str, mut f: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        let mut backoff = self.backoff;

        loop {
            self.acquire().await;
            debug!(request = name, attempt, tokens = self.available_tokens(), "upstream request");

            match f().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        request = name,
                        attempt,
                        max = self.max_retries,
                        "upstream request failed, retrying in {backoff:?}: {err}"
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn available_tokens(&self) -> usize {
        self.semaphore.available_permits()
    }
}

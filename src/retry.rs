use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;

/// Fixed-delay retry policy: no backoff, no jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    #[error("cancelled")]
    Cancelled,
}

impl From<&crate::config::Retry> for Retry {
    fn from(config: &crate::config::Retry) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

impl Retry {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or `max_attempts` attempts have been made.
    ///
    /// `op` receives the 1-based attempt number. Cancelling `cancel` aborts both a running
    /// attempt and a pending delay. A policy of zero attempts still makes one.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                result = op(attempt) => result,
            };

            let last = match result {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= max_attempts {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last,
                });
            }

            tracing::warn!(
                attempt,
                max_attempts,
                "Attempt failed, retrying in {:?}: {}",
                self.delay,
                last
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                _ = tokio::time::sleep(self.delay) => {}
            }

            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_attempts() {
        let retry = Retry::new(3, Duration::from_secs(1));
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = retry
            .run(&CancellationToken::new(), |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("unavailable") }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(RetryError::Exhausted {
                attempts: 3,
                last: "unavailable"
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_success() {
        let retry = Retry::new(5, Duration::from_millis(100));
        let started = tokio::time::Instant::now();

        let result = retry
            .run(&CancellationToken::new(), |attempt| async move {
                if attempt < 3 { Err("flaky") } else { Ok(attempt) }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_pending_delay() {
        let retry = Retry::new(5, Duration::from_secs(10));
        let cancel = CancellationToken::new();
        let attempts = Arc::new(AtomicU32::new(0));

        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(3)).await;
                cancel.cancel();
            }
        });

        let result: Result<(), _> = retry
            .run(&cancel, |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("unavailable") }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let retry = Retry::new(0, Duration::ZERO);

        let result: Result<u32, RetryError<&str>> =
            retry.run(&CancellationToken::new(), |_| async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
    }
}

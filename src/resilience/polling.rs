//! Polling a remote status until it reports success.
//!
//! # Responsibilities
//! - Call a status check up to `max_attempts` times, a fixed interval apart
//! - Resolve with a value extracted from the first successful snapshot
//! - Treat fetch errors and empty snapshots as spent attempts
//!
//! # Design Decisions
//! - Attempts are strictly sequential; the next fetch starts only after the
//!   previous one settles and the interval elapses
//! - No sleep before the first attempt or after the last
//! - Fetch errors are logged, never surfaced; exhaustion is its own error

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::PollingConfig;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(5000),
        }
    }
}

impl From<&PollingConfig> for PollSettings {
    fn from(config: &PollingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Polling timeout exceeded after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Polling cancelled")]
    Cancelled,
}

/// Poll with the given settings and no cancellation.
pub async fn poll_with_retries<S, T, E, F, Fut>(
    fetch_status: F,
    is_successful: impl Fn(&S) -> bool,
    extract_value: impl Fn(&S) -> Option<T>,
    settings: PollSettings,
) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<S>, E>>,
    E: Display,
{
    Poller::new(settings)
        .run(fetch_status, is_successful, extract_value)
        .await
}

/// A single poll run, optionally cancellable.
#[derive(Debug)]
pub struct Poller {
    settings: PollSettings,
    cancel: Option<broadcast::Receiver<()>>,
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            cancel: None,
        }
    }

    /// Abort the poll when a value arrives on `cancel`.
    pub fn with_cancellation(mut self, cancel: broadcast::Receiver<()>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub async fn run<S, T, E, F, Fut>(
        mut self,
        mut fetch_status: F,
        is_successful: impl Fn(&S) -> bool,
        extract_value: impl Fn(&S) -> Option<T>,
    ) -> Result<T, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<S>, E>>,
        E: Display,
    {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            self.check_cancelled()?;

            match fetch_status().await {
                Ok(Some(snapshot)) => {
                    if is_successful(&snapshot) {
                        if let Some(value) = extract_value(&snapshot) {
                            metrics::record_poll_attempt("success");
                            tracing::debug!(attempt, "Poll succeeded");
                            return Ok(value);
                        }
                        tracing::warn!(attempt, "Successful status carried no value");
                    }
                    metrics::record_poll_attempt("pending");
                }
                Ok(None) => {
                    metrics::record_poll_attempt("empty");
                    tracing::warn!(attempt, max_attempts, "No status returned");
                }
                Err(e) => {
                    metrics::record_poll_attempt("error");
                    tracing::warn!(attempt, max_attempts, error = %e, "Status check failed");
                }
            }

            if attempt < max_attempts {
                self.pause().await?;
            }
        }

        tracing::error!(max_attempts, "Polling timeout exceeded");
        Err(PollError::Timeout {
            attempts: max_attempts,
        })
    }

    fn check_cancelled(&mut self) -> Result<(), PollError> {
        let Some(cancel) = self.cancel.as_mut() else {
            return Ok(());
        };
        match cancel.try_recv() {
            Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => Err(PollError::Cancelled),
            Err(broadcast::error::TryRecvError::Closed) => {
                self.cancel = None;
                Ok(())
            }
            Err(broadcast::error::TryRecvError::Empty) => Ok(()),
        }
    }

    async fn pause(&mut self) -> Result<(), PollError> {
        let sleep = tokio::time::sleep(self.settings.interval);
        let Some(cancel) = self.cancel.as_mut() else {
            sleep.await;
            return Ok(());
        };
        tokio::pin!(sleep);

        let signal = tokio::select! {
            _ = &mut sleep => return Ok(()),
            signal = cancel.recv() => signal,
        };

        match signal {
            Err(broadcast::error::RecvError::Closed) => {
                // Sender gone; nobody can cancel any more.
                self.cancel = None;
                sleep.await;
                Ok(())
            }
            _ => {
                tracing::info!("Polling cancelled");
                Err(PollError::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::cancel::CancelSignal;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[derive(Debug, Clone)]
    struct Snapshot {
        done: bool,
        value: Option<&'static str>,
    }

    fn settings(max_attempts: u32) -> PollSettings {
        PollSettings {
            max_attempts,
            interval: Duration::from_millis(5000),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = poll_with_retries(
            move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok::<_, String>(Some(Snapshot {
                        done: n == 3,
                        value: Some("0xabc"),
                    }))
                }
            },
            |s: &Snapshot| s.done,
            |s: &Snapshot| s.value,
            settings(20),
        )
        .await;

        assert_eq!(result, Ok("0xabc"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_successful_times_out() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();

        let result: Result<&str, _> = poll_with_retries(
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(Some(Snapshot {
                        done: false,
                        value: None,
                    }))
                }
            },
            |s: &Snapshot| s.done,
            |s: &Snapshot| s.value,
            settings(4),
        )
        .await;

        assert_eq!(result, Err(PollError::Timeout { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Three gaps between four attempts.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(15000));
        assert!(elapsed < Duration::from_millis(20000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_count_as_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<&str, _> = poll_with_retries(
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<Option<Snapshot>, _>("connection reset")
                }
            },
            |s: &Snapshot| s.done,
            |s: &Snapshot| s.value,
            settings(5),
        )
        .await;

        assert_eq!(result, Err(PollError::Timeout { attempts: 5 }));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_value_keeps_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = poll_with_retries(
            move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == 1 {
                        return Ok::<_, String>(None);
                    }
                    Ok(Some(Snapshot {
                        done: true,
                        value: (n == 3).then_some("hash"),
                    }))
                }
            },
            |s: &Snapshot| s.done,
            |s: &Snapshot| s.value,
            settings(20),
        )
        .await;

        assert_eq!(result, Ok("hash"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_polling() {
        let signal = CancelSignal::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let poller = Poller::new(settings(20)).with_cancellation(signal.subscribe());
        let task = tokio::spawn(async move {
            poller
                .run(
                    move || {
                        let counter = counter.clone();
                        async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            Ok::<_, String>(Some(Snapshot {
                                done: false,
                                value: None,
                            }))
                        }
                    },
                    |s: &Snapshot| s.done,
                    |s: &Snapshot| s.value,
                )
                .await
        });

        tokio::time::sleep(Duration::from_millis(7500)).await;
        signal.cancel();

        assert_eq!(task.await.unwrap(), Err(PollError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_settings_from_config() {
        let config = PollingConfig {
            max_attempts: 3,
            interval_ms: 250,
        };
        let settings = PollSettings::from(&config);
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.interval, Duration::from_millis(250));
    }
}

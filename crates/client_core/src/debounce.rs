//! Collapses bursts of values into the last one, released after a quiet
//! window.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending value and restarts the quiet window.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Resolves with the pending value once its window has elapsed. Never
    /// resolves while nothing is pending.
    ///
    /// Cancel-safe: dropping the future keeps the pending value and deadline.
    pub async fn settled(&mut self) -> T {
        loop {
            let Some((_, deadline)) = &self.pending else {
                return std::future::pending().await;
            };
            sleep_until(*deadline).await;

            if let Some((value, deadline)) = self.pending.take() {
                if Instant::now() >= deadline {
                    return value;
                }
                self.pending = Some((value, deadline));
            }
        }
    }
}

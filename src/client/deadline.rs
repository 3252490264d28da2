//! Per-call deadline.
//!
//! A [`Deadline`] is armed when a call is issued and consumed by the one
//! future it guards. When the window elapses the guarded future is dropped,
//! which cancels the in-flight transport operation; the timer is released with
//! it. There is no other cancellation path.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{timeout_at, Instant};

/// A one-shot deadline for a single call.
#[derive(Debug)]
pub struct Deadline {
    at: Instant,
    window: Duration,
}

/// The guarded future did not complete inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {}ms elapsed", .window.as_millis())]
pub struct DeadlineElapsed {
    pub window: Duration,
}

impl Deadline {
    /// Arm a deadline `window` from now.
    pub fn after(window: Duration) -> Self {
        Self {
            at: Instant::now() + window,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Drive `fut` to completion or cancel it at the deadline.
    pub async fn guard<F>(self, fut: F) -> Result<F::Output, DeadlineElapsed>
    where
        F: Future,
    {
        timeout_at(self.at, fut)
            .await
            .map_err(|_| DeadlineElapsed { window: self.window })
    }
}

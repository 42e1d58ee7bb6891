// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Cancellation and deadline for one graph batch.
///
/// Both are checked before each chart; a batch that stops early returns no documents.
#[derive(Clone, Debug, Default)]
pub struct BatchControl {
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
}

impl BatchControl {
    /// No deadline, not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the batch once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops the batch once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Shares an existing cancel flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// The shared cancel flag.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self, completed: usize) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(Error::DeadlineExceeded { completed })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_control_passes() {
        assert!(BatchControl::new().check(0).is_ok(), "no deadline");
        let later = BatchControl::new().with_timeout(Duration::from_secs(3600));
        assert!(later.check(3).is_ok(), "deadline far away");
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let control = BatchControl::new();
        let other = control.clone();
        other.cancel();
        assert!(control.is_cancelled(), "flag is shared");
        assert!(matches!(control.check(0), Err(Error::Cancelled)), "cancelled");

        let flag = Arc::new(AtomicBool::new(false));
        let adopted = BatchControl::new().with_cancel_flag(Arc::clone(&flag));
        flag.store(true, Ordering::Relaxed);
        assert!(adopted.is_cancelled(), "adopted flag");
    }

    #[test]
    fn passed_deadline_reports_progress() {
        let control = BatchControl::new().with_deadline(Instant::now());
        assert!(
            matches!(control.check(4), Err(Error::DeadlineExceeded { completed: 4 })),
            "deadline"
        );
    }
}

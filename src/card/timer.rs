//! Cancellable timers on a caller-supplied clock
//!
//! The card never sleeps. Time is fed in from the frame loop (milliseconds,
//! same unit as `performance.now()`), and each delayed flag owns exactly one
//! handle, so re-arming replaces the pending deadline instead of stacking.

/// A one-shot deadline. Arming while pending overrides the old deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShot {
    due_at: Option<f64>,
}

impl OneShot {
    pub fn new() -> Self {
        Self { due_at: None }
    }

    /// Cancel any pending deadline and schedule a new one `delay` ms after `now`
    pub fn arm(&mut self, now: f64, delay: f64) {
        self.due_at = if now.is_finite() && delay.is_finite() {
            Some(now + delay.max(0.0))
        } else {
            None
        };
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now: f64) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

/// A fixed-period repeating timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: f64,
    next_due: Option<f64>,
}

impl Interval {
    /// Create a stopped interval. Non-positive periods are clamped to 1 ms.
    pub fn new(period: f64) -> Self {
        let period = if period.is_finite() && period > 0.0 {
            period
        } else {
            1.0
        };
        Self {
            period,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: f64) {
        if now.is_finite() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of periods that elapsed since the last poll.
    ///
    /// After a long stall (hidden tab) every overdue period is reported by a
    /// single poll and the next deadline stays on the period grid. The count
    /// saturates at `u32::MAX`.
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if !now.is_finite() || now < due {
            return 0;
        }
        let elapsed = ((now - due) / self.period).floor() + 1.0;
        self.next_due = Some(due + elapsed * self.period);
        // Float to int casts saturate
        elapsed as u32
    }
}

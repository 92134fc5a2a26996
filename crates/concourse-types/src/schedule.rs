//! Virtual-clock timer primitives.
//!
//! The engine has no background threads and no OS timers: all time comes
//! from the host render loop's `update(time, delta)` callback as a
//! monotonic wall-clock in milliseconds. Components own [`Interval`] and
//! [`OneShot`] values as plain fields and poll them each frame, so a
//! component's `destroy()` cancels every timer it owns synchronously by
//! cancelling the fields -- there is nothing registered anywhere else.
//!
//! Ordering between timers owned by different components within the same
//! frame is the fan-out order of the engine, not a guarantee; components
//! must not rely on whose timer polls first.

/// A repeating timer on the virtual clock.
///
/// The interval arms itself on the first poll and fires once per elapsed
/// period afterwards, independent of the frame cadence. If several
/// periods elapse between polls (a long frame), the interval fires once
/// and re-anchors at the current time rather than bursting to catch up.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// Fire period in milliseconds.
    period_ms: f64,
    /// Next due time; `None` until armed by the first poll.
    due: Option<f64>,
    /// Cancelled intervals never fire and never re-arm.
    cancelled: bool,
}

impl Interval {
    /// Create an interval with the given period in milliseconds.
    ///
    /// Non-positive periods are treated as a 1 ms period rather than
    /// firing every poll.
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            due: None,
            cancelled: false,
        }
    }

    /// Poll the interval at the current virtual time.
    ///
    /// Returns `true` when a full period has elapsed since the previous
    /// fire (or since arming). The first poll arms the interval and
    /// returns `false`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.cancelled {
            return false;
        }
        match self.due {
            None => {
                self.due = Some(now_ms + self.period_ms);
                false
            }
            Some(due) if now_ms >= due => {
                self.due = Some(now_ms + self.period_ms);
                true
            }
            Some(_) => false,
        }
    }

    /// Cancel the interval. Idempotent; a cancelled interval never fires.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
        self.due = None;
    }

    /// Whether the interval has been cancelled.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The configured period in milliseconds.
    pub const fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

/// A single-fire delayed callback slot on the virtual clock.
///
/// Scheduling while already pending replaces the previous deadline --
/// the delayed-callback equivalent of a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShot {
    /// Due time; `None` when idle or already fired.
    due: Option<f64>,
}

impl OneShot {
    /// Create an idle one-shot.
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Arm the one-shot to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.due = Some(now_ms + delay_ms.max(0.0));
    }

    /// Poll at the current virtual time. Returns `true` exactly once,
    /// on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due {
            Some(due) if now_ms >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel without firing. Idempotent; safe on an idle one-shot.
    pub const fn cancel(&mut self) {
        self.due = None;
    }

    /// Whether a fire is still pending.
    pub const fn is_pending(&self) -> bool {
        self.due.is_some()
    }
}

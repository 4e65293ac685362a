//! Host-driven resize debouncing.
//!
//! The debouncer owns no timer. Callers report events and poll with
//! timestamps from whatever monotonic clock they have (`performance.now()`
//! in a browser, a fake clock in tests), which keeps it deterministic.

use std::time::Duration;

/// Collapses bursts of events into a single firing after a quiet period.
///
/// At most one deadline is pending; every new event replaces it.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use fletch::Debouncer;
/// let ms = Duration::from_millis;
/// let mut debouncer = Debouncer::new(ms(100));
///
/// debouncer.schedule(ms(0));
/// debouncer.schedule(ms(60));
/// assert!(!debouncer.fire_due(ms(120)));
/// assert!(debouncer.fire_due(ms(160)));
/// assert!(!debouncer.fire_due(ms(400)));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Records an event at `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.quiet));
    }

    /// Returns the pending deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns true if an event is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the pending deadline if it has passed at `now`.
    ///
    /// Returns true exactly once per burst of events.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// The one host timer armed on behalf of a [`Debouncer`].
///
/// Hosts with real timers (`setTimeout` in a browser) arm a timer for the
/// debouncer's deadline. A new event moves the deadline, so the old timer is
/// superseded: [`TimerSlot::arm`] hands it back and the host cancels it.
#[derive(Debug)]
pub struct TimerSlot<H> {
    handle: Option<H>,
}

impl<H> Default for TimerSlot<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H> TimerSlot<H> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the timeout to request so a timer armed at `now` fires no
    /// earlier than `deadline`.
    ///
    /// Rounds up to whole milliseconds and saturates at `i32::MAX`, the
    /// largest delay `setTimeout` accepts.
    pub fn timeout_millis(now: Duration, deadline: Duration) -> i32 {
        let micros = deadline.saturating_sub(now).as_micros();
        i32::try_from(micros.div_ceil(1_000)).unwrap_or(i32::MAX)
    }

    /// Records a newly armed timer and returns the one it supersedes.
    pub fn arm(&mut self, handle: H) -> Option<H> {
        self.handle.replace(handle)
    }

    /// Removes the pending timer, returning it for cancellation.
    pub fn take(&mut self) -> Option<H> {
        self.handle.take()
    }

    /// Returns true if a timer is armed.
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

//! Idle countdown with warning and expiry deadlines
//!
//! The timer holds at most one pending warning and one pending expiry.
//! Scheduling always replaces the previous handle, so a reset can never
//! leave a stale expiry behind. Deadlines are absolute wall-clock
//! milliseconds; whoever drives the timer calls [`SessionTimer::fire_due`]
//! once the earliest of them has passed.

use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::session::{remaining_at, SessionClock};
use crate::store::KeyValueStore;

/// Deadline reached by the timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Warning boundary (two minutes before expiry)
    Warning,
    /// Expiry boundary
    Expired,
}

/// A pending one-shot deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    fire_at: i64,
}

/// Session countdown bound to a persisted [`SessionClock`]
pub struct SessionTimer {
    clock: Arc<dyn Clock>,
    store: Arc<dyn KeyValueStore>,
    warning: Option<Scheduled>,
    expiry: Option<Scheduled>,
}

impl SessionTimer {
    /// Create an idle (unscheduled) timer
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            store,
            warning: None,
            expiry: None,
        }
    }

    /// Persist "now" as the start of a fresh idle period and schedule it
    pub fn start(&mut self) -> SessionClock {
        let clock = SessionClock::new(self.clock.now_millis());
        clock.save(self.store.as_ref());
        self.schedule(clock);
        clock
    }

    /// Cancel pending deadlines and start again
    pub fn reset(&mut self) -> SessionClock {
        self.cancel_pending();
        self.start()
    }

    /// Schedule deadlines for an already persisted clock
    ///
    /// A clock older than the timeout makes expiry due immediately.
    pub fn resume(&mut self, clock: SessionClock) {
        self.schedule(clock);
    }

    /// Cancel pending deadlines and clear the persisted clock
    pub fn cancel(&mut self) {
        self.cancel_pending();
        SessionClock::clear(self.store.as_ref());
    }

    /// Cancel pending deadlines, leaving the persisted clock in place
    pub fn cancel_pending(&mut self) {
        let had_warning = self.warning.take().is_some();
        let had_expiry = self.expiry.take().is_some();
        if had_warning || had_expiry {
            debug!("Cancelled pending session deadlines");
        }
    }

    /// Milliseconds left according to the persisted clock
    pub fn remaining(&self) -> u64 {
        let start = SessionClock::load(self.store.as_ref()).map(|c| c.start_epoch_millis);
        remaining_at(start, self.clock.now_millis())
    }

    /// Whether any deadline is pending
    pub fn is_armed(&self) -> bool {
        self.warning.is_some() || self.expiry.is_some()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<i64> {
        [self.warning, self.expiry]
            .into_iter()
            .flatten()
            .map(|s| s.fire_at)
            .min()
    }

    /// Fire the deadline that is due at `now_millis`, if any
    ///
    /// Deadlines fire once. When expiry is due the warning is dropped with
    /// it, since there is nothing left to warn about.
    pub fn fire_due(&mut self, now_millis: i64) -> Option<TimerEvent> {
        if matches!(self.expiry, Some(s) if s.fire_at <= now_millis) {
            self.warning = None;
            self.expiry = None;
            return Some(TimerEvent::Expired);
        }

        if matches!(self.warning, Some(s) if s.fire_at <= now_millis) {
            self.warning = None;
            return Some(TimerEvent::Warning);
        }

        None
    }

    fn schedule(&mut self, clock: SessionClock) {
        let previous_warning = self.warning.replace(Scheduled {
            fire_at: clock.warning_at(),
        });
        let previous_expiry = self.expiry.replace(Scheduled {
            fire_at: clock.expires_at(),
        });
        if previous_warning.is_some() || previous_expiry.is_some() {
            debug!("Replaced pending session deadlines");
        }
        debug!(
            "Session deadlines: warning at {}, expiry at {}",
            clock.warning_at(),
            clock.expires_at()
        );
    }
}

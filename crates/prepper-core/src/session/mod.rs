//! Session lifecycle: activity throttling, idle countdown and sign-out
//!
//! # Lifecycle
//!
//! - Sign-in starts (or resumes) a 15 minute idle countdown
//! - Accepted activity restarts the countdown
//! - 13 minutes into an idle period a warning is raised
//! - 15 minutes into an idle period the session is force-signed-out
//! - A persisted countdown that is already past expiry on sign-in is
//!   treated exactly like expiry

mod activity;
mod controller;
mod remaining;
mod timer;

pub use activity::{ActivityMonitor, ActivitySignal, Interaction};
pub use controller::{SessionController, WarningChoice};
pub use remaining::{format_remaining, get_remaining, remaining_at};
pub use timer::{SessionTimer, TimerEvent};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::KeyValueStore;
use crate::{SESSION_STORAGE_KEY, SESSION_TIMEOUT_MS, WARNING_WINDOW_MS};

/// Persisted start of the current idle period
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    /// Wall-clock time of the last reset (Unix milliseconds)
    pub start_epoch_millis: i64,
}

impl SessionClock {
    /// Create a clock starting at `start_epoch_millis`
    pub fn new(start_epoch_millis: i64) -> Self {
        Self { start_epoch_millis }
    }

    /// Parse the stored representation (decimal milliseconds)
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self::new)
    }

    /// Read the clock from `store`
    ///
    /// Unreadable stores and unparseable values both count as "no clock".
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = match store.get(SESSION_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read session clock: {}", e);
                return None;
            }
        };

        let clock = Self::parse(&raw);
        if clock.is_none() {
            warn!("Ignoring malformed session clock value {:?}", raw);
        }
        clock
    }

    /// Write the clock to `store`, logging failures
    pub fn save(&self, store: &dyn KeyValueStore) {
        if let Err(e) = store.set(SESSION_STORAGE_KEY, &self.start_epoch_millis.to_string()) {
            warn!("Failed to persist session clock: {}", e);
        }
    }

    /// Delete any stored clock, logging failures
    pub fn clear(store: &dyn KeyValueStore) {
        if let Err(e) = store.remove(SESSION_STORAGE_KEY) {
            warn!("Failed to clear session clock: {}", e);
        }
    }

    /// Milliseconds since the idle period started
    pub fn elapsed(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.start_epoch_millis)
    }

    /// Milliseconds left before expiry
    pub fn remaining(&self, now_millis: i64) -> u64 {
        remaining_at(Some(self.start_epoch_millis), now_millis)
    }

    /// Whether the warning window has been entered
    pub fn is_warning(&self, now_millis: i64) -> bool {
        self.remaining(now_millis) <= WARNING_WINDOW_MS
    }

    /// Whether the idle period has run out
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.remaining(now_millis) == 0
    }

    /// Whether the clock was already past expiry when loaded
    pub fn is_stale(&self, now_millis: i64) -> bool {
        self.elapsed(now_millis) >= SESSION_TIMEOUT_MS as i64
    }

    /// Absolute time of the warning boundary
    pub fn warning_at(&self) -> i64 {
        self.start_epoch_millis
            .saturating_add((SESSION_TIMEOUT_MS - WARNING_WINDOW_MS) as i64)
    }

    /// Absolute time of the expiry boundary
    pub fn expires_at(&self) -> i64 {
        self.start_epoch_millis
            .saturating_add(SESSION_TIMEOUT_MS as i64)
    }

    /// Whether the clock starts after `now_millis` (skew or a foreign writer)
    pub fn is_future(&self, now_millis: i64) -> bool {
        self.start_epoch_millis > now_millis
    }
}

/// Why a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutReason {
    /// Idle deadline passed while running
    Expired,
    /// Persisted clock was already past expiry at sign-in
    StaleOnLoad,
    /// User chose to sign out (warning dialog or explicit action)
    UserRequested,
}

impl SignOutReason {
    /// Whether the sign-out was not directly requested by the user
    pub fn is_forced(&self) -> bool {
        !matches!(self, SignOutReason::UserRequested)
    }
}

/// Notifications emitted by the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Fresh countdown started on sign-in
    Started { start_epoch_millis: i64 },
    /// Countdown resumed from a persisted clock
    Resumed { start_epoch_millis: i64 },
    /// Countdown restarted by activity, refresh or "stay signed in"
    Reset { start_epoch_millis: i64 },
    /// Warning boundary reached; the user should be asked to stay or leave
    WarningRaised { remaining_ms: u64 },
    /// An open warning no longer applies
    WarningDismissed,
    /// Session ended and local state was cleared
    SignedOut { reason: SignOutReason },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const MINUTE: i64 = 60 * 1000;

    #[test]
    fn test_clock_boundaries() {
        let clock = SessionClock::new(0);
        assert_eq!(clock.warning_at(), 13 * MINUTE);
        assert_eq!(clock.expires_at(), 15 * MINUTE);

        assert!(!clock.is_warning(13 * MINUTE - 1));
        assert!(clock.is_warning(13 * MINUTE));
        assert!(!clock.is_expired(15 * MINUTE - 1));
        assert!(clock.is_expired(15 * MINUTE));
        assert!(clock.is_stale(15 * MINUTE));
        assert!(!clock.is_stale(15 * MINUTE - 1));
    }

    #[test]
    fn test_extreme_clock_boundaries_saturate() {
        let clock = SessionClock::new(i64::MAX);
        assert_eq!(clock.warning_at(), i64::MAX);
        assert_eq!(clock.expires_at(), i64::MAX);
        assert!(clock.is_future(0));
        assert!(!clock.is_stale(0));
        assert!(!SessionClock::new(0).is_future(0));
    }

    #[test]
    fn test_clock_parse() {
        assert_eq!(SessionClock::parse("1700000000000"), Some(SessionClock::new(1_700_000_000_000)));
        assert_eq!(SessionClock::parse(" 42\n"), Some(SessionClock::new(42)));
        assert_eq!(SessionClock::parse("yesterday"), None);
        assert_eq!(SessionClock::parse(""), None);
    }

    #[test]
    fn test_clock_load_save_clear() {
        let store = MemoryStore::new();
        assert_eq!(SessionClock::load(&store), None);

        SessionClock::new(1234).save(&store);
        assert_eq!(
            store.get(SESSION_STORAGE_KEY).unwrap().as_deref(),
            Some("1234")
        );
        assert_eq!(SessionClock::load(&store), Some(SessionClock::new(1234)));

        SessionClock::clear(&store);
        assert_eq!(SessionClock::load(&store), None);
    }

    #[test]
    fn test_malformed_clock_loads_as_absent() {
        let store = MemoryStore::new();
        store.set(SESSION_STORAGE_KEY, "NaN").unwrap();
        assert_eq!(SessionClock::load(&store), None);
    }

    #[test]
    fn test_sign_out_reason_forced() {
        assert!(SignOutReason::Expired.is_forced());
        assert!(SignOutReason::StaleOnLoad.is_forced());
        assert!(!SignOutReason::UserRequested.is_forced());
    }
}

//! Activity detection with a leading-edge throttle
//!
//! The first interaction after a quiet period produces a signal straight
//! away; anything within the throttle window of that signal is swallowed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ACTIVITY_THROTTLE_MS;

/// Kinds of user interaction that count as presence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

impl Interaction {
    /// Every interaction kind the monitor listens for
    pub const ALL: [Interaction; 6] = [
        Interaction::PointerDown,
        Interaction::PointerMove,
        Interaction::KeyPress,
        Interaction::Scroll,
        Interaction::TouchStart,
        Interaction::Click,
    ];
}

/// Coalesced "the user is still here" notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivitySignal {
    /// Interaction that opened the window
    pub kind: Interaction,
    /// Wall-clock time of the signal (Unix milliseconds)
    pub at_millis: i64,
}

/// Throttles raw interactions into activity signals
#[derive(Clone, Debug)]
pub struct ActivityMonitor {
    /// Throttle window length
    window_ms: u64,
    /// Time of the last emitted signal
    last_signal: Option<i64>,
    /// Whether listeners are attached
    attached: bool,
    /// Interactions swallowed by the throttle since attach
    coalesced: u64,
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityMonitor {
    /// Create a detached monitor with the standard one second window
    pub fn new() -> Self {
        Self::with_window(ACTIVITY_THROTTLE_MS)
    }

    /// Create a detached monitor with a custom window
    pub fn with_window(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_signal: None,
            attached: false,
            coalesced: 0,
        }
    }

    /// Start listening
    pub fn attach(&mut self) {
        if !self.attached {
            debug!("Activity monitor attached");
        }
        self.attached = true;
    }

    /// Stop listening and forget the throttle window
    pub fn detach(&mut self) {
        if self.attached {
            debug!("Activity monitor detached ({} coalesced)", self.coalesced);
        }
        self.attached = false;
        self.last_signal = None;
        self.coalesced = 0;
    }

    /// Whether listeners are attached
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Interactions swallowed since the monitor was attached
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Feed one interaction; returns a signal when it opens a new window
    pub fn observe(&mut self, kind: Interaction, now_millis: i64) -> Option<ActivitySignal> {
        if !self.attached {
            return None;
        }

        if let Some(last) = self.last_signal {
            let since = now_millis.saturating_sub(last);
            // A clock that moved backwards re-opens the window
            if (0..self.window_ms as i64).contains(&since) {
                self.coalesced += 1;
                return None;
            }
        }

        self.last_signal = Some(now_millis);
        Some(ActivitySignal {
            kind,
            at_millis: now_millis,
        })
    }
}

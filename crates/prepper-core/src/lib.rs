//! Prepper Core - Client-side session lifecycle for ML Interview Prepper
//!
//! This crate keeps an authenticated user's idle-timeout countdown: it
//! throttles interaction events into activity signals, persists the start of
//! the current idle period so a restart resumes rather than restarts, raises
//! a warning shortly before expiry and forces a local sign-out when the
//! deadline passes.
//!
//! Collaborators (identity provider, key-value store, navigation, clock) are
//! injected as trait objects so the lifecycle runs without a real browser or
//! terminal.

pub mod clock;
pub mod error;
pub mod history;
pub mod identity;
pub mod runtime;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PrepperError, Result};
pub use history::{ChallengeHistory, ChallengeKind, ChallengeSummary, UserStats};
pub use identity::{IdentityProvider, Navigator};
pub use runtime::{SessionDriver, SessionHandle, SessionInput};
pub use session::{
    format_remaining, get_remaining, remaining_at, ActivityMonitor, ActivitySignal, Interaction,
    SessionClock, SessionController, SessionEvent, SessionTimer, SignOutReason, TimerEvent,
    WarningChoice,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Idle time after which the session is force-signed-out (15 minutes)
pub const SESSION_TIMEOUT_MS: u64 = 15 * 60 * 1000;

/// Warning is raised this long before expiry (2 minutes)
pub const WARNING_WINDOW_MS: u64 = 2 * 60 * 1000;

/// Interaction events closer than this to the last signal are coalesced
pub const ACTIVITY_THROTTLE_MS: u64 = 1000;

/// Store key holding the session clock
pub const SESSION_STORAGE_KEY: &str = "session_start_time";

/// Unauthenticated entry point
pub const LANDING_ROUTE: &str = "/";

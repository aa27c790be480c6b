//! Application state

use prepper_core::{format_remaining, SignOutReason};

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Unauthenticated entry point
    #[default]
    Landing,

    /// Signed-in home
    Dashboard,
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub current_screen: Screen,

    /// Signed-in user, if any
    pub user: Option<String>,

    /// Milliseconds left when the open warning was raised
    pub warning: Option<u64>,

    /// Last countdown reading
    pub remaining_ms: u64,

    /// Status message to display
    pub status_message: Option<String>,

    /// Error message to display
    pub error_message: Option<String>,
}

impl AppState {
    /// Create new application state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the expiry warning dialog is showing
    pub fn is_warning_open(&self) -> bool {
        self.warning.is_some()
    }

    /// Countdown as shown in the status bar
    pub fn session_time(&self) -> Option<String> {
        (self.current_screen == Screen::Dashboard).then(|| format_remaining(self.remaining_ms))
    }

    /// Record why the session ended
    pub fn signed_out(&mut self, reason: SignOutReason) {
        self.current_screen = Screen::Landing;
        self.user = None;
        self.warning = None;
        self.remaining_ms = 0;
        self.status_message = Some(
            match reason {
                SignOutReason::Expired => "Signed out after 15 minutes of inactivity",
                SignOutReason::StaleOnLoad => "Your previous session expired",
                SignOutReason::UserRequested => "Signed out",
            }
            .to_string(),
        );
    }

    /// Clear status messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{AppState, Screen};

/// Main render function - delegates to appropriate screen, then overlays
/// the expiry warning when one is open
pub fn render(frame: &mut Frame, state: &AppState) {
    match state.current_screen {
        Screen::Landing => screens::landing::render(frame, state),
        Screen::Dashboard => screens::dashboard::render(frame, state),
    }

    if let Some(remaining_ms) = state.warning {
        let area = frame.area();
        components::confirm::WarningDialog::new(remaining_ms).render(
            frame,
            area,
            &Theme::default(),
        );
    }
}

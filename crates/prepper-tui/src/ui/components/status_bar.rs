//! Status bar component

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::ui::Theme;

/// Session status indicators
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// Signed-in user
    pub user: Option<String>,
    /// Session remaining time (formatted)
    pub session_time: Option<String>,
    /// Raw remaining time, for coloring
    pub remaining_ms: u64,
    /// Message to show in the middle
    pub message: Option<String>,
    /// Whether the message is an error
    pub is_error: bool,
}

impl SessionStatus {
    /// Status indicators for the current state
    pub fn from_state(state: &AppState) -> Self {
        let (message, is_error) = match (&state.error_message, &state.status_message) {
            (Some(error), _) => (Some(error.clone()), true),
            (None, Some(status)) => (Some(status.clone()), false),
            (None, None) => (None, false),
        };

        Self {
            user: state.user.clone(),
            session_time: state.session_time(),
            remaining_ms: state.remaining_ms,
            message,
            is_error,
        }
    }
}

/// Render the status bar
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &SessionStatus, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Split into sections
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(inner);

    // Left: who is signed in
    let (indicator, label, style) = match &status.user {
        Some(user) => ("●", user.as_str(), theme.success()),
        None => ("○", "Signed out", theme.text_muted()),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{} {}", indicator, label), style)),
        chunks[0],
    );

    // Center: message
    if let Some(message) = &status.message {
        let style = if status.is_error {
            theme.danger()
        } else {
            theme.text()
        };
        let center = Paragraph::new(message.as_str())
            .style(style)
            .alignment(Alignment::Center);
        frame.render_widget(center, chunks[1]);
    }

    // Right: Session time
    if let Some(time) = &status.session_time {
        let session_text = format!("Session: {}", time);
        let session = Paragraph::new(session_text)
            .style(theme.countdown(status.remaining_ms))
            .alignment(Alignment::Right);
        frame.render_widget(session, chunks[2]);
    }
}

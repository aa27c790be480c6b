//! Session expiry warning dialog

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use prepper_core::format_remaining;

use crate::ui::{layout::centered_rect, Theme};

/// Modal asking whether to keep the session
pub struct WarningDialog {
    /// Milliseconds left when the warning was raised
    pub remaining_ms: u64,
}

impl WarningDialog {
    /// Dialog for a warning raised with `remaining_ms` left
    pub fn new(remaining_ms: u64) -> Self {
        Self { remaining_ms }
    }

    /// Prompt text
    pub fn message(&self) -> String {
        format!(
            "Your session will expire in {}.\n\nDo you want to stay signed in?",
            format_remaining(self.remaining_ms)
        )
    }

    /// Render the dialog
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(60, 40, area);

        // Clear the background
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Session Expiring ")
            .title_style(theme.warning())
            .borders(Borders::ALL)
            .border_style(theme.warning());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(3),    // Message
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        let message_widget = Paragraph::new(self.message())
            .style(theme.text())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message_widget, chunks[0]);

        let help_widget = Paragraph::new("[Y] Stay signed in    [N] Sign out")
            .style(theme.text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(help_widget, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_uses_formatted_remaining() {
        let dialog = WarningDialog::new(120_000);
        assert!(dialog.message().starts_with("Your session will expire in 2m."));
    }
}

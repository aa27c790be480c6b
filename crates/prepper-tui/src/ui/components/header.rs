//! Header component

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render the header bar
pub fn render(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let now = chrono::Local::now();
    let time_str = now.format("%H:%M").to_string();

    let header_text = Line::from(vec![
        Span::styled(
            " ML INTERVIEW PREPPER ",
            Style::default()
                .fg(theme.text_primary)
                .bg(theme.brand)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(title, theme.text().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(area.width.saturating_sub(title.len() as u16 + 30) as usize)),
        Span::styled(format!(" {} ", time_str), theme.text_secondary()),
    ]);

    let header = Paragraph::new(header_text).style(Style::default().bg(theme.brand_dark));

    frame.render_widget(header, area);
}

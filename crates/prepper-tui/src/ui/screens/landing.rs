//! Landing screen shown while signed out

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::{AppState, Router, Screen};
use crate::ui::components::{header, status_bar};
use crate::ui::layout::{centered_rect, render_footer, section_block, ScreenLayout};
use crate::ui::Theme;

/// Render the landing screen
pub fn render(frame: &mut Frame, state: &AppState) {
    let theme = Theme::default();
    let layout = ScreenLayout::new(frame.area());

    header::render(
        frame,
        layout.header,
        Router::screen_title(Screen::Landing),
        &theme,
    );

    let area = centered_rect(70, 60, layout.content);
    let block = section_block("Welcome", &theme);

    let text = vec![
        Line::styled("Practice ML interviews at your own pace", theme.title()),
        Line::raw(""),
        Line::styled(
            "Generate multiple-choice and scenario challenges on the topics you choose, \
             then review your history and progress.",
            theme.text_secondary(),
        ),
        Line::raw(""),
        Line::styled(
            "Sessions end after 15 minutes without activity.",
            theme.text_muted(),
        ),
    ];

    let body = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);

    status_bar::render_status_bar(
        frame,
        layout.status,
        &status_bar::SessionStatus::from_state(state),
        &theme,
    );
    render_footer(frame, layout.footer, &[("Enter", "Sign in"), ("q", "Quit")], &theme);
}

//! Dashboard screen

use ratatui::prelude::*;
use ratatui::widgets::{Gauge, Paragraph};

use prepper_core::{format_remaining, SESSION_TIMEOUT_MS};

use crate::app::{AppState, Router, Screen};
use crate::ui::components::{header, status_bar};
use crate::ui::layout::{render_footer, section_block, ScreenLayout};
use crate::ui::Theme;

/// Render the dashboard screen
pub fn render(frame: &mut Frame, state: &AppState) {
    let theme = Theme::default();
    let layout = ScreenLayout::new(frame.area());

    header::render(
        frame,
        layout.header,
        Router::screen_title(Screen::Dashboard),
        &theme,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(layout.content);

    let greeting = match &state.user {
        Some(user) => format!("Welcome back, {}", user),
        None => "Welcome back".to_string(),
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(greeting, theme.title()),
            Line::styled("Pick up a challenge or review your history.", theme.text_secondary()),
        ]),
        chunks[0],
    );

    let ratio = (state.remaining_ms as f64 / SESSION_TIMEOUT_MS as f64).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(section_block("Session", &theme))
        .gauge_style(theme.countdown(state.remaining_ms))
        .ratio(ratio)
        .label(format!("{} left", format_remaining(state.remaining_ms)));
    frame.render_widget(gauge, chunks[1]);

    status_bar::render_status_bar(
        frame,
        layout.status,
        &status_bar::SessionStatus::from_state(state),
        &theme,
    );
    render_footer(
        frame,
        layout.footer,
        &[("r", "Refresh session"), ("s", "Sign out"), ("q", "Quit")],
        &theme,
    );
}

//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Prepper color palette
pub struct Theme {
    // Primary branding colors
    pub brand: Color,
    pub brand_dark: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    // UI element colors
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Primary branding - indigo
            brand: Color::Rgb(99, 102, 241),     // #6366F1
            brand_dark: Color::Rgb(30, 27, 75),  // #1E1B4B

            // Status colors
            success: Color::Rgb(76, 175, 80), // #4CAF50 - Green
            warning: Color::Rgb(255, 152, 0), // #FF9800 - Orange
            danger: Color::Rgb(244, 67, 54),  // #F44336 - Red

            // UI elements
            border: Color::Rgb(66, 66, 66),            // #424242
            text_primary: Color::Rgb(250, 250, 250),   // #FAFAFA
            text_secondary: Color::Rgb(189, 189, 189), // #BDBDBD
            text_muted: Color::Rgb(117, 117, 117),     // #757575
        }
    }
}

impl Theme {
    /// Get default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get secondary text style
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get muted text style
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Get highlighted text style
    pub fn text_highlight(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get success style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Get warning style
    pub fn warning(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Get danger style
    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Countdown style, turning to warning colors inside the warning window
    pub fn countdown(&self, remaining_ms: u64) -> Style {
        if remaining_ms <= prepper_core::WARNING_WINDOW_MS {
            self.warning()
        } else {
            self.text_secondary()
        }
    }
}

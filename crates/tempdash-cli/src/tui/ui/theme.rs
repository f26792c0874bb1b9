//! Color palette and shared styles for the TUI.
//!
//! A warm palette (orange accents on stone greys) from the Tailwind scale.
//! Focused borders reuse `primary`; analysis answers reuse `success`.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Application theme with all UI colors.
#[derive(Debug, Clone, Copy)]
pub struct AppTheme {
    pub primary: Color,

    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Unfocused panel borders.
    pub border: Color,
    pub bg_selected: Color,
    pub bg_header: Color,

    /// Temperature trend line.
    pub chart_line: Color,
    /// Prefix of the user's chat messages.
    pub chat_user: Color,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl AppTheme {
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Rgb(251, 146, 60), // orange-400
            success: Color::Rgb(52, 211, 153), // emerald-400
            warning: Color::Rgb(253, 224, 71), // yellow-300
            danger: Color::Rgb(244, 63, 94),   // rose-500
            text_primary: Color::Rgb(250, 250, 249),   // stone-50
            text_secondary: Color::Rgb(168, 162, 158), // stone-400
            text_muted: Color::Rgb(120, 113, 108),     // stone-500
            border: Color::Rgb(87, 83, 78),            // stone-600
            bg_selected: Color::Rgb(68, 64, 60),       // stone-700
            bg_header: Color::Rgb(41, 37, 36),         // stone-800
            chart_line: Color::Rgb(251, 113, 133), // rose-400
            chat_user: Color::Rgb(56, 189, 248),   // sky-400
        }
    }

    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Rgb(234, 88, 12), // orange-600
            success: Color::Rgb(5, 150, 105), // emerald-600
            warning: Color::Rgb(202, 138, 4), // yellow-600
            danger: Color::Rgb(190, 18, 60),  // rose-700
            text_primary: Color::Rgb(28, 25, 23),      // stone-900
            text_secondary: Color::Rgb(87, 83, 78),    // stone-600
            text_muted: Color::Rgb(168, 162, 158),     // stone-400
            border: Color::Rgb(214, 211, 209),         // stone-300
            bg_selected: Color::Rgb(231, 229, 228),    // stone-200
            bg_header: Color::Rgb(245, 245, 244),      // stone-100
            chart_line: Color::Rgb(225, 29, 72), // rose-600
            chat_user: Color::Rgb(2, 132, 199),  // sky-600
        }
    }

    /// Border style for a panel, in the accent color when it has focus.
    #[must_use]
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.primary } else { self.border })
    }

    #[must_use]
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.bg_selected)
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default().bg(self.bg_header)
    }
}

/// Default border type for all blocks.
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_border_uses_accent() {
        let theme = AppTheme::dark();
        assert_eq!(theme.border_style(true).fg, Some(theme.primary));
        assert_eq!(theme.border_style(false).fg, Some(theme.border));
    }

    #[test]
    fn test_light_and_dark_differ() {
        assert_ne!(AppTheme::dark().text_primary, AppTheme::light().text_primary);
    }
}

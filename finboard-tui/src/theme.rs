//! Dark dashboard theme for the Finboard TUI
//!
//! # Color Palette
//! - **Background**: Deep charcoal (base layer)
//! - **Accent**: Warm coral, the first palette color (titles, focus)
//! - **Negative**: Coral red (errors)
//! - **Warning**: Amber (rows without ids, soft failures)
//! - **Neutral**: Slate blue (selection)
//! - **Muted**: Gray-blue (hints, disabled)

use ratatui::style::{Color, Modifier, Style};

use finboard_core::RowRole;

use crate::app::StatusLevel;

/// Finboard TUI theme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Deep charcoal background (primary surface)
    pub background: Color,
    /// Coral accent (focus, highlights)
    pub accent: Color,
    /// Coral red (errors)
    pub negative: Color,
    /// Amber (warnings)
    pub warning: Color,
    /// Slate blue (selection background)
    pub neutral: Color,
    /// Gray-blue (muted text)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (secondary text)
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashboard_dark()
    }
}

impl Theme {
    pub fn dashboard_dark() -> Self {
        Self {
            background: Color::Rgb(24, 22, 21),
            accent: Color::Rgb(237, 107, 83),
            negative: Color::Rgb(237, 107, 83),
            warning: Color::Rgb(255, 166, 48),
            neutral: Color::Rgb(70, 63, 110),
            muted: Color::Rgb(120, 130, 150),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Terminal color for a palette marker.
    pub fn marker(&self, color: finboard_core::Color) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }

    pub fn status_color(&self, level: StatusLevel) -> Color {
        match level {
            StatusLevel::Info => self.accent,
            StatusLevel::Warning => self.warning,
            StatusLevel::Error => self.negative,
        }
    }

    /// Header and summary rows bold; header also in the accent color.
    pub fn row_style(&self, role: RowRole, selected: bool) -> Style {
        let mut style = match role {
            RowRole::Header => Style::default().fg(self.accent),
            RowRole::Normal | RowRole::Summary => Style::default().fg(self.text_primary),
        };
        if role.is_emphasized() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if selected {
            style = style.bg(self.neutral);
        }
        style
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

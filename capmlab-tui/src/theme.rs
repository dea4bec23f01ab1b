//! Parrot/neon theme tokens for the CAPM Lab TUI
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, highlights, the SML itself)
//! - **Positive**: Neon green (results, returns above the risk-free rate)
//! - **Negative**: Hot pink (errors, returns below the risk-free rate)
//! - **Warning**: Neon orange (cancellations, the highlighted asset)
//! - **Neutral**: Cool purple (market return)
//! - **Muted**: Steel blue (secondary text)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Colour an expected return against the risk-free rate it was built on.
pub fn return_style(expected_pct: f64, risk_free_pct: f64) -> Style {
    if expected_pct >= risk_free_pct {
        positive()
    } else {
        negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_style_splits_on_risk_free() {
        assert_eq!(return_style(8.0, 2.0), positive());
        assert_eq!(return_style(2.0, 2.0), positive());
        assert_eq!(return_style(1.0, 2.0), negative());
    }

    #[test]
    fn active_panel_uses_accent() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}

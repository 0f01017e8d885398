//! Parrot/neon palette and style helpers.
//!
//! Rising bars and gains are green, falling bars and losses are pink. The
//! bar the cursor is on is drawn in yellow.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const GREEN: Color = Color::Rgb(0, 255, 128);
pub const PINK: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);
pub const HIGHLIGHT: Color = Color::Rgb(255, 230, 0);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(PINK)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn up() -> Color {
    GREEN
}

pub fn down() -> Color {
    PINK
}

pub fn highlight() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Colour for a signed money or percentage value.
pub fn signed(value: f64) -> Style {
    if value > 0.0 {
        Style::default().fg(up())
    } else if value < 0.0 {
        Style::default().fg(down())
    } else {
        secondary()
    }
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

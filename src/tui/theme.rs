//! Slate & Amber color scheme for the askdoc TUI.
//!
//! Views import colors from here rather than spelling out `Color::Rgb`
//! literals inline.

use ratatui::style::{Color, Modifier, Style};

/// Steel blue, used for primary chrome and focused borders.
pub const PRIMARY: Color = Color::Rgb(0x4A, 0x6F, 0xA5);
/// Lighter steel blue for highlights and in-flight indicators.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x6E, 0x9B, 0xD1);

/// Amber accent for calls to action and the active input border.
pub const ACCENT: Color = Color::Rgb(0xE8, 0xA8, 0x3C);

/// Near-black slate background.
pub const BG_BASE: Color = Color::Rgb(0x12, 0x16, 0x1C);

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xD8, 0xDE, 0xE4);
/// Secondary labels and idle borders.
pub const TEXT_MUTED: Color = Color::Rgb(0x6B, 0x74, 0x7E);
/// Faint hints and disabled items.
pub const TEXT_DIM: Color = Color::Rgb(0x43, 0x4A, 0x52);

/// Failures and the error role.
pub const ERROR: Color = Color::Rgb(0xD9, 0x5C, 0x5C);
/// Confirmations and the user role.
pub const SUCCESS: Color = Color::Rgb(0x7F, 0xB0, 0x69);
/// Degraded states and unknown-command feedback.
pub const WARNING: Color = Color::Rgb(0xE0, 0x9A, 0x3E);
/// Informational notifications.
pub const INFO: Color = Color::Rgb(0x5C, 0xA4, 0xD9);

/// Style for key hints in the status bar (e.g. "q:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Inverted badge carrying the application name.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Inverted badge shown while the input is in insert mode.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

//! UI theme constants - Minimalist dark theme

use ratatui::style::{Color, Modifier, Style};

// Base colors - muted grays
pub const COLOR_DIM: Color = Color::Rgb(80, 80, 80); // Borders, secondary
pub const COLOR_MUTED: Color = Color::Rgb(120, 120, 120); // Labels
pub const COLOR_TEXT: Color = Color::Rgb(180, 180, 180); // Normal text
pub const COLOR_BRIGHT: Color = Color::Rgb(220, 220, 220); // Emphasis

// Accent colors - used sparingly
pub const COLOR_ACCENT: Color = Color::Rgb(100, 180, 220); // Keys, incoming
pub const COLOR_SUCCESS: Color = Color::Rgb(100, 180, 100); // Connected, outgoing
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_PULSE: Color = Color::Rgb(220, 90, 90); // Heartbeat trace

// Semantic aliases
pub const COLOR_BORDER: Color = COLOR_DIM;
pub const COLOR_TITLE: Color = COLOR_BRIGHT;
pub const COLOR_LABEL: Color = COLOR_MUTED;
pub const COLOR_VALUE: Color = COLOR_TEXT;

// Connection states
pub const COLOR_CONNECTED: Color = COLOR_SUCCESS;
pub const COLOR_DISCONNECTED: Color = COLOR_ERROR;

// Log colors
pub const COLOR_LOG_OUT: Color = COLOR_SUCCESS;
pub const COLOR_LOG_IN: Color = COLOR_ACCENT;
pub const COLOR_LOG_SYSTEM: Color = COLOR_MUTED;

// Action bar
pub const COLOR_KEY: Color = COLOR_ACCENT;
pub const COLOR_ACTION: Color = COLOR_MUTED;

// Styles
pub const STYLE_DIM: Style = Style::new().fg(COLOR_DIM);
pub const STYLE_MUTED: Style = Style::new().fg(COLOR_MUTED);
pub const STYLE_TEXT: Style = Style::new().fg(COLOR_TEXT);
pub const STYLE_BRIGHT: Style = Style::new().fg(COLOR_BRIGHT);
pub const STYLE_BORDER: Style = Style::new().fg(COLOR_BORDER);
pub const STYLE_LABEL: Style = Style::new().fg(COLOR_LABEL);
pub const STYLE_VALUE: Style = Style::new().fg(COLOR_VALUE);
pub const STYLE_KEY: Style = Style::new().fg(COLOR_KEY);
pub const STYLE_ACTION: Style = Style::new().fg(COLOR_ACTION);

pub const fn style_bold(color: Color) -> Style {
    Style::new().fg(color).add_modifier(Modifier::BOLD)
}

pub const fn style_title() -> Style {
    style_bold(COLOR_TITLE)
}

// Status symbols
pub const SYMBOL_CONNECTED: &str = "●";
pub const SYMBOL_DISCONNECTED: &str = "○";
pub const SYMBOL_OK: &str = "✔";
pub const SYMBOL_FAIL: &str = "✖";
pub const SYMBOL_IN: &str = "←";
pub const SYMBOL_OUT: &str = "→";
pub const SYMBOL_HEART: &str = "♥";

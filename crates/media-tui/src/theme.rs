//! Color palette and style constants for the mediadex TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_READY: Color = Color::Rgb(80, 200, 120);
pub const C_PENDING: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_CHECKED: Color = Color::Rgb(255, 210, 50);
pub const C_EXTENSION: Color = Color::Rgb(80, 140, 200);
pub const C_CODEC: Color = Color::Rgb(100, 160, 130);
pub const C_LANGUAGE: Color = Color::Rgb(180, 120, 220);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_CONFIRM: Color = Color::Rgb(255, 95, 95);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_heading() -> Style {
    Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

//! Transient status messages plus one sticky "working" line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(4),
            Self::Error => Duration::from_secs(6),
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const MAX_VISIBLE: usize = 4;

#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    /// Message and animation frame of the in-flight operation, if any.
    working: Option<(String, usize)>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        self.toasts.retain(|t| t.message != message);
        self.toasts.push_back(Toast {
            expires: Instant::now() + severity.lifetime(),
            message,
            severity,
        });
        while self.toasts.len() > MAX_VISIBLE * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// Show an animated line until `settle` is called.
    pub fn working(&mut self, message: impl Into<String>) {
        self.working = Some((message.into(), 0));
    }

    /// Drop the working line and post `message` in its place.
    pub fn settle(&mut self, severity: Severity, message: impl Into<String>) {
        self.working = None;
        self.push(message, severity);
    }

    pub fn is_working(&self) -> bool {
        self.working.is_some()
    }

    /// Expire old toasts and advance the spinner. Call each tick.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires > now);
        if let Some((_, frame)) = self.working.as_mut() {
            *frame = (*frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.working.is_none()
    }

    /// Render in the top-right corner of `area`, working line first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);

        let mut rows: Vec<(String, Style)> = Vec::new();
        if let Some((message, tick)) = &self.working {
            rows.push((
                format!(" {} {} ", SPINNER_FRAMES[*tick], message),
                Style::default().fg(C_TOAST_INFO).add_modifier(Modifier::BOLD),
            ));
        }
        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            let color = match toast.severity {
                Severity::Info => C_TOAST_INFO,
                Severity::Success => C_TOAST_SUCCESS,
                Severity::Warning => C_TOAST_WARNING,
                Severity::Error => C_TOAST_ERROR,
            };
            rows.push((
                format!(" {} {} ", toast.severity.icon(), toast.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        for (row, (text, style)) in rows.into_iter().enumerate() {
            let y = area.y + 1 + row as u16;
            if y >= area.y + area.height {
                break;
            }
            let w = (text.width() as u16).min(max_width);
            let toast_area = Rect {
                x: area.x + area.width.saturating_sub(w + 1),
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), toast_area);
        }
    }
}

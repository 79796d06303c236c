//! Status bar: load state and counts on one row, keybindings on the next.

use media_core::LoadStatus;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::View;
use crate::app_state::AppState;
use crate::theme::{
    C_ACCENT, C_MODE_CONFIRM, C_MODE_NORMAL, C_MUTED, C_PENDING, C_READY, C_SECONDARY,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Waiting for `y` before deleting the whole collection.
    Confirm,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Confirm => "CONFIRM",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Confirm => C_MODE_CONFIRM,
        }
    }
}

fn status_color(status: &LoadStatus) -> Color {
    match status {
        LoadStatus::Idle => C_MUTED,
        LoadStatus::Loading => C_PENDING,
        LoadStatus::Ready => C_READY,
        LoadStatus::Failed(_) => C_ACCENT,
    }
}

/// Draw the summary row: `● ready  23 files · 2 checked  http://…`.
pub fn draw_summary_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let session = state.files.session();
    let status = session.status();

    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(status_color(status))),
        Span::styled(status.label(), Style::default().fg(C_SECONDARY)),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} files · {} checked",
                session.collection().len(),
                session.selection().len()
            ),
            Style::default().fg(C_SECONDARY),
        ),
    ];
    if let Some(busy) = state.busy {
        spans.push(Span::styled(
            format!("  {}", busy.describe()),
            Style::default().fg(C_PENDING),
        ));
    }
    spans.push(Span::styled(
        format!("  {}", state.server_url),
        Style::default().fg(C_MUTED),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, view: View) {
    let keys = match (mode, view) {
        (InputMode::Confirm, _) => " y delete everything  any other key cancel",
        (InputMode::Normal, View::List) => {
            " ↑↓/jk move  Space check  a all  Esc clear  Enter details  d delete checked  D delete all  r reload  q quit"
        }
        (InputMode::Normal, View::Detail(_)) => {
            " ↑↓/jk scroll  x delete file  r refetch  q/Esc back"
        }
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

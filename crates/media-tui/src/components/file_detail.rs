//! FileDetail component: one record with its audio and subtitle tracks.

use media_core::Record;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, DetailState},
    component::Component,
    theme::{style_heading, style_muted, style_secondary, C_ACCENT, C_CODEC, C_LANGUAGE, C_PENDING, C_PRIMARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        text::fit,
    },
};

pub struct FileDetail {
    scroll: usize,
}

impl FileDetail {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    fn field(name: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {}", fit(name, 12)), style_secondary()),
            Span::styled(value, Style::default().fg(C_PRIMARY)),
        ])
    }

    fn track_header(title: &str, count: usize) -> Line<'static> {
        Line::from(Span::styled(format!(" {} ({})", title, count), style_heading()))
    }

    fn track_row(
        id: i64,
        name: Option<&str>,
        language: Option<&str>,
        codec: Option<&str>,
    ) -> Line<'static> {
        let (name, language, codec) = (
            name.unwrap_or("-"),
            language.unwrap_or("-"),
            codec.unwrap_or("-"),
        );
        Line::from(vec![
            Span::styled(format!("  {} ", fit(&format!("#{}", id), 7)), style_muted()),
            Span::styled(fit(name, 24), Style::default().fg(C_PRIMARY)),
            Span::raw(" "),
            Span::styled(fit(language, 8), Style::default().fg(C_LANGUAGE)),
            Span::raw(" "),
            Span::styled(codec.to_string(), Style::default().fg(C_CODEC)),
        ])
    }

    fn build_lines(record: &Record) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("  {}", record.filename),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::field("id", record.id.to_string()),
            Self::field("path", record.filepath.clone()),
            Self::field("extension", record.file_extension.clone()),
            Self::field(
                "size",
                format!("{} ({} bytes)", record.human_size(), record.file_size),
            ),
            Self::field("video codec", record.video_codec.clone().unwrap_or_else(|| "-".into())),
            Self::field(
                "resolution",
                record.video_resolution.clone().unwrap_or_else(|| "-".into()),
            ),
            Line::from(""),
            Self::track_header("audio", record.audio_channels.len()),
        ];

        if record.audio_channels.is_empty() {
            lines.push(Line::from(Span::styled("  (none)", style_muted())));
        }
        for a in &record.audio_channels {
            lines.push(Self::track_row(
                a.id,
                a.name.as_deref(),
                a.channel.as_deref(),
                a.codec.as_deref(),
            ));
        }

        lines.push(Line::from(""));
        lines.push(Self::track_header("subtitles", record.subtitle_channels.len()));
        if record.subtitle_channels.is_empty() {
            lines.push(Line::from(Span::styled("  (none)", style_muted())));
        }
        for s in &record.subtitle_channels {
            lines.push(Self::track_row(
                s.id,
                s.name.as_deref(),
                s.subtitle.as_deref(),
                s.codec.as_deref(),
            ));
        }
        lines
    }

    fn lines_for(detail: &DetailState) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(err) = &detail.error {
            lines.push(Line::from(Span::styled(
                format!("  {}", err),
                Style::default().fg(C_ACCENT),
            )));
            lines.push(Line::from(""));
        }
        match &detail.record {
            Some(record) => lines.extend(Self::build_lines(record)),
            None if detail.fetching => {
                lines.push(Line::from(Span::styled("  fetching…", style_muted())));
            }
            None => {}
        }
        lines
    }
}

impl Default for FileDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FileDetail {
    fn id(&self) -> ComponentId {
        ComponentId::FileDetail
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let Some(detail) = &state.detail else {
            return vec![Action::CloseDetail];
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll += 10,
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::Char('x') => return vec![Action::DeleteRecord(detail.id)],
            KeyCode::Char('r') => return vec![Action::OpenDetail(detail.id)],
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => {
                return vec![Action::CloseDetail]
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::OpenDetail(_) = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(detail) = &state.detail else {
            return;
        };
        let badge = detail.fetching.then(|| Badge::new("fetching", C_PENDING));
        let title = format!("file #{}", detail.id);
        let block = pane_chrome(&title, focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = Self::lines_for(detail);
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::fixtures::{record, state_with};
    use ratatui::crossterm::event::KeyModifiers;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn lines_list_both_track_tables() {
        let rendered = text(&FileDetail::build_lines(&record(3, ".mkv")));
        assert!(rendered.contains("clip-3.mkv"));
        assert!(rendered.contains("audio (1)"));
        assert!(rendered.contains("Surround"));
        assert!(rendered.contains("subtitles (1)"));
        assert!(rendered.contains("fre"));
    }

    #[test]
    fn x_deletes_the_shown_record() {
        let mut state = state_with(&[3]);
        state.detail = Some(DetailState::new(3, None));
        let mut detail = FileDetail::new();

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(detail.handle_key(key, &state), vec![Action::DeleteRecord(3)]);
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(detail.handle_key(key, &state), vec![Action::CloseDetail]);
    }

    #[test]
    fn fetch_error_is_shown_above_the_cached_copy() {
        let mut detail = DetailState::new(3, Some(record(3, ".mkv")));
        detail.fetching = false;
        detail.error = Some("file #3 no longer exists".to_string());

        let rendered = text(&FileDetail::lines_for(&detail));
        assert!(rendered.starts_with("  file #3 no longer exists"));
        assert!(rendered.contains("clip-3.mkv"));
    }
}

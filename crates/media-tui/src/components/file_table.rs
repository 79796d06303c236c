//! FileTable component: the collection as a checkable table.

use media_core::{LoadStatus, Record, RecordId};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_heading, style_muted, C_ACCENT, C_CHECKED, C_CODEC, C_EXTENSION, C_MUTED, C_PRIMARY,
        C_SECONDARY, C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::{fit, fit_right},
    },
};

const EXT_W: usize = 6;
const SIZE_W: usize = 10;
const CODEC_W: usize = 8;
const RES_W: usize = 10;

pub struct FileTable {
    list: ScrollableList<RecordId>,
    list_state: ListState,
}

impl FileTable {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
        }
    }

    /// Re-read the record ids from the collection, keeping the cursor.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.files.session().visible_ids());
    }

    pub fn cursor_id(&self) -> Option<RecordId> {
        self.list.selected_item().copied()
    }

    fn header(name_w: usize) -> Line<'static> {
        Line::from(Span::styled(
            format!(
                "     {} {} {} {} {}",
                fit("filename", name_w),
                fit("ext", EXT_W),
                fit_right("size", SIZE_W),
                fit("video", CODEC_W),
                fit("resolution", RES_W),
            ),
            style_heading(),
        ))
    }

    fn row(record: &Record, checked: bool, under_cursor: bool, name_w: usize) -> ListItem<'static> {
        let (mark, mark_color) = if checked { ("[x]", C_CHECKED) } else { ("[ ]", C_MUTED) };
        let name_style = if under_cursor {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", mark), Style::default().fg(mark_color)),
            Span::styled(fit(&record.filename, name_w), name_style),
            Span::raw(" "),
            Span::styled(fit(&record.file_extension, EXT_W), Style::default().fg(C_EXTENSION)),
            Span::raw(" "),
            Span::styled(fit_right(&record.human_size(), SIZE_W), Style::default().fg(C_SECONDARY)),
            Span::raw(" "),
            Span::styled(
                fit(record.video_codec.as_deref().unwrap_or("-"), CODEC_W),
                Style::default().fg(C_CODEC),
            ),
            Span::raw(" "),
            Span::styled(
                fit(record.video_resolution.as_deref().unwrap_or("-"), RES_W),
                Style::default().fg(C_SECONDARY),
            ),
        ]);
        let bg = if under_cursor {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(line).style(bg)
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FileTable {
    fn id(&self) -> ComponentId {
        ComponentId::FileTable
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    return vec![Action::ToggleRecord(id)];
                }
            }
            KeyCode::Char('a') => return vec![Action::ToggleAll],
            KeyCode::Esc => return vec![Action::ClearSelection],
            KeyCode::Enter => {
                if let Some(id) = self.cursor_id() {
                    return vec![Action::OpenDetail(id)];
                }
            }
            KeyCode::Char('d') => return vec![Action::DeleteSelected],
            KeyCode::Char('D') => return vec![Action::RequestDeleteAll],
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if *action == Action::CollectionChanged {
            self.sync(state);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let checked = state.selected_count();
        let badge = (checked > 0).then(|| Badge::new(format!("{} checked", checked), C_CHECKED));
        let block = pane_chrome("files", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let collection = state.collection();
        if collection.is_empty() {
            let msg = match state.files.session().status() {
                LoadStatus::Idle | LoadStatus::Loading => Span::styled("  loading files…", style_muted()),
                LoadStatus::Failed(e) => Span::styled(
                    format!("  could not load files: {}", e),
                    Style::default().fg(C_ACCENT),
                ),
                LoadStatus::Ready => Span::styled("  the collection is empty", style_muted()),
            };
            frame.render_widget(Paragraph::new(msg), inner);
            return;
        }

        let fixed = 5 + EXT_W + SIZE_W + CODEC_W + RES_W + 4;
        let name_w = (inner.width as usize).saturating_sub(fixed).max(8);

        let header_area = Rect { height: 1, ..inner };
        frame.render_widget(Paragraph::new(Self::header(name_w)), header_area);

        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        let height = body.height as usize;
        self.list.ensure_visible(height);
        let cursor = self.list.selected;

        // The list mirrors the collection's order, so indices line up.
        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .into_iter()
            .filter_map(|(idx, id)| {
                let record = collection.get(idx).filter(|r| r.id == *id)?;
                Some(Self::row(record, state.is_checked(*id), idx == cursor, name_w))
            })
            .collect();

        self.list_state
            .select(Some(cursor.saturating_sub(self.list.scroll_offset)));
        frame.render_stateful_widget(List::new(items), body, &mut self.list_state);
    }
}

//! DistributionPanel component: four bar charts over the loaded collection.

use media_core::distribution::{ChannelField, ChannelList, RecordField};
use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Color,
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_heading, C_CODEC, C_EXTENSION, C_LANGUAGE, C_PENDING},
    widgets::{bar_chart::draw_bars, pane_chrome::pane_chrome},
};

/// Bars shown per chart before the tail folds into "other".
const TOP_N: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chart {
    Field(RecordField),
    Channels(ChannelList, ChannelField),
}

impl Chart {
    pub fn title(self) -> String {
        match self {
            Self::Field(field) => field.label().to_string(),
            Self::Channels(list, field) => format!("{} {}", list.label(), field.label()),
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Field(RecordField::FileExtension) => C_EXTENSION,
            Self::Field(_) => C_CODEC,
            Self::Channels(_, ChannelField::Label) => C_LANGUAGE,
            Self::Channels(..) => C_PENDING,
        }
    }
}

pub const CHARTS: [Chart; 4] = [
    Chart::Field(RecordField::FileExtension),
    Chart::Field(RecordField::VideoCodec),
    Chart::Channels(ChannelList::Audio, ChannelField::Codec),
    Chart::Channels(ChannelList::Subtitle, ChannelField::Label),
];

pub struct DistributionPanel {
    /// `(label, count)` rows per chart, recomputed when the collection changes.
    rows: Vec<Vec<(String, usize)>>,
}

impl DistributionPanel {
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new(); CHARTS.len()],
        }
    }

    pub fn sync(&mut self, state: &AppState) {
        self.rows = CHARTS
            .iter()
            .map(|chart| {
                let dist = match *chart {
                    Chart::Field(field) => state.files.distribution(field),
                    Chart::Channels(list, field) => state.files.nested_distribution(list, field),
                };
                dist.top(TOP_N)
            })
            .collect();
    }

    pub fn rows(&self, chart: usize) -> &[(String, usize)] {
        self.rows.get(chart).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for DistributionPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DistributionPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Distributions
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if *action == Action::CollectionChanged {
            self.sync(state);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("breakdown", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [top, bottom] = Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)]).areas(inner);
        let cells = [top, bottom].into_iter().flat_map(|half| {
            let [left, right]: [Rect; 2] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(half);
            [left, right]
        });

        for (i, cell) in cells.enumerate() {
            if cell.height < 2 {
                continue;
            }
            let chart = CHARTS[i];
            let title = Rect { height: 1, ..cell };
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", chart.title()), style_heading())),
                title,
            );
            let body = Rect {
                y: cell.y + 1,
                height: cell.height - 1,
                ..cell
            };
            draw_bars(frame, body, self.rows(i), chart.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::fixtures::{record, state_with};

    #[test]
    fn sync_tallies_every_chart() {
        let mut state = state_with(&[]);
        let records = vec![record(1, ".mkv"), record(2, ".mp4"), record(3, ".mkv")];
        assert!(state.files.session_mut().begin_load());
        state.files.session_mut().finish_load(Ok(records));

        let mut panel = DistributionPanel::new();
        panel.on_action(&Action::CollectionChanged, &state);

        assert_eq!(panel.rows(0), &[(".mkv".to_string(), 2), (".mp4".to_string(), 1)]);
        assert_eq!(panel.rows(1), &[("hevc".to_string(), 3)]);
        assert_eq!(panel.rows(2), &[("ac3".to_string(), 3)]);
        assert_eq!(panel.rows(3), &[("fre".to_string(), 3)]);
    }

    #[test]
    fn chart_titles_name_the_field() {
        assert_eq!(CHARTS[0].title(), "extension");
        assert_eq!(CHARTS[3].title(), "subtitle language");
    }
}

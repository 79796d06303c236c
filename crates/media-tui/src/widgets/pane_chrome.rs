//! Bordered pane with focus styling and an optional header badge.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::theme::{style_focused_border, style_unfocused_border, C_MUTED, C_PRIMARY};

/// A badge shown in the top-right of the pane header (e.g. "3 checked").
pub struct Badge {
    pub text: String,
    pub color: Color,
}

impl Badge {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

pub fn pane_chrome<'a>(title: &'a str, focused: bool, badge: Option<Badge>) -> Block<'a> {
    let (border_style, title_style) = if focused {
        (
            style_focused_border(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )
    } else {
        (style_unfocused_border(), Style::default().fg(C_MUTED))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(Span::styled(format!(" {} ", title), title_style)));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 4);
        let popup = centered(area, 50, 7);
        assert_eq!(popup.width, 20);
        assert_eq!(popup.height, 4);
    }

    #[test]
    fn centered_is_centred() {
        let popup = centered(Rect::new(0, 0, 40, 10), 20, 4);
        assert_eq!((popup.x, popup.y), (10, 3));
    }
}

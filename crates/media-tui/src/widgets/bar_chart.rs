//! Horizontal bar chart drawn with eighth-block characters.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_SECONDARY};
use crate::widgets::text::{fit, fit_right};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// A bar `width` cells wide filled to `value / max`, at 1/8 cell resolution.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let ratio = if max == 0 { 0.0 } else { value as f64 / max as f64 };
    let eighths = (ratio.clamp(0.0, 1.0) * width as f64 * 8.0).round() as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut out = String::with_capacity(width * 3);
    for _ in 0..full {
        out.push('█');
    }
    if full < width {
        out.push(BLOCKS[partial]);
        for _ in (full + 1)..width {
            out.push(' ');
        }
    }
    out
}

/// One row per `(label, count)`, longest bar scaled to the area.
pub fn draw_bars(frame: &mut Frame, area: Rect, rows: &[(String, usize)], color: Color) {
    if area.width < 8 || area.height == 0 {
        return;
    }
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(" no data", Style::default().fg(C_MUTED))),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let count_w = rows
        .iter()
        .map(|(_, c)| c.to_string().len())
        .max()
        .unwrap_or(1);
    let label_w = (width / 3).clamp(4, 14);
    let bar_w = width.saturating_sub(label_w + count_w + 3);
    let max = rows.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let lines: Vec<Line> = rows
        .iter()
        .take(area.height as usize)
        .map(|(label, count)| {
            Line::from(vec![
                Span::styled(format!(" {} ", fit(label, label_w)), Style::default().fg(C_SECONDARY)),
                Span::styled(bar(*count, max, bar_w), Style::default().fg(color)),
                Span::styled(
                    format!(" {}", fit_right(&count.to_string(), count_w)),
                    Style::default().fg(C_SECONDARY),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

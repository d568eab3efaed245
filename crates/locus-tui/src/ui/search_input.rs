//! Query line rendering. An open command prompt takes the line over.

use crate::state::{Mode, RenderSnapshot};
use crate::ui;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Query: ";

pub fn render(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot<'_>) {
    let (label, text) = match snapshot.prompt {
        Some(prompt) => (prompt.kind.label(), prompt.text.as_str()),
        None => (PROMPT, snapshot.query),
    };
    let is_focused = snapshot.prompt.is_some() || snapshot.mode == Mode::Search;

    let border_style = if is_focused {
        Style::default().fg(ui::BORDER_FOCUS)
    } else {
        Style::default().fg(ui::BORDER_DIM)
    };

    let query_style = if is_focused {
        Style::default().fg(ui::TEXT_PRIMARY)
    } else {
        Style::default().fg(ui::TEXT_SECONDARY)
    };

    let input = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().fg(ui::ACCENT)),
        Span::styled(text, query_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(if is_focused {
                Style::default().bg(ui::BG_ELEVATED)
            } else {
                Style::default().bg(ui::BG_SURFACE)
            }),
    );

    f.render_widget(input, area);

    if is_focused {
        // Cursor sits after the last character: border + label + text.
        let offset = 1 + label.width() + text.width();
        let max_x = area.right().saturating_sub(2);
        let cursor_x = (area.x as usize + offset).min(max_x as usize) as u16;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

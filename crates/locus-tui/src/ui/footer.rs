//! Footer: key hints, or the current status message.

use crate::keymap::KeyHint;
use crate::state::{RenderSnapshot, StatusLevel};
use crate::ui;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const GAP: &str = "  ";

pub fn render(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot<'_>) {
    let line = match snapshot.status {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => ui::SUCCESS,
                StatusLevel::Error => ui::ERROR,
            };
            Line::from(Span::styled(
                status.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => hints(snapshot.hints, area.width as usize),
    };

    let footer = Paragraph::new(line).style(Style::default().bg(ui::BG_SURFACE));
    f.render_widget(footer, area);
}

fn hint_width(hint: &KeyHint) -> usize {
    hint.key.width() + 2 + hint.label.width()
}

/// Hints in priority order, cut to fit `width`. The last hint (quit) is
/// kept whenever it fits at all.
fn fit(hints: &[KeyHint], width: usize) -> Vec<&KeyHint> {
    let Some((last, rest)) = hints.split_last() else {
        return Vec::new();
    };

    let reserved = hint_width(last);
    let mut used = 0;
    let mut shown: Vec<&KeyHint> = Vec::new();
    for hint in rest {
        let next = used + hint_width(hint) + GAP.width();
        if next + reserved > width {
            break;
        }
        used = next;
        shown.push(hint);
    }
    if used + reserved <= width {
        shown.push(last);
    }
    shown
}

fn hints(hints: &[KeyHint], width: usize) -> Line<'_> {
    let shown = fit(hints, width);
    let last = shown.len().saturating_sub(1);

    let spans: Vec<Span> = shown
        .into_iter()
        .enumerate()
        .flat_map(|(i, hint)| {
            let gap = if i == last { "" } else { GAP };
            [
                Span::styled(format!("{}:", hint.key), Style::default().fg(ui::PRIMARY)),
                Span::styled(
                    format!(" {}{gap}", hint.label),
                    Style::default().fg(ui::TEXT_SECONDARY),
                ),
            ]
        })
        .collect();

    Line::from(spans)
}

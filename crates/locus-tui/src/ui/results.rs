//! Results list rendering.

use crate::state::RenderSnapshot;
use crate::ui;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot<'_>) {
    let index_width = snapshot.total.max(1).to_string().len();
    // Borders, marker, index column and the gap after it.
    let path_width = (area.width as usize).saturating_sub(2 + 2 + index_width + 1);

    let items: Vec<ListItem> = snapshot
        .rows
        .iter()
        .map(|row| {
            let is_selected = row.index == snapshot.selected;
            let marker = if is_selected { "▸" } else { " " };

            let path_style = if is_selected {
                Style::default()
                    .fg(ui::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ui::TEXT_PRIMARY)
            };

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(ui::PRIMARY)),
                Span::raw(" "),
                Span::styled(
                    format!("{:>index_width$} ", row.index + 1),
                    Style::default()
                        .fg(ui::TEXT_MUTED)
                        .add_modifier(Modifier::DIM),
                ),
                Span::styled(truncate_left(row.path, path_width), path_style),
            ]);

            let style = if is_selected {
                Style::default().bg(ui::BG_ELEVATED)
            } else {
                Style::default()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = if snapshot.searching {
        format!("results ({})  searching…", snapshot.total)
    } else if snapshot.total == 0 && !snapshot.query.is_empty() {
        "results (0)  no matches".to_string()
    } else {
        format!("results ({})", snapshot.total)
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui::BORDER_DIM))
            .title(title)
            .style(Style::default().bg(ui::BG_SURFACE)),
    );

    f.render_widget(list, area);
}

/// Fit `path` into `max` columns, keeping its tail (the file name end).
fn truncate_left(path: &str, max: usize) -> Cow<'_, str> {
    if path.width() <= max {
        return Cow::Borrowed(path);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }

    let budget = max - 1; // room for the ellipsis
    let mut used = 0;
    let mut start = path.len();
    for (idx, ch) in path.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start = idx;
    }

    Cow::Owned(format!("…{}", &path[start..]))
}

#[cfg(test)]
mod tests {
    use super::truncate_left;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn short_paths_are_untouched() {
        assert_eq!(truncate_left("/etc/hosts", 20), "/etc/hosts");
    }

    #[test]
    fn long_paths_keep_their_tail() {
        let out = truncate_left("/very/long/directory/name/file.txt", 12);
        assert_eq!(out, "…me/file.txt");
        assert_eq!(out.width(), 12);
    }

    #[test]
    fn wide_characters_are_measured_by_columns() {
        let out = truncate_left("/文档/报告/最终.txt", 9);
        assert!(out.width() <= 9, "{out}");
        assert!(out.ends_with(".txt"));
    }

    #[test]
    fn zero_width_gives_nothing() {
        assert_eq!(truncate_left("/a/b", 0), "");
    }
}

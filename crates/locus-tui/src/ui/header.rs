//! Header rendering.

use crate::state::{Mode, RenderSnapshot};
use crate::ui;
use locus_core::build_info::BUILD_INFO;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot<'_>) {
    let sep = Span::styled(" | ", Style::default().fg(ui::TEXT_MUTED));

    let mode_color = match snapshot.mode {
        Mode::Normal => ui::ACCENT,
        Mode::Search => ui::PRIMARY,
    };

    let mut spans = vec![
        Span::styled(
            "locus",
            Style::default()
                .fg(ui::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::styled(
            format!(" {} ", snapshot.mode.label()),
            Style::default()
                .fg(ui::BG_DARK)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::styled("≡ ", Style::default().fg(ui::INFO)),
        Span::styled(
            format!("{} results", format_count(snapshot.total)),
            Style::default().fg(ui::INFO),
        ),
    ];

    if !snapshot.committed_query.is_empty() {
        spans.push(sep.clone());
        spans.push(Span::styled("◎ ", Style::default().fg(ui::ACCENT)));
        spans.push(Span::styled(
            snapshot.committed_query,
            Style::default().fg(ui::TEXT_SECONDARY),
        ));
    }

    if let Some(dir) = snapshot.dir_filter {
        spans.push(sep.clone());
        spans.push(Span::styled("⌁ ", Style::default().fg(ui::TEXT_SECONDARY)));
        spans.push(Span::styled(
            dir.display().to_string(),
            Style::default().fg(ui::TEXT_SECONDARY),
        ));
    }

    if snapshot.hidden_dirs > 0 {
        spans.push(sep.clone());
        spans.push(Span::styled(
            format!("{} hidden", snapshot.hidden_dirs),
            Style::default().fg(ui::WARNING),
        ));
    }

    let build_info = BUILD_INFO.compact();
    let build_width = (build_info.len() as u16).min(area.width.saturating_sub(2));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ui::BORDER_DIM))
        .style(Style::default().bg(ui::BG_SURFACE));
    let inner = block.inner(area);

    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(build_width)])
        .split(inner);

    let left = Paragraph::new(Line::from(spans)).style(Style::default().bg(ui::BG_SURFACE));
    let right = Paragraph::new(build_info)
        .style(
            Style::default()
                .fg(ui::TEXT_MUTED)
                .bg(ui::BG_SURFACE)
                .add_modifier(Modifier::DIM),
        )
        .alignment(Alignment::Right);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn format_count(n: usize) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (count, ch) in s.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

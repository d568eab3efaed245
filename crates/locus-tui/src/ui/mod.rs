//! UI components and rendering.

pub mod footer;
pub mod header;
pub mod layout;
pub mod results;
pub mod search_input;
pub mod theme;

pub use layout::results_height;
pub use theme::*;

use crate::state::RenderSnapshot;
use ratatui::{style::Style, widgets::Block, Frame};

/// Draw one full frame from a snapshot.
pub fn draw(f: &mut Frame, snapshot: &RenderSnapshot<'_>) {
    let areas = layout::areas(f.area());

    f.render_widget(Block::default().style(Style::default().bg(BG_DARK)), f.area());

    header::render(f, areas.header, snapshot);
    search_input::render(f, areas.input, snapshot);
    results::render(f, areas.results, snapshot);
    footer::render(f, areas.footer, snapshot);
}

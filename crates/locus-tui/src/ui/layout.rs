//! Screen layout shared by drawing and viewport sizing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the results block border.
const RESULTS_BORDER: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub input: Rect,
    pub results: Rect,
    pub footer: Rect,
}

pub fn areas(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Query line
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Footer
        ])
        .split(area);

    Areas {
        header: chunks[0],
        input: chunks[1],
        results: chunks[2],
        footer: chunks[3],
    }
}

/// Number of result rows that fit on a screen of this size.
pub fn results_height(area: Rect) -> usize {
    areas(area).results.height.saturating_sub(RESULTS_BORDER).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_take_the_remaining_rows() {
        let screen = Rect::new(0, 0, 80, 24);
        let areas = areas(screen);
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.input.height, 3);
        assert_eq!(areas.footer.height, 1);
        assert_eq!(areas.results.height, 17);
        assert_eq!(results_height(screen), 15);
    }

    #[test]
    fn tiny_screen_still_has_one_row() {
        assert_eq!(results_height(Rect::new(0, 0, 10, 2)), 1);
    }
}

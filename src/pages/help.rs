use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::ui_utils::hint_line;

#[derive(Debug)]
pub struct HelpPage;

impl Default for HelpPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpPage {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Min(0),
            ])
            .split(area);

        // Fill the overlay to avoid a transparent background bleeding through
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::new().bg(Color::Black)), area);

        let nav_help = vec![
            hint_line("↑↓ / k j", "   Move between rows"),
            hint_line("← → / h l", "  Previous / next page"),
            hint_line("Home / End", "  First / last page"),
            hint_line("Enter / i", "   Show user details"),
            hint_line("q / Ctrl-C", "  Quit"),
        ];
        frame.render_widget(
            Paragraph::new(nav_help).block(Block::bordered().title("Navigation")),
            sections[0],
        );

        let filter_help = vec![
            hint_line("/", "           Search name or email, Tab to date range"),
            hint_line("Enter", "       Apply the date range (YYYY-MM-DD)"),
            hint_line("r", "           Cycle role filter"),
            hint_line("t", "           Cycle status filter"),
            hint_line("c", "           Clear all filters"),
            hint_line("1 2 3 4", "     Sort by ID, name, email, date"),
            hint_line("", "            Press again to reverse"),
        ];
        frame.render_widget(
            Paragraph::new(filter_help).block(Block::bordered().title("Filter & Sort")),
            sections[1],
        );

        let action_help = vec![
            hint_line("Space", "       Select row"),
            hint_line("a", "           Select / clear current page"),
            hint_line("n", "           New user"),
            hint_line("e", "           Edit row inline, Enter saves"),
            hint_line("s", "           Toggle active / inactive"),
            hint_line("d / D", "       Delete row / delete selected"),
            hint_line("x", "           Export selected (or all filtered) users to CSV"),
            hint_line("R", "           Reload from source"),
        ];
        frame.render_widget(
            Paragraph::new(action_help).block(Block::bordered().title("Actions")),
            sections[2],
        );

        let tips = vec![
            Line::from("💡 With nothing selected, export covers every filtered page"),
            Line::from("💡 Press ? or Esc to close this help"),
        ];
        frame.render_widget(
            Paragraph::new(tips).block(Block::bordered().title("Tips")),
            sections[3],
        );
    }
}

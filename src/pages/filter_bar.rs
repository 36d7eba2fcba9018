use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use roster::format::{role_label, status_label};

use crate::render_context::RenderContext;
use crate::ui_utils::focused_block;
use crate::{FilterField, Mode};

#[derive(Debug)]
pub struct FilterBar;

impl Default for FilterBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(18),
                Constraint::Length(14),
            ])
            .split(area);

        let editing = ctx.mode == Mode::Filter;
        let query = ctx.table.query();

        self.render_input(
            frame,
            layout[0],
            "Search (/)",
            &query.search,
            editing && ctx.filter_focus == FilterField::Search,
        );
        self.render_input(
            frame,
            layout[1],
            "From",
            ctx.date_from_input,
            editing && ctx.filter_focus == FilterField::DateFrom,
        );
        self.render_input(
            frame,
            layout[2],
            "To",
            ctx.date_to_input,
            editing && ctx.filter_focus == FilterField::DateTo,
        );

        let role = query.role.map(role_label).unwrap_or("Все роли");
        frame.render_widget(
            Paragraph::new(role).block(focused_block("Role (r)", false)),
            layout[3],
        );
        let status = query.status.map(status_label).unwrap_or("Все");
        frame.render_widget(
            Paragraph::new(status).block(focused_block("Status (t)", false)),
            layout[4],
        );
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
        let mut spans = vec![Span::raw(value.to_string())];
        if focused {
            spans.push(Span::styled("▏", Style::new().yellow()));
        } else if value.is_empty() && title != "Search (/)" {
            spans.push(Span::styled("ГГГГ-ММ-ДД", Style::new().dark_gray()));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(focused_block(title, focused)),
            area,
        );
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use roster::format::{format_date, role_label, status_label};
use roster::state::{EditBuffer, EditField};
use roster::view::PageMarker;
use roster::{SortColumn, SortDirection, Status, User};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::render_context::RenderContext;
use crate::ui_utils::truncate;

const COLUMNS: [(SortColumn, &str, &str); 4] = [
    (SortColumn::Id, "ID", "1"),
    (SortColumn::Name, "Имя", "2"),
    (SortColumn::Email, "Email", "3"),
    (SortColumn::RegistrationDate, "Регистрация", "4"),
];

#[derive(Debug)]
pub struct UserTablePage;

impl Default for UserTablePage {
    fn default() -> Self {
        Self::new()
    }
}

impl UserTablePage {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &RenderContext,
        throbber: &mut ThrobberState,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let title = format!(
            "Users ({} of {}, {} selected)",
            ctx.view.filtered_count(),
            ctx.table.users().len(),
            ctx.table.selection().len()
        );
        let block = Block::bordered().title(title);

        if ctx.table.is_loading() && ctx.table.users().is_empty() {
            let inner = block.inner(layout[0]);
            frame.render_widget(block, layout[0]);
            let spinner = Throbber::default()
                .label("Загрузка пользователей...")
                .throbber_style(Style::new().cyan().bold());
            frame.render_stateful_widget(spinner, inner, throbber);
        } else if ctx.view.filtered_count() == 0 {
            frame.render_widget(
                Paragraph::new("Пользователи не найдены").gray().block(block),
                layout[0],
            );
        } else {
            self.render_rows(frame, layout[0], ctx, block);
        }

        self.render_footer(frame, layout[1], ctx, throbber);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext, block: Block) {
        let query = ctx.table.query();
        let all_marker = if ctx.table.is_all_selected() { "[x]" } else { "[ ]" };
        let mut header_cells = vec![Cell::from(all_marker)];
        header_cells.extend(COLUMNS.iter().map(|(column, label, key)| {
            let arrow = if query.sort_column == *column {
                sort_arrow(query.sort_direction)
            } else {
                ""
            };
            Cell::from(format!("{}{} ({})", label, arrow, key))
        }));
        header_cells.push(Cell::from("Роль"));
        header_cells.push(Cell::from("Статус"));
        let header = Row::new(header_cells).style(Style::new().bold().yellow());

        let editing = ctx.table.edit_buffer();
        let rows: Vec<Row> = ctx
            .view
            .page()
            .iter()
            .map(|user| match editing {
                Some(buffer) if buffer.user_id == user.id => edit_row(user, buffer),
                _ => user_row(user, ctx.table.selection().contains(&user.id)),
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(18),
            Constraint::Min(22),
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Length(12),
        ];
        let mut state = TableState::default().with_selected(Some(ctx.cursor));
        frame.render_stateful_widget(
            Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(Style::new().reversed())
                .highlight_symbol(">> "),
            area,
            &mut state,
        );
    }

    fn render_footer(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &RenderContext,
        throbber: &mut ThrobberState,
    ) {
        let view = ctx.view;
        let range = if view.filtered_count() == 0 {
            String::from("Нет записей")
        } else {
            format!(
                "Показано {}-{} из {}",
                view.pagination_start,
                view.pagination_end,
                view.filtered_count()
            )
        };
        let strip = page_strip(&view.visible_pages(), view.current_page);
        let line = Line::from(vec![
            Span::raw(range),
            Span::raw("   "),
            Span::styled(strip, Style::new().cyan()),
            Span::styled(
                format!("   {} на странице", view.page_size),
                Style::new().gray(),
            ),
        ]);

        if ctx.table.is_saving() || (ctx.table.is_loading() && !ctx.table.users().is_empty()) {
            let layout = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(20)])
                .split(area);
            frame.render_widget(line, layout[0]);
            let label = if ctx.table.is_saving() { "Сохранение..." } else { "Загрузка..." };
            frame.render_stateful_widget(Throbber::default().label(label), layout[1], throbber);
        } else {
            frame.render_widget(line, area);
        }
    }
}

fn sort_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => " ↑",
        SortDirection::Desc => " ↓",
    }
}

fn user_row(user: &User, selected: bool) -> Row<'static> {
    let status_style = match user.status {
        Status::Active => Style::new().green(),
        Status::Inactive => Style::new().fg(Color::DarkGray),
    };
    Row::new(vec![
        Cell::from(if selected { "[x]" } else { "[ ]" }),
        Cell::from(user.id.to_string()),
        Cell::from(truncate(&user.name, 24)),
        Cell::from(truncate(&user.email, 30)),
        Cell::from(format_date(user.registration_date)),
        Cell::from(role_label(user.role)),
        Cell::from(status_label(user.status)).style(status_style),
    ])
}

fn edit_row(user: &User, buffer: &EditBuffer) -> Row<'static> {
    let field = |value: &str, focused: bool| {
        if focused {
            Cell::from(format!("{}▏", value)).style(Style::new().yellow().bold())
        } else {
            Cell::from(value.to_string()).style(Style::new().yellow())
        }
    };
    Row::new(vec![
        Cell::from("✎"),
        Cell::from(user.id.to_string()),
        field(&buffer.name, buffer.focus == EditField::Name),
        field(&buffer.email, buffer.focus == EditField::Email),
        Cell::from(format_date(user.registration_date)),
        field(role_label(buffer.role), buffer.focus == EditField::Role),
        Cell::from(status_label(user.status)),
    ])
}

/// Compact page-number strip, e.g. `1 … 4 [5] 6 … 20`.
pub fn page_strip(markers: &[PageMarker], current: usize) -> String {
    markers
        .iter()
        .map(|m| match m {
            PageMarker::Page(p) if *p == current => format!("[{}]", p),
            PageMarker::Page(p) => p.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

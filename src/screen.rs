use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Stylize,
    text::Line,
    widgets::Block,
};
use throbber_widgets_tui::ThrobberState;

use crate::Mode;
use crate::pages::add_user::AddUserModal;
use crate::pages::confirm::ConfirmDialog;
use crate::pages::details::DetailsModal;
use crate::pages::filter_bar::FilterBar;
use crate::pages::help::HelpPage;
use crate::pages::user_table::UserTablePage;
use crate::render_context::RenderContext;
use crate::ui_utils::centered_rect;

#[derive(Debug)]
pub struct Screen {
    filter_bar: FilterBar,
    table: UserTablePage,
    add_user: AddUserModal,
    details: DetailsModal,
    confirm: ConfirmDialog,
    help: HelpPage,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            filter_bar: FilterBar::new(),
            table: UserTablePage::new(),
            add_user: AddUserModal::new(),
            details: DetailsModal::new(),
            confirm: ConfirmDialog::new(),
            help: HelpPage::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, ctx: &RenderContext, throbber: &mut ThrobberState) {
        let area = frame.area();
        let title = Line::from("Roster - User Administration")
            .bold()
            .blue()
            .left_aligned();
        let block = Block::bordered().title(title);
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let error_height = if ctx.table.error().is_some() { 1 } else { 0 };
        let vlayout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(3),
                Constraint::Length(error_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ],
        )
        .split(inner_area);

        self.filter_bar.render(frame, vlayout[0], ctx);
        if let Some(err) = ctx.table.error() {
            frame.render_widget(Line::from(format!(" {}", err)).red().bold(), vlayout[1]);
        }
        self.table.render(frame, vlayout[2], ctx, throbber);

        let status_line = Line::from(format!("{}  |  {}", ctx.status, mode_hint(ctx.mode)))
            .on_dark_gray()
            .white();
        frame.render_widget(status_line, vlayout[3]);

        match ctx.mode {
            Mode::AddUser => self.add_user.render(frame, centered_rect(60, 16, area), ctx),
            Mode::Details => {
                if let Some(user) = ctx.table.details_user() {
                    self.details
                        .render(frame, centered_rect(64, 16, area), user, ctx.now);
                }
            }
            Mode::Confirm => {
                if let Some(confirm) = ctx.confirm {
                    self.confirm
                        .render(frame, centered_rect(40, 5, area), &confirm.prompt);
                }
            }
            _ => {}
        }

        if ctx.show_help {
            self.help.render(frame, centered_rect(76, 30, area));
        }
    }
}

fn mode_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Browse => "/: Filter  n: New  e: Edit  d: Delete  x: Export  ?: Help  q: Quit",
        Mode::Filter => "Tab: Next field  Enter: Apply dates  Esc: Done",
        Mode::Edit => "Tab: Next field  Space: Role  Enter: Save  Esc: Cancel",
        Mode::AddUser => "Tab: Next field  Space: Toggle  Enter: Create  Esc: Cancel",
        Mode::Details => "Esc: Close",
        Mode::Confirm => "y: Yes  any other key: No",
    }
}

use chrono::{DateTime, Utc};
use roster::view::TableView;
use roster::UserTable;

use crate::{ConfirmState, FilterField, Mode};

/// Centralized context for rendering pages, reducing parameter proliferation
pub struct RenderContext<'a> {
    // App state
    pub mode: Mode,
    pub show_help: bool,
    pub status: &'a str,
    pub now: DateTime<Utc>,

    // Data store and its derived view
    pub table: &'a UserTable,
    pub view: &'a TableView<'a>,

    // Row cursor within the visible page
    pub cursor: usize,

    // Filter bar inputs
    pub filter_focus: FilterField,
    pub date_from_input: &'a str,
    pub date_to_input: &'a str,

    // Pending confirmation
    pub confirm: Option<&'a ConfirmState>,
}

impl<'a> RenderContext<'a> {
    /// Create a new RenderContext with all required data
    pub fn new(
        mode: Mode,
        table: &'a UserTable,
        view: &'a TableView<'a>,
        status: &'a str,
    ) -> Self {
        Self {
            mode,
            show_help: false,
            status,
            now: Utc::now(),
            table,
            view,
            cursor: 0,
            filter_focus: FilterField::Search,
            date_from_input: "",
            date_to_input: "",
            confirm: None,
        }
    }

    /// Builder method to set the row cursor
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    /// Builder method to set filter bar state
    pub fn with_filter(mut self, focus: FilterField, date_from: &'a str, date_to: &'a str) -> Self {
        self.filter_focus = focus;
        self.date_from_input = date_from;
        self.date_to_input = date_to;
        self
    }

    /// Builder method to set the help overlay
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    /// Builder method to set the pending confirmation
    pub fn with_confirm(mut self, confirm: Option<&'a ConfirmState>) -> Self {
        self.confirm = confirm;
        self
    }
}

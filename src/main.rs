use std::fs::File;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use ratatui::{DefaultTerminal, Frame};
use roster::async_task::{SourceOperation, SourceOutcome, TaskManager};
use roster::export::{export_filename, DirectorySink, ExportSink};
use roster::notify::{self, AlertLog, Answered, PromptCapture};
use roster::source::SampleSource;
use roster::state::{CreateField, EditField};
use roster::view::parse_date;
use roster::{Role, Status, TableConfig, UserTable};
use simplelog::{Config, LevelFilter, WriteLogger};
use throbber_widgets_tui::ThrobberState;

pub mod key_handler;
pub mod pages;
pub mod render_context;
pub mod screen;
pub mod ui_utils;
use key_handler::{KeyAction, KeyHandler};
use render_context::RenderContext;
use screen::Screen;

// How long to wait for input before polling background tasks again
const TICK: Duration = Duration::from_millis(100);
const DEFAULT_CONFIG: &str = "roster.json";

/// Terminal admin table for user records
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Rows per page
    #[arg(long)]
    page_size: Option<NonZeroUsize>,
    /// Seed for reproducible sample data
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Filter,
    Edit,
    AddUser,
    Details,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Search,
    DateFrom,
    DateTo,
}

impl FilterField {
    pub fn next(self) -> Self {
        match self {
            FilterField::Search => FilterField::DateFrom,
            FilterField::DateFrom => FilterField::DateTo,
            FilterField::DateTo => FilterField::Search,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    One(u64),
    Selected,
}

/// A destructive request waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub prompt: String,
    pub pending: PendingDelete,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = TableConfig::load_or_default(&cli.config)?;
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }
    if let Some(path) = &config.log_file {
        WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(path)?)?;
    }
    log::info!("starting with {:?}", config);

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    result
}

pub struct App {
    running: bool,
    screen: Screen,
    key_handler: KeyHandler,
    mode: Mode,
    show_help: bool,
    status_message: String,
    table: UserTable,
    tasks: TaskManager,
    alerts: AlertLog,
    sink: DirectorySink,
    throbber: ThrobberState,
    cursor: usize,
    filter_focus: FilterField,
    date_from_input: String,
    date_to_input: String,
    confirm: Option<ConfirmState>,
}

impl App {
    pub fn new(config: &TableConfig) -> Self {
        let source = match config.seed {
            Some(seed) => SampleSource::seeded(config.sample_size, config.latency, seed),
            None => SampleSource::new(config.sample_size, config.latency),
        };
        Self {
            running: false,
            screen: Screen::new(),
            key_handler: KeyHandler::new(),
            mode: Mode::Browse,
            show_help: false,
            status_message: String::from("Ready | Press ? for help"),
            table: UserTable::new(config.page_size),
            tasks: TaskManager::new(Arc::new(source)),
            alerts: AlertLog::new(),
            sink: DirectorySink::new(&config.export_dir),
            throbber: ThrobberState::default(),
            cursor: 0,
            filter_focus: FilterField::Search,
            date_from_input: String::new(),
            date_to_input: String::new(),
            confirm: None,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let load = self.table.begin_load();
        self.dispatch(load);
        while self.running {
            self.drain_completions();
            terminal.draw(|frame| self.render(frame))?;
            let action = self
                .key_handler
                .poll_crossterm_events(TICK, self.accepts_text())?;
            if self.handle_action(action) {
                self.quit();
            }
            if self.tasks.has_pending() {
                self.throbber.calc_next();
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let view = self.table.view();
        let ctx = RenderContext::new(self.mode, &self.table, &view, &self.status_message)
            .with_cursor(self.cursor)
            .with_filter(self.filter_focus, &self.date_from_input, &self.date_to_input)
            .with_help(self.show_help)
            .with_confirm(self.confirm.as_ref());
        self.screen.render(frame, &ctx, &mut self.throbber);
    }

    fn accepts_text(&self) -> bool {
        matches!(self.mode, Mode::Filter | Mode::Edit | Mode::AddUser)
    }

    fn quit(&mut self) {
        self.running = false;
    }

    fn dispatch(&mut self, op: SourceOperation) {
        self.status_message = notify::progress(op.label());
        self.tasks.spawn_operation(op);
    }

    fn drain_completions(&mut self) {
        while let Some(done) = self.tasks.try_recv() {
            self.on_completion(done.outcome);
        }
    }

    fn on_completion(&mut self, outcome: SourceOutcome) {
        let message = match &outcome {
            SourceOutcome::Loaded(Ok(users)) => {
                Some(notify::success(&format!("Loaded {} users", users.len())))
            }
            SourceOutcome::Saved(Ok(user)) => {
                Some(notify::success(&format!("Saved {}", user.name)))
            }
            SourceOutcome::Created(Ok(user)) => {
                Some(notify::success(&format!("Created {}", user.name)))
            }
            SourceOutcome::Deleted { result: Ok(()), .. } => {
                Some(notify::success("Deleted 1 user"))
            }
            SourceOutcome::DeletedMany { ids, result: Ok(()) } => {
                Some(notify::success(&format!("Deleted {} users", ids.len())))
            }
            _ => None,
        };
        let load_failed = matches!(outcome, SourceOutcome::Loaded(Err(_)));
        self.table.apply(outcome, &mut self.alerts);
        if let Some(msg) = message {
            self.status_message = msg;
        }
        // The banner error persists until the next load; only echo it once.
        if load_failed {
            if let Some(err) = self.table.error() {
                self.status_message = notify::error(err);
            }
        }
        for alert in self.alerts.drain() {
            self.status_message = notify::error(&alert);
        }
        if self.mode == Mode::AddUser && !self.table.show_add_modal() {
            self.mode = Mode::Browse;
        }
        if self.mode == Mode::Edit && self.table.edit_buffer().is_none() {
            self.mode = Mode::Browse;
        }
        self.clamp_cursor();
    }

    fn page_len(&self) -> usize {
        self.table.view().page().len()
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.page_len().saturating_sub(1));
    }

    fn cursor_user_id(&self) -> Option<u64> {
        self.table.view().page().get(self.cursor).map(|u| u.id)
    }

    /// Returns `true` when the app should quit.
    fn handle_action(&mut self, action: KeyAction) -> bool {
        if action == KeyAction::Quit {
            return true;
        }
        if action == KeyAction::None {
            return false;
        }
        if self.show_help {
            if matches!(action, KeyAction::Help | KeyAction::Back) {
                self.show_help = false;
            }
            return false;
        }
        match self.mode {
            Mode::Browse => self.handle_browse(action),
            Mode::Filter => self.handle_filter(action),
            Mode::Edit => self.handle_edit(action),
            Mode::AddUser => self.handle_add_user(action),
            Mode::Details => {
                if matches!(action, KeyAction::Back | KeyAction::Select | KeyAction::Details) {
                    self.table.close_details();
                    self.mode = Mode::Browse;
                }
            }
            Mode::Confirm => self.handle_confirm(action),
        }
        false
    }

    fn handle_browse(&mut self, action: KeyAction) {
        match action {
            KeyAction::Help => self.show_help = true,
            KeyAction::Back => {
                if self.table.selection().is_empty() {
                    self.status_message = "Press q to quit, ? for help".into();
                } else {
                    self.table.clear_selection();
                    self.status_message = notify::info("Selection cleared");
                }
            }
            KeyAction::NavigateUp => self.cursor = self.cursor.saturating_sub(1),
            KeyAction::NavigateDown => {
                if self.cursor + 1 < self.page_len() {
                    self.cursor += 1;
                }
            }
            KeyAction::PrevPage => {
                if self.table.prev_page() {
                    self.cursor = 0;
                }
            }
            KeyAction::NextPage => {
                if self.table.next_page() {
                    self.cursor = 0;
                }
            }
            KeyAction::FirstPage => {
                if self.table.go_to_page(1) {
                    self.cursor = 0;
                }
            }
            KeyAction::LastPage => {
                let last = self.table.total_pages();
                if self.table.go_to_page(last) {
                    self.cursor = 0;
                }
            }
            KeyAction::ToggleSelect => {
                if let Some(id) = self.cursor_user_id() {
                    self.table.toggle_select(id);
                    self.status_message =
                        notify::info(&format!("{} selected", self.table.selection().len()));
                }
            }
            KeyAction::ToggleSelectAll => {
                self.table.toggle_select_all();
                self.status_message =
                    notify::info(&format!("{} selected", self.table.selection().len()));
            }
            KeyAction::SortBy(column) => {
                self.table.sort_by(column);
                self.clamp_cursor();
            }
            KeyAction::Filter => {
                self.mode = Mode::Filter;
                self.filter_focus = FilterField::Search;
            }
            KeyAction::CycleRoleFilter => {
                let next = match self.table.query().role {
                    None => Some(Role::ALL[0]),
                    Some(Role::Moderator) => None,
                    Some(role) => Some(role.next()),
                };
                self.table.set_role_filter(next);
                self.cursor = 0;
            }
            KeyAction::CycleStatusFilter => {
                let next = match self.table.query().status {
                    None => Some(Status::Active),
                    Some(Status::Active) => Some(Status::Inactive),
                    Some(Status::Inactive) => None,
                };
                self.table.set_status_filter(next);
                self.cursor = 0;
            }
            KeyAction::ClearFilters => {
                self.table.clear_all_filters();
                self.date_from_input.clear();
                self.date_to_input.clear();
                self.cursor = 0;
                self.status_message = notify::info("Filters cleared");
            }
            KeyAction::AddUser => {
                self.table.open_add_modal();
                self.mode = Mode::AddUser;
            }
            KeyAction::Edit => {
                if let Some(id) = self.cursor_user_id() {
                    if self.table.start_edit(id) {
                        self.mode = Mode::Edit;
                    }
                }
            }
            KeyAction::Select | KeyAction::Details => {
                if let Some(id) = self.cursor_user_id() {
                    if self.table.open_details(id) {
                        self.mode = Mode::Details;
                    }
                }
            }
            KeyAction::Delete => {
                if let Some(id) = self.cursor_user_id() {
                    let mut capture = PromptCapture::default();
                    self.table.request_delete(id, &mut capture);
                    self.ask(capture, PendingDelete::One(id));
                }
            }
            KeyAction::DeleteSelected => {
                let mut capture = PromptCapture::default();
                self.table.request_delete_selected(&mut capture);
                if capture.prompt.is_none() {
                    self.status_message = notify::info("Nothing selected");
                }
                self.ask(capture, PendingDelete::Selected);
            }
            KeyAction::ToggleStatus => {
                if let Some(id) = self.cursor_user_id() {
                    if let Some(status) = self.table.toggle_status(id) {
                        self.status_message = notify::success(&format!(
                            "User {} is now {}",
                            id,
                            roster::format::status_label(status)
                        ));
                    }
                }
            }
            KeyAction::Export => self.export(),
            KeyAction::Reload => {
                if !self.table.is_loading() {
                    let load = self.table.begin_load();
                    self.dispatch(load);
                }
            }
            _ => {}
        }
    }

    fn ask(&mut self, capture: PromptCapture, pending: PendingDelete) {
        if let Some(prompt) = capture.prompt {
            self.confirm = Some(ConfirmState { prompt, pending });
            self.mode = Mode::Confirm;
        }
    }

    fn handle_confirm(&mut self, action: KeyAction) {
        let Some(state) = self.confirm.take() else {
            self.mode = Mode::Browse;
            return;
        };
        self.mode = Mode::Browse;
        if action != KeyAction::Confirm {
            self.status_message = notify::info("Cancelled");
            return;
        }
        let op = match state.pending {
            PendingDelete::One(id) => self.table.request_delete(id, &mut Answered(true)),
            PendingDelete::Selected => self.table.request_delete_selected(&mut Answered(true)),
        };
        if let Some(op) = op {
            self.dispatch(op);
        }
    }

    fn handle_filter(&mut self, action: KeyAction) {
        match action {
            KeyAction::Back => self.mode = Mode::Browse,
            KeyAction::NextField => self.filter_focus = self.filter_focus.next(),
            KeyAction::InputChar(c) => match self.filter_focus {
                FilterField::Search => {
                    let mut search = self.table.query().search.clone();
                    search.push(c);
                    self.table.set_search(search);
                    self.cursor = 0;
                }
                FilterField::DateFrom => self.date_from_input.push(c),
                FilterField::DateTo => self.date_to_input.push(c),
            },
            KeyAction::Backspace => match self.filter_focus {
                FilterField::Search => {
                    let mut search = self.table.query().search.clone();
                    if search.pop().is_some() {
                        self.table.set_search(search);
                        self.cursor = 0;
                    }
                }
                FilterField::DateFrom => {
                    self.date_from_input.pop();
                }
                FilterField::DateTo => {
                    self.date_to_input.pop();
                }
            },
            KeyAction::Select => {
                match (
                    parse_date(&self.date_from_input),
                    parse_date(&self.date_to_input),
                ) {
                    (Ok(from), Ok(to)) => {
                        self.table.set_date_range(from, to);
                        self.cursor = 0;
                        self.mode = Mode::Browse;
                        self.status_message = notify::info(&format!(
                            "{} users match",
                            self.table.view().filtered_count()
                        ));
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        self.status_message = notify::error(&e.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_edit(&mut self, action: KeyAction) {
        match action {
            KeyAction::Back => {
                self.table.cancel_edit();
                self.mode = Mode::Browse;
                self.status_message = notify::info("Edit cancelled");
            }
            KeyAction::Select => {
                if let Some(op) = self.table.begin_save_edit() {
                    self.dispatch(op);
                }
            }
            _ => {
                let Some(buffer) = self.table.edit_buffer_mut() else {
                    self.mode = Mode::Browse;
                    return;
                };
                match action {
                    KeyAction::NextField => buffer.focus_next(),
                    KeyAction::InputChar(' ') if buffer.focus == EditField::Role => {
                        buffer.cycle_role()
                    }
                    KeyAction::InputChar(c) => buffer.append_input_char(c),
                    KeyAction::Backspace => {
                        buffer.pop_input_char();
                    }
                    _ => {}
                }
            }
        }
    }

    fn handle_add_user(&mut self, action: KeyAction) {
        match action {
            KeyAction::Back => {
                self.table.close_add_modal();
                self.mode = Mode::Browse;
            }
            KeyAction::Select => match self.table.begin_add() {
                Some(op) => self.dispatch(op),
                None if !self.table.is_new_user_valid() => {
                    self.status_message = notify::error("Check the highlighted fields");
                }
                None => {
                    self.status_message = notify::info("Busy saving, try again in a moment");
                }
            },
            KeyAction::NextField => {
                let focus = self.table.create_form().focus;
                match focus {
                    CreateField::Name => self.table.validate_new_name(),
                    CreateField::Email => self.table.validate_new_email(),
                    _ => {}
                }
                let form = self.table.create_form_mut();
                form.focus = form.focus.next();
            }
            KeyAction::InputChar(' ')
                if matches!(
                    self.table.create_form().focus,
                    CreateField::Role | CreateField::WelcomeEmail
                ) =>
            {
                self.table.create_form_mut().toggle_focused();
            }
            KeyAction::InputChar(c) => self.table.create_form_mut().append_input_char(c),
            KeyAction::Backspace => {
                self.table.create_form_mut().pop_input_char();
            }
            _ => {}
        }
    }

    fn export(&mut self) {
        let count = self.table.export_users().len();
        let result = self
            .table
            .export_csv()
            .and_then(|csv| self.sink.save(&export_filename(Utc::now()), &csv));
        self.status_message = match result {
            Ok(path) => notify::success(&format!("Exported {} users to {}", count, path.display())),
            Err(e) => notify::error(&format!(
                "Export to {} failed: {}",
                self.sink.dir().display(),
                e
            )),
        };
    }
}

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use roster::SortColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    Back,
    NavigateUp,
    NavigateDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    Select,
    ToggleSelect,
    ToggleSelectAll,
    SortBy(SortColumn),
    Filter,
    CycleRoleFilter,
    CycleStatusFilter,
    ClearFilters,
    AddUser,
    Edit,
    Details,
    Delete,
    DeleteSelected,
    ToggleStatus,
    Export,
    Reload,
    Confirm,
    Help,
    NextField,
    InputChar(char),
    Backspace,
    None,
}

#[derive(Debug)]
pub struct KeyHandler;

impl KeyHandler {
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for a key press.
    ///
    /// `text_input` routes printable keys to [`KeyAction::InputChar`] instead of
    /// commands, for forms and the filter bar.
    pub fn poll_crossterm_events(
        &mut self,
        timeout: Duration,
        text_input: bool,
    ) -> color_eyre::Result<KeyAction> {
        if !event::poll(timeout)? {
            return Ok(KeyAction::None);
        }
        match event::read()? {
            // it's important to check KeyEventKind::Press to avoid handling key release events
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(if text_input {
                self.on_text_key_event(key)
            } else {
                self.on_key_event(key)
            }),
            _ => Ok(KeyAction::None),
        }
    }

    pub fn on_key_event(&mut self, key: KeyEvent) -> KeyAction {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => KeyAction::Quit,
            (_, KeyCode::Char('q')) => KeyAction::Quit,
            (_, KeyCode::Esc) => KeyAction::Back,
            (_, KeyCode::Char('?')) => KeyAction::Help,
            (_, KeyCode::Up | KeyCode::Char('k')) => KeyAction::NavigateUp,
            (_, KeyCode::Down | KeyCode::Char('j')) => KeyAction::NavigateDown,
            (_, KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp) => KeyAction::PrevPage,
            (_, KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown) => KeyAction::NextPage,
            (_, KeyCode::Home) => KeyAction::FirstPage,
            (_, KeyCode::End) => KeyAction::LastPage,
            (_, KeyCode::Enter) => KeyAction::Select,
            (_, KeyCode::Char(' ')) => KeyAction::ToggleSelect,
            (_, KeyCode::Char('a')) => KeyAction::ToggleSelectAll,
            (_, KeyCode::Char('1')) => KeyAction::SortBy(SortColumn::Id),
            (_, KeyCode::Char('2')) => KeyAction::SortBy(SortColumn::Name),
            (_, KeyCode::Char('3')) => KeyAction::SortBy(SortColumn::Email),
            (_, KeyCode::Char('4')) => KeyAction::SortBy(SortColumn::RegistrationDate),
            (_, KeyCode::Char('/')) => KeyAction::Filter,
            (_, KeyCode::Char('r')) => KeyAction::CycleRoleFilter,
            (_, KeyCode::Char('t')) => KeyAction::CycleStatusFilter,
            (_, KeyCode::Char('c')) => KeyAction::ClearFilters,
            (_, KeyCode::Char('n')) => KeyAction::AddUser,
            (_, KeyCode::Char('e')) => KeyAction::Edit,
            (_, KeyCode::Char('i')) => KeyAction::Details,
            (_, KeyCode::Char('d')) => KeyAction::Delete,
            (_, KeyCode::Char('D')) => KeyAction::DeleteSelected,
            (_, KeyCode::Char('s')) => KeyAction::ToggleStatus,
            (_, KeyCode::Char('x')) => KeyAction::Export,
            (_, KeyCode::Char('R')) => KeyAction::Reload,
            (_, KeyCode::Char('y')) => KeyAction::Confirm,
            _ => KeyAction::None,
        }
    }

    pub fn on_text_key_event(&mut self, key: KeyEvent) -> KeyAction {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => KeyAction::Quit,
            (_, KeyCode::Esc) => KeyAction::Back,
            (_, KeyCode::Enter) => KeyAction::Select,
            (_, KeyCode::Tab | KeyCode::Down) => KeyAction::NextField,
            (_, KeyCode::Backspace) => KeyAction::Backspace,
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => KeyAction::InputChar(c),
            _ => KeyAction::None,
        }
    }
}

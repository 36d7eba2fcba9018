//! Collaborator seams for user-facing prompts and alerts, plus the status symbols
//! used when rendering them.

/// Success indicator (✓)
pub const SUCCESS: &str = "✓";

/// Error indicator (✗)
pub const ERROR: &str = "✗";

/// Progress/loading indicator (⟳)
pub const PROGRESS: &str = "⟳";

/// Information indicator (ℹ)
pub const INFO: &str = "ℹ";

pub fn success(msg: &str) -> String {
    format!("{} {}", SUCCESS, msg)
}

pub fn error(msg: &str) -> String {
    format!("{} {}", ERROR, msg)
}

pub fn progress(msg: &str) -> String {
    format!("{} {}...", PROGRESS, msg)
}

pub fn info(msg: &str) -> String {
    format!("{} {}", INFO, msg)
}

/// Yes/no prompt consulted before destructive operations.
///
/// The table calls it synchronously and abandons the operation on `false`.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A gate whose answer was collected ahead of time, e.g. by a modal dialog.
#[derive(Debug, Clone, Copy)]
pub struct Answered(pub bool);

impl ConfirmGate for Answered {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Declines every prompt but remembers it, so a front-end can ask the user
/// asynchronously and replay the request with [`Answered`].
#[derive(Debug, Default, Clone)]
pub struct PromptCapture {
    pub prompt: Option<String>,
}

impl ConfirmGate for PromptCapture {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompt = Some(prompt.to_string());
        false
    }
}

/// Fire-and-forget alert surface for operation failures.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<F> Notifier for F
where
    F: FnMut(&str),
{
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

/// Collects alerts in memory; the front-end drains it into its status line.
#[derive(Debug, Default, Clone)]
pub struct AlertLog {
    alerts: Vec<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Notifier for AlertLog {
    fn notify(&mut self, message: &str) {
        log::warn!("alert: {}", message);
        self.alerts.push(message.to_string());
    }
}

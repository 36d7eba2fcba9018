use ratatui::{
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui_utils::modal_frame;

#[derive(Debug)]
pub struct ConfirmDialog;

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, prompt: &str) {
        let inner = modal_frame(frame, area, "Подтверждение");
        let lines = vec![
            Line::from(Span::styled(prompt, Style::new().bold().red())),
            Line::from(vec![
                Span::styled("y", Style::new().bold().cyan()),
                Span::raw(" Да   "),
                Span::styled("Esc", Style::new().bold().cyan()),
                Span::raw(" Нет"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

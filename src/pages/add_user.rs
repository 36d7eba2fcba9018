use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use roster::format::role_label;
use roster::state::{CreateField, CreateForm};

use crate::render_context::RenderContext;
use crate::ui_utils::{field_lines, modal_frame};

#[derive(Debug)]
pub struct AddUserModal;

impl Default for AddUserModal {
    fn default() -> Self {
        Self::new()
    }
}

impl AddUserModal {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let inner = modal_frame(frame, area, "Новый пользователь");
        let form = ctx.table.create_form();
        frame.render_widget(Paragraph::new(form_lines(form, ctx.table.is_saving())), inner);
    }
}

fn form_lines(form: &CreateForm, saving: bool) -> Vec<Line<'_>> {
    let mut lines = field_lines(
        "Имя",
        &form.name,
        form.focus == CreateField::Name,
        form.errors.name.as_deref(),
    );
    lines.extend(field_lines(
        "Email",
        &form.email,
        form.focus == CreateField::Email,
        form.errors.email.as_deref(),
    ));
    lines.push(toggle_line(
        "Роль",
        format!("< {} >", role_label(form.role)),
        form.focus == CreateField::Role,
    ));
    lines.push(toggle_line(
        "Приветственное письмо",
        if form.send_welcome_email { "[x]" } else { "[ ]" }.to_string(),
        form.focus == CreateField::WelcomeEmail,
    ));
    lines.push(Line::from(""));
    if saving {
        lines.push(Line::from("Сохранение...").cyan());
    } else if form.is_valid() {
        lines.push(Line::from("Enter: Создать").green());
    } else {
        lines.push(Line::from("Заполните имя и email").gray());
    }
    lines
}

fn toggle_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::new().yellow().bold()
    } else {
        Style::new().gray()
    };
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(value),
    ])
}

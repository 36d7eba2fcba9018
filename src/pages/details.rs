use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use roster::format::{
    default_avatar, format_date, format_relative_time, role_label, status_label, ActivityClass,
};
use roster::User;

use crate::ui_utils::{modal_frame, truncate};

#[derive(Debug)]
pub struct DetailsModal;

impl Default for DetailsModal {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailsModal {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, user: &User, now: DateTime<Utc>) {
        let inner = modal_frame(frame, area, "Пользователь");
        let avatar = user
            .avatar
            .clone()
            .unwrap_or_else(|| default_avatar(&user.name));
        let activity = ActivityClass::of(user.last_activity, now);
        let count = |n: Option<u32>| n.unwrap_or(0).to_string();

        let lines = vec![
            Line::from(vec![
                Span::styled(initial(&user.name), Style::new().bold().black().on_cyan()),
                Span::raw("  "),
                Span::styled(&user.name, Style::new().bold()),
            ]),
            Line::from(""),
            row("ID", user.id.to_string()),
            row("Email", user.email.clone()),
            row("Роль", role_label(user.role).to_string()),
            row("Статус", status_label(user.status).to_string()),
            row("Регистрация", format_date(user.registration_date)),
            Line::from(vec![
                Span::styled(format!("{:<14}", "Активность"), Style::new().gray()),
                Span::styled(
                    format_relative_time(user.last_activity, now),
                    activity_style(activity),
                ),
            ]),
            row("Входов", count(user.login_count)),
            row("Постов", count(user.posts_count)),
            row("Комментариев", count(user.comments_count)),
            Line::from(""),
            Line::from(Span::styled(truncate(&avatar, 56), Style::new().dark_gray())),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::new().gray()),
        Span::raw(value),
    ])
}

fn initial(name: &str) -> String {
    let c: String = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    format!(" {} ", c)
}

fn activity_style(class: ActivityClass) -> Style {
    match class {
        ActivityClass::Recent => Style::new().green(),
        ActivityClass::Week => Style::new().cyan(),
        ActivityClass::Month => Style::new().yellow(),
        ActivityClass::Old => Style::new().fg(Color::DarkGray),
    }
}

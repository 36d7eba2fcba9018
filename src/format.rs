//! Display helpers: labels, Russian dates, relative times and avatars.

use chrono::{DateTime, Datelike, Utc};

use crate::data::{Role, Status};

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const AVATAR_COLORS: [&str; 5] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8"];

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Администратор",
        Role::Standard => "Пользователь",
        Role::Moderator => "Модератор",
    }
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Active => "Активен",
        Status::Inactive => "Неактивен",
    }
}

/// Long Russian date, e.g. `15 марта 2020 г.`
pub fn format_date(date: DateTime<Utc>) -> String {
    format!(
        "{} {} {} г.",
        date.day(),
        MONTHS_GENITIVE[date.month0() as usize],
        date.year()
    )
}

/// Minutes-ago for the last hour, the long date beyond that.
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = (now - date).num_minutes();
    if mins < 1 {
        "только что".to_string()
    } else if mins < 60 {
        format!("{} мин. назад", mins)
    } else {
        format_date(date)
    }
}

/// Recency bucket of a last-activity timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityClass {
    Recent,
    Week,
    Month,
    Old,
}

impl ActivityClass {
    pub fn of(date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        match (now - date).num_days() {
            d if d < 1 => ActivityClass::Recent,
            d if d < 7 => ActivityClass::Week,
            d if d < 30 => ActivityClass::Month,
            _ => ActivityClass::Old,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityClass::Recent => "activity-recent",
            ActivityClass::Week => "activity-week",
            ActivityClass::Month => "activity-month",
            ActivityClass::Old => "activity-old",
        }
    }
}

/// SVG data URI showing the name's initial on a colour picked from its first
/// character.
pub fn default_avatar(name: &str) -> String {
    let first = name.chars().next();
    let initial: String = first.map(|c| c.to_uppercase().collect()).unwrap_or_default();
    let color = AVATAR_COLORS[first.map_or(0, |c| c as usize % AVATAR_COLORS.len())];
    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='40' height='40'%3E\
         %3Crect width='40' height='40' fill='{}'/%3E\
         %3Ctext x='50%25' y='50%25' dominant-baseline='middle' text-anchor='middle' \
         font-family='Arial' font-size='20' fill='white'%3E{}%3C/text%3E%3C/svg%3E",
        urlencoding::encode(color),
        initial
    )
}

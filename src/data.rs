use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(rename = "user")]
    Standard,
    Moderator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Standard, Role::Moderator];

    /// Next role in declaration order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Role::Admin => Role::Standard,
            Role::Standard => Role::Moderator,
            Role::Moderator => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Id,
    Name,
    Email,
    RegistrationDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// One managed user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub registration_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u32>,
}

impl User {
    /// A freshly registered, active user with zeroed counters.
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            status: Status::Active,
            registration_date: now,
            last_activity: now,
            avatar: None,
            login_count: Some(0),
            posts_count: Some(0),
            comments_count: Some(0),
        }
    }
}

const SAMPLE_NAMES: [&str; 10] = [
    "Иван Петров",
    "Мария Сидорова",
    "Алексей Смирнов",
    "Елена Кузнецова",
    "Дмитрий Попов",
    "Ольга Васильева",
    "Сергей Соколов",
    "Анна Михайлова",
    "Николай Новиков",
    "Татьяна Федорова",
];

/// Generates `count` synthetic users with ids `1..=count`.
///
/// Registration dates fall in 2020, last activity within the past 30 days.
pub fn generate_sample_users<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<User> {
    let now = Utc::now();
    (1..=count as u64)
        .map(|id| {
            let name = SAMPLE_NAMES[rng.random_range(0..SAMPLE_NAMES.len())];
            let role = Role::ALL[rng.random_range(0..Role::ALL.len())];
            let status = if rng.random_bool(0.5) {
                Status::Active
            } else {
                Status::Inactive
            };
            let registration_date = NaiveDate::from_ymd_opt(
                2020,
                rng.random_range(1..=12),
                rng.random_range(1..=28),
            )
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(now);
            let idle_ms = rng.random_range(0..30 * 24 * 60 * 60 * 1000_i64);

            User {
                id,
                name: format!("{} {}", name, id),
                email: format!("user{}@example.com", id),
                role,
                status,
                registration_date,
                last_activity: now - Duration::milliseconds(idle_ms),
                avatar: None,
                login_count: Some(rng.random_range(0..500)),
                posts_count: Some(rng.random_range(0..100)),
                comments_count: Some(rng.random_range(0..300)),
            }
        })
        .collect()
}

//! CSV export and the file-download sink.
//!
//! Every data cell is double-quoted. The header row is written as-is and the
//! whole document is prefixed with a UTF-8 byte-order mark so spreadsheet apps
//! pick up the Cyrillic headers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::data::User;
use crate::error::ExportError;
use crate::format::{format_date, role_label, status_label};

pub const BOM: char = '\u{feff}';
pub const CSV_HEADERS: [&str; 6] = ["ID", "Имя", "Email", "Роль", "Статус", "Дата регистрации"];

/// Renders `users` as a BOM-prefixed CSV document.
pub fn users_to_csv(users: &[&User]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for user in users {
        writer.write_record([
            user.id.to_string(),
            user.name.clone(),
            user.email.clone(),
            role_label(user.role).to_string(),
            status_label(user.status).to_string(),
            format_date(user.registration_date),
        ])?;
    }
    let rows = writer.into_inner().map_err(|e| e.into_error())?;

    let mut out = String::with_capacity(rows.len() + 64);
    out.push(BOM);
    out.push_str(&CSV_HEADERS.join(","));
    out.push('\n');
    // Rows are newline-separated, with nothing after the last one.
    out.push_str(String::from_utf8_lossy(&rows).trim_end_matches('\n'));
    Ok(out)
}

/// `users_<unix millis>.csv`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("users_{}.csv", now.timestamp_millis())
}

/// Destination for generated export files.
pub trait ExportSink {
    /// Stores `contents` under `filename` and returns where it went.
    fn save(&mut self, filename: &str, contents: &str) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, contents)?;
        log::info!("exported {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Role, Status};
    use chrono::TimeZone;

    fn sample(id: u64, name: &str) -> User {
        let mut u = User::new(id, name, format!("u{id}@example.com"), Role::Moderator);
        u.status = Status::Inactive;
        u.registration_date = Utc.with_ymd_and_hms(2020, 3, 15, 8, 0, 0).unwrap();
        u
    }

    #[test]
    fn test_csv_header_and_rows() {
        let a = sample(1, "Иван Петров 1");
        let b = sample(2, "Мария Сидорова 2");
        let csv = users_to_csv(&[&a, &b]).unwrap();

        assert!(csv.starts_with('\u{feff}'));
        let lines: Vec<&str> = csv.trim_start_matches(BOM).lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Имя,Email,Роль,Статус,Дата регистрации");
        assert_eq!(
            lines[1],
            r#""1","Иван Петров 1","u1@example.com","Модератор","Неактивен","15 марта 2020 г.""#
        );
    }

    #[test]
    fn test_csv_has_no_trailing_newline() {
        let a = sample(1, "Иван Петров 1");
        let csv = users_to_csv(&[&a]).unwrap();
        assert!(csv.ends_with(r#""15 марта 2020 г.""#));
        assert_eq!(users_to_csv(&[]).unwrap(), "\u{feff}ID,Имя,Email,Роль,Статус,Дата регистрации\n");
    }

    #[test]
    fn test_csv_empty_export_is_header_only() {
        let csv = users_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_csv_escapes_embedded_quotes() {
        let a = sample(3, r#"Ann "The Admin""#);
        let csv = users_to_csv(&[&a]).unwrap();
        assert!(csv.contains(r#""Ann ""The Admin""""#));
    }

    #[test]
    fn test_export_filename() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(export_filename(now), "users_1700000000123.csv");
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path().join("exports"));
        assert_eq!(sink.dir(), tmp.path().join("exports"));
        let path = sink.save("users_1.csv", "\u{feff}ID\n").unwrap();
        assert_eq!(path, tmp.path().join("exports").join("users_1.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "\u{feff}ID\n");
    }
}

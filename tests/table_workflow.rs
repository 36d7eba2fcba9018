//! End-to-end table workflows against scripted record sources.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use roster::export::{BOM, CSV_HEADERS};
use roster::notify::{AlertLog, Answered};
use roster::source::SourceResult;
use roster::{
    Latency, RecordSource, Role, SampleSource, SourceError, SourceOperation, TaskManager, User,
    UserTable,
};

/// In-memory source whose calls can be switched to fail.
struct ScriptedSource {
    users: Vec<User>,
    failing: AtomicBool,
}

impl ScriptedSource {
    fn with_users(count: u64) -> Self {
        Self {
            users: (1..=count)
                .map(|i| {
                    User::new(i, format!("User {i}"), format!("user{i}@example.com"), Role::Standard)
                })
                .collect(),
            failing: AtomicBool::new(false),
        }
    }

    fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> SourceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl RecordSource for ScriptedSource {
    fn fetch_all(&self) -> SourceResult<Vec<User>> {
        self.check()?;
        Ok(self.users.clone())
    }

    fn save(&self, user: &User) -> SourceResult<User> {
        self.check()?;
        Ok(user.clone())
    }

    fn create(&self, user: &User) -> SourceResult<User> {
        self.check()?;
        Ok(user.clone())
    }

    fn delete(&self, _id: u64) -> SourceResult<()> {
        self.check()
    }

    fn delete_many(&self, _ids: &[u64]) -> SourceResult<()> {
        self.check()
    }
}

fn loaded(source: &ScriptedSource, page_size: usize) -> UserTable {
    let mut table = UserTable::new(NonZeroUsize::new(page_size).unwrap());
    let op = table.begin_load();
    table.perform(op, source, &mut AlertLog::new());
    table
}

#[test]
fn test_load_paginates() {
    let source = ScriptedSource::with_users(10);
    let table = loaded(&source, 3);
    let view = table.view();
    assert_eq!(view.total_pages, 4);
    assert_eq!(view.page().len(), 3);
    assert_eq!((view.pagination_start, view.pagination_end), (1, 3));
    assert!(!table.is_loading());
}

#[test]
fn test_failed_reload_keeps_collection() {
    let source = ScriptedSource::with_users(5);
    let mut table = loaded(&source, 25);
    source.fail(true);
    let op = table.begin_load();
    table.perform(op, &source, &mut AlertLog::new());
    assert_eq!(table.users().len(), 5);
    assert!(table.error().is_some_and(|e| e.starts_with("Ошибка загрузки")));
    assert!(!table.is_loading());
}

#[test]
fn test_select_all_twice_restores_selection() {
    let source = ScriptedSource::with_users(10);
    let mut table = loaded(&source, 3);
    table.toggle_select(9);
    let before = table.selection().clone();
    table.toggle_select_all();
    assert!(table.is_all_selected());
    table.toggle_select_all();
    assert_eq!(table.selection(), &before);
}

#[test]
fn test_bulk_delete_removes_selected() {
    let source = ScriptedSource::with_users(10);
    let mut table = loaded(&source, 3);
    table.go_to_page(4);
    table.toggle_select(10);
    table.toggle_select(1);

    let mut declined = |_: &str| false;
    assert!(table.request_delete_selected(&mut declined).is_none());

    let op = table
        .request_delete_selected(&mut Answered(true))
        .expect("selection is not empty");
    assert_eq!(op, SourceOperation::DeleteMany(vec![1, 10]));
    table.perform(op, &source, &mut AlertLog::new());

    assert_eq!(table.users().len(), 8);
    assert!(table.selection().is_empty());
    assert_eq!(table.query().page, 3);
}

#[test]
fn test_failed_delete_alerts_and_keeps_record() {
    let source = ScriptedSource::with_users(3);
    let mut table = loaded(&source, 25);
    source.fail(true);
    let mut alerts = AlertLog::new();
    let op = table.request_delete(2, &mut Answered(true)).unwrap();
    table.perform(op, &source, &mut alerts);
    assert_eq!(table.users().len(), 3);
    assert!(alerts.latest().is_some_and(|a| a.starts_with("Ошибка удаления")));
}

#[test]
fn test_create_rejects_duplicate_email() {
    let source = ScriptedSource::with_users(3);
    let mut table = loaded(&source, 25);
    table.open_add_modal();
    table.create_form_mut().name = "Новый".into();
    table.create_form_mut().email = " USER2@example.com ".into();
    assert!(table.begin_add().is_none());
    assert!(table.create_form().errors.email.is_some());

    table.create_form_mut().email = "fresh@example.com".into();
    let op = table.begin_add().expect("form is valid");
    table.perform(op, &source, &mut AlertLog::new());
    assert_eq!(table.users()[0].id, 4);
    assert!(!table.show_add_modal());
}

#[test]
fn test_edit_roundtrip_through_source() {
    let source = ScriptedSource::with_users(3);
    let mut table = loaded(&source, 25);
    assert!(table.start_edit(2));
    table.edit_buffer_mut().unwrap().name = "Renamed".into();
    let op = table.begin_save_edit().unwrap();
    assert!(table.is_saving());
    table.perform(op, &source, &mut AlertLog::new());
    assert_eq!(table.user(2).map(|u| u.name.as_str()), Some("Renamed"));
    assert!(table.edit_buffer().is_none());
    assert!(!table.is_saving());
}

#[test]
fn test_export_has_header_and_row_per_user() {
    let source = ScriptedSource::with_users(7);
    let mut table = loaded(&source, 3);
    table.set_search("user");
    let csv = table.export_csv().unwrap();
    assert!(csv.starts_with(BOM));
    let lines: Vec<&str> = csv.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].contains(CSV_HEADERS[1]));
}

#[test]
fn test_task_manager_round_trip() {
    let source = Arc::new(SampleSource::seeded(12, Latency::NONE, 1));
    let mut tasks = TaskManager::new(source);
    let mut table = UserTable::new(NonZeroUsize::new(5).unwrap());

    let ticket = tasks.spawn_operation(table.begin_load());
    assert!(table.is_loading());
    let done = tasks
        .wait(Duration::from_secs(5))
        .expect("load finishes");
    assert_eq!(done.ticket, ticket);
    table.apply(done.outcome, &mut AlertLog::new());

    assert_eq!(table.users().len(), 12);
    assert_eq!(table.total_pages(), 3);
    assert!(!tasks.has_pending());
}

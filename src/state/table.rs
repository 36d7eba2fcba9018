//! The user table store.
//!
//! Owns the raw collection plus every UI-driven parameter, and exposes derived
//! views and mutators. Operations that cross the record-source boundary are split
//! in two: a `begin_*`/`request_*` half that validates, raises the in-flight flag
//! and returns a [`SourceOperation`], and a `finish_*` half (usually reached via
//! [`UserTable::apply`]) that commits the outcome and clears the flag.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use chrono::NaiveDate;

use crate::async_task::{SourceOperation, SourceOutcome};
use crate::data::{Role, SortColumn, Status, User};
use crate::error::{ExportError, SourceError, TableError};
use crate::export;
use crate::notify::{ConfirmGate, Notifier};
use crate::source::{RecordSource, SourceResult};
use crate::state::create::CreateForm;
use crate::state::edit::EditBuffer;
use crate::view::{derive_view, TableQuery, TableView};

#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: Vec<User>,
    query: TableQuery,
    selection: BTreeSet<u64>,
    editing: Option<EditBuffer>,
    create: CreateForm,
    show_add_modal: bool,
    details_id: Option<u64>,
    is_loading: bool,
    is_saving: bool,
    error: Option<String>,
}

impl UserTable {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            query: TableQuery::new(page_size),
            ..Default::default()
        }
    }

    /// A table pre-populated with `users`, skipping the initial load.
    pub fn with_users(users: Vec<User>, page_size: NonZeroUsize) -> Self {
        Self {
            users,
            ..Self::new(page_size)
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    pub fn selection(&self) -> &BTreeSet<u64> {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    // ----- derived views -------------------------------------------------

    /// Filtered, sorted and paginated view of the current state.
    pub fn view(&self) -> TableView<'_> {
        derive_view(&self.users, &self.query)
    }

    pub fn total_pages(&self) -> usize {
        self.view().total_pages
    }

    /// True when the visible page is non-empty and every row on it is selected.
    pub fn is_all_selected(&self) -> bool {
        let view = self.view();
        let page = view.page();
        !page.is_empty() && page.iter().all(|u| self.selection.contains(&u.id))
    }

    pub fn is_new_user_valid(&self) -> bool {
        self.create.is_valid()
    }

    // ----- parameters ----------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.reset_page();
    }

    pub fn set_role_filter(&mut self, role: Option<Role>) {
        self.query.role = role;
        self.reset_page();
    }

    pub fn set_status_filter(&mut self, status: Option<Status>) {
        self.query.status = status;
        self.reset_page();
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.query.date_from = from;
        self.query.date_to = to;
        self.reset_page();
    }

    /// Rejects zero and leaves the current size in place.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        self.query.set_page_size(size)?;
        self.reset_page();
        Ok(())
    }

    pub fn clear_date_filter(&mut self) {
        self.set_date_range(None, None);
    }

    pub fn clear_all_filters(&mut self) {
        self.query.search.clear();
        self.query.role = None;
        self.query.status = None;
        self.clear_date_filter();
    }

    pub fn reset_page(&mut self) {
        self.query.page = 1;
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.query.sort_column == column {
            self.query.sort_direction = self.query.sort_direction.flipped();
        } else {
            self.query.sort_column = column;
            self.query.sort_direction = Default::default();
        }
        log::debug!(
            "sort by {:?} {:?}",
            self.query.sort_column,
            self.query.sort_direction
        );
    }

    /// Moves to `page` if it lies in `1..=total_pages`.
    ///
    /// Returns `true` if the page changed; out-of-range targets are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            let changed = self.query.page != page;
            self.query.page = page;
            changed
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.query.page.saturating_sub(1))
    }

    fn clamp_page(&mut self) {
        let last = self.total_pages().max(1);
        self.query.page = self.query.page.clamp(1, last);
    }

    // ----- selection -----------------------------------------------------

    pub fn toggle_select(&mut self, id: u64) {
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Selects every row on the visible page, or deselects them all when they
    /// already are. Selections on other pages are untouched.
    pub fn toggle_select_all(&mut self) {
        let all_selected = self.is_all_selected();
        let page_ids: Vec<u64> = self.view().page_ids().collect();
        if all_selected {
            for id in page_ids {
                self.selection.remove(&id);
            }
        } else {
            self.selection.extend(page_ids);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ----- editing -------------------------------------------------------

    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.editing.as_mut()
    }

    pub fn editing_user_id(&self) -> Option<u64> {
        self.editing.as_ref().map(|e| e.user_id)
    }

    /// Opens the edit buffer on `id`, replacing any edit in progress.
    ///
    /// Returns `false` if no such record exists.
    pub fn start_edit(&mut self, id: u64) -> bool {
        match self.user(id) {
            Some(user) => {
                self.editing = Some(EditBuffer::from_user(user));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Prepares the buffered edit for persistence.
    pub fn begin_save_edit(&mut self) -> Option<SourceOperation> {
        if self.is_saving {
            return None;
        }
        let buffer = self.editing.as_ref()?;
        let mut updated = self.user(buffer.user_id)?.clone();
        buffer.apply_to(&mut updated);
        self.is_saving = true;
        Some(SourceOperation::Save(updated))
    }

    pub fn finish_save_edit(&mut self, result: SourceResult<User>, notifier: &mut dyn Notifier) {
        match result {
            Ok(saved) => {
                let id = saved.id;
                match self.users.iter_mut().find(|u| u.id == id) {
                    Some(slot) => {
                        log::info!("saved user {}", id);
                        *slot = saved;
                    }
                    None => {
                        log::warn!("saved user {} is no longer in the collection", id);
                        notifier.notify(&format!(
                            "Ошибка сохранения: {}",
                            SourceError::NotFound(id)
                        ));
                    }
                }
                // The buffer may already belong to another record.
                if self.editing_user_id() == Some(id) {
                    self.cancel_edit();
                }
            }
            Err(e) => {
                log::warn!("save failed: {}", e);
                notifier.notify(&format!("Ошибка сохранения: {}", e));
            }
        }
        self.is_saving = false;
    }

    // ----- status --------------------------------------------------------

    /// Flips active/inactive in place, returning the new status.
    pub fn toggle_status(&mut self, id: u64) -> Option<Status> {
        let user = self.users.iter_mut().find(|u| u.id == id)?;
        user.status = user.status.toggled();
        log::debug!("user {} is now {:?}", id, user.status);
        Some(user.status)
    }

    // ----- deletion ------------------------------------------------------

    pub fn request_delete(
        &mut self,
        id: u64,
        gate: &mut dyn ConfirmGate,
    ) -> Option<SourceOperation> {
        if !gate.confirm("Удалить?") {
            return None;
        }
        Some(SourceOperation::Delete(id))
    }

    /// Requests deletion of every selected id, orphans included.
    pub fn request_delete_selected(
        &mut self,
        gate: &mut dyn ConfirmGate,
    ) -> Option<SourceOperation> {
        if self.selection.is_empty() {
            return None;
        }
        if !gate.confirm(&format!("Удалить {}?", self.selection.len())) {
            return None;
        }
        Some(SourceOperation::DeleteMany(
            self.selection.iter().copied().collect(),
        ))
    }

    pub fn finish_delete(&mut self, id: u64, result: SourceResult<()>, notifier: &mut dyn Notifier) {
        match result {
            Ok(()) => self.remove_users(&[id]),
            Err(e) => {
                log::warn!("delete of {} failed: {}", id, e);
                notifier.notify(&format!("Ошибка удаления: {}", e));
            }
        }
    }

    pub fn finish_delete_many(
        &mut self,
        ids: &[u64],
        result: SourceResult<()>,
        notifier: &mut dyn Notifier,
    ) {
        match result {
            Ok(()) => self.remove_users(ids),
            Err(e) => {
                log::warn!("bulk delete of {} users failed: {}", ids.len(), e);
                notifier.notify(&format!("Ошибка: {}", e));
            }
        }
    }

    fn remove_users(&mut self, ids: &[u64]) {
        let before = self.users.len();
        self.users.retain(|u| !ids.contains(&u.id));
        for id in ids {
            self.selection.remove(id);
        }
        if self.editing_user_id().is_some_and(|e| ids.contains(&e)) {
            self.cancel_edit();
        }
        if self.details_id.is_some_and(|d| ids.contains(&d)) {
            self.close_details();
        }
        self.clamp_page();
        log::info!("deleted {} users", before - self.users.len());
    }

    // ----- creation ------------------------------------------------------

    pub fn create_form(&self) -> &CreateForm {
        &self.create
    }

    pub fn create_form_mut(&mut self) -> &mut CreateForm {
        &mut self.create
    }

    pub fn show_add_modal(&self) -> bool {
        self.show_add_modal
    }

    /// Opens the add modal with a blank form.
    pub fn open_add_modal(&mut self) {
        self.create = CreateForm::new();
        self.show_add_modal = true;
    }

    pub fn close_add_modal(&mut self) {
        self.show_add_modal = false;
    }

    pub fn validate_new_name(&mut self) {
        self.create.validate_name();
    }

    pub fn validate_new_email(&mut self) {
        self.create.validate_email(&self.users);
    }

    /// Next identity: one past the current maximum, or 1 when empty.
    pub fn next_id(&self) -> u64 {
        self.users.iter().map(|u| u.id).max().map_or(1, |max| max + 1)
    }

    /// Validates the create form and, if it passes, prepares the new record.
    ///
    /// On validation failure the form carries field errors and nothing else changes.
    pub fn begin_add(&mut self) -> Option<SourceOperation> {
        self.create.validate(&self.users);
        if !self.create.is_valid() {
            log::warn!("rejected new user: {:?}", self.create.errors);
            return None;
        }
        if self.is_saving {
            return None;
        }
        self.is_saving = true;
        Some(SourceOperation::Create(self.create.to_user(self.next_id())))
    }

    /// Prepends the created record. Identity is re-assigned if another record
    /// claimed it while the operation was in flight.
    pub fn finish_add(&mut self, result: SourceResult<User>, notifier: &mut dyn Notifier) {
        match result {
            Ok(mut user) => {
                if self.user(user.id).is_some() {
                    user.id = self.next_id();
                }
                log::info!("created user {} <{}>", user.id, user.email);
                self.users.insert(0, user);
                self.close_add_modal();
            }
            Err(e) => {
                log::warn!("create failed: {}", e);
                notifier.notify(&format!("Ошибка создания: {}", e));
            }
        }
        self.is_saving = false;
    }

    // ----- loading -------------------------------------------------------

    pub fn begin_load(&mut self) -> SourceOperation {
        self.is_loading = true;
        self.error = None;
        SourceOperation::Load
    }

    /// Replaces the collection. A failed load keeps the previous collection and
    /// sets the banner error.
    pub fn finish_load(&mut self, result: SourceResult<Vec<User>>) {
        match result {
            Ok(users) => {
                log::info!("loaded {} users", users.len());
                self.users = users;
                self.clamp_page();
            }
            Err(e) => {
                log::warn!("load failed: {}", e);
                self.error = Some(format!("Ошибка загрузки: {}", e));
            }
        }
        self.is_loading = false;
    }

    // ----- details -------------------------------------------------------

    pub fn open_details(&mut self, id: u64) -> bool {
        if self.user(id).is_some() {
            self.details_id = Some(id);
            true
        } else {
            false
        }
    }

    pub fn close_details(&mut self) {
        self.details_id = None;
    }

    pub fn show_details_modal(&self) -> bool {
        self.details_id.is_some()
    }

    pub fn details_user(&self) -> Option<&User> {
        self.details_id.and_then(|id| self.user(id))
    }

    // ----- export --------------------------------------------------------

    /// Selected records in collection order, or the filtered set when nothing
    /// is selected.
    pub fn export_users(&self) -> Vec<&User> {
        if self.selection.is_empty() {
            self.view().filtered
        } else {
            self.users
                .iter()
                .filter(|u| self.selection.contains(&u.id))
                .collect()
        }
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        export::users_to_csv(&self.export_users())
    }

    // ----- completions ---------------------------------------------------

    /// Commits a finished record-source operation.
    pub fn apply(&mut self, outcome: SourceOutcome, notifier: &mut dyn Notifier) {
        match outcome {
            SourceOutcome::Loaded(result) => self.finish_load(result),
            SourceOutcome::Saved(result) => self.finish_save_edit(result, notifier),
            SourceOutcome::Created(result) => self.finish_add(result, notifier),
            SourceOutcome::Deleted { id, result } => self.finish_delete(id, result, notifier),
            SourceOutcome::DeletedMany { ids, result } => {
                self.finish_delete_many(&ids, result, notifier)
            }
        }
    }

    /// Runs `op` against `source` on the calling thread and applies the outcome.
    pub fn perform(
        &mut self,
        op: SourceOperation,
        source: &dyn RecordSource,
        notifier: &mut dyn Notifier,
    ) {
        let outcome = op.run(source);
        self.apply(outcome, notifier);
    }
}

//! Background execution of record-source operations.
//!
//! Source calls may sleep (simulated latency) or block on a real backend, so they
//! run on worker threads. Results come back over a channel and are applied to the
//! table on the UI thread, which stays the sole owner of the store.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use roster::async_task::{SourceOperation, TaskManager};
//! use roster::notify::AlertLog;
//! use roster::source::{Latency, SampleSource};
//! use roster::state::UserTable;
//!
//! let mut table = UserTable::default();
//! let mut alerts = AlertLog::new();
//! let mut tm = TaskManager::new(Arc::new(SampleSource::new(100, Latency::default())));
//!
//! tm.spawn_operation(table.begin_load());
//!
//! // Poll for completion in your event loop
//! if let Some(done) = tm.try_recv() {
//!     table.apply(done.outcome, &mut alerts);
//! }
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use uuid::Uuid;

use crate::data::User;
use crate::source::{RecordSource, SourceResult};

/// A record-source call requested by the table.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOperation {
    Load,
    Save(User),
    Create(User),
    Delete(u64),
    DeleteMany(Vec<u64>),
}

impl SourceOperation {
    /// Short progress label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            SourceOperation::Load => "Loading users",
            SourceOperation::Save(_) => "Saving user",
            SourceOperation::Create(_) => "Creating user",
            SourceOperation::Delete(_) => "Deleting user",
            SourceOperation::DeleteMany(_) => "Deleting users",
        }
    }

    /// Runs the call against `source` on the current thread.
    pub fn run(self, source: &dyn RecordSource) -> SourceOutcome {
        match self {
            SourceOperation::Load => SourceOutcome::Loaded(source.fetch_all()),
            SourceOperation::Save(user) => SourceOutcome::Saved(source.save(&user)),
            SourceOperation::Create(user) => SourceOutcome::Created(source.create(&user)),
            SourceOperation::Delete(id) => SourceOutcome::Deleted {
                id,
                result: source.delete(id),
            },
            SourceOperation::DeleteMany(ids) => {
                let result = source.delete_many(&ids);
                SourceOutcome::DeletedMany { ids, result }
            }
        }
    }
}

/// Result of a [`SourceOperation`], applied with
/// [`UserTable::apply`](crate::state::UserTable::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Loaded(SourceResult<Vec<User>>),
    Saved(SourceResult<User>),
    Created(SourceResult<User>),
    Deleted { id: u64, result: SourceResult<()> },
    DeletedMany { ids: Vec<u64>, result: SourceResult<()> },
}

/// A finished operation together with the ticket returned at spawn time.
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: Uuid,
    pub outcome: SourceOutcome,
}

/// Task manager for background record-source operations
pub struct TaskManager {
    source: Arc<dyn RecordSource>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: usize,
}

impl TaskManager {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            source,
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Spawns `op` on a worker thread and returns its ticket immediately.
    pub fn spawn_operation(&mut self, op: SourceOperation) -> Uuid {
        let ticket = Uuid::new_v4();
        self.pending += 1;
        let sender = self.sender.clone();
        let source = Arc::clone(&self.source);

        log::debug!("spawning {} ({})", op.label(), ticket);
        thread::spawn(move || {
            let outcome = op.run(source.as_ref());
            // Receiver gone means the app is shutting down.
            let _ = sender.send(Completion { ticket, outcome });
        });
        ticket
    }

    /// Returns a finished operation if one is ready, without blocking.
    pub fn try_recv(&mut self) -> Option<Completion> {
        if self.pending == 0 {
            return None;
        }

        match self.receiver.try_recv() {
            Ok(done) => {
                self.pending -= 1;
                Some(done)
            }
            Err(_) => None,
        }
    }

    /// Blocks up to `timeout` for the next finished operation.
    pub fn wait(&mut self, timeout: Duration) -> Option<Completion> {
        if self.pending == 0 {
            return None;
        }

        match self.receiver.recv_timeout(timeout) {
            Ok(done) => {
                self.pending -= 1;
                Some(done)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Role;
    use crate::source::{Latency, SampleSource};

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(SampleSource::seeded(10, Latency::NONE, 1)))
    }

    #[test]
    fn test_task_manager_creation() {
        let mut tm = manager();
        assert_eq!(tm.pending_count(), 0);
        assert!(!tm.has_pending());
        assert!(tm.try_recv().is_none());
    }

    #[test]
    fn test_spawn_operation() {
        let mut tm = manager();
        tm.spawn_operation(SourceOperation::Load);
        assert_eq!(tm.pending_count(), 1);
        assert!(tm.has_pending());
    }

    #[test]
    fn test_wait_returns_matching_ticket() {
        let mut tm = manager();
        let ticket = tm.spawn_operation(SourceOperation::Load);

        let done = tm.wait(Duration::from_secs(5)).expect("load should finish");
        assert_eq!(done.ticket, ticket);
        match done.outcome {
            SourceOutcome::Loaded(Ok(users)) => assert_eq!(users.len(), 10),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(tm.pending_count(), 0);
    }

    #[test]
    fn test_run_maps_operation_to_outcome() {
        let source = SampleSource::new(0, Latency::NONE);
        let user = User::new(1, "Run", "run@example.com", Role::Standard);

        assert_eq!(
            SourceOperation::Save(user.clone()).run(&source),
            SourceOutcome::Saved(Ok(user))
        );
        assert_eq!(
            SourceOperation::DeleteMany(vec![3, 4]).run(&source),
            SourceOutcome::DeletedMany {
                ids: vec![3, 4],
                result: Ok(())
            }
        );
    }
}

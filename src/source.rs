//! Record sources: the I/O boundary behind load, save, create and delete.
//!
//! [`SampleSource`] stands in for a backend by generating synthetic users and
//! sleeping for a configurable latency before every call returns.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::{generate_sample_users, User};
use crate::error::SourceError;

pub type SourceResult<T> = Result<T, SourceError>;

/// Backend capability consumed by the table store.
///
/// Implementations may block; [`TaskManager`](crate::async_task::TaskManager)
/// runs them off the UI thread.
pub trait RecordSource: Send + Sync {
    fn fetch_all(&self) -> SourceResult<Vec<User>>;
    /// Persists an edited record and returns the stored version.
    fn save(&self, user: &User) -> SourceResult<User>;
    /// Persists a new record and returns the stored version.
    fn create(&self, user: &User) -> SourceResult<User>;
    fn delete(&self, id: u64) -> SourceResult<()>;
    fn delete_many(&self, ids: &[u64]) -> SourceResult<()>;
}

/// Simulated latency per operation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Latency {
    pub load_ms: u64,
    pub save_ms: u64,
    pub create_ms: u64,
    pub delete_ms: u64,
    pub bulk_delete_ms: u64,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            load_ms: 1000,
            save_ms: 500,
            create_ms: 1000,
            delete_ms: 300,
            bulk_delete_ms: 500,
        }
    }
}

impl Latency {
    pub const NONE: Latency = Latency {
        load_ms: 0,
        save_ms: 0,
        create_ms: 0,
        delete_ms: 0,
        bulk_delete_ms: 0,
    };
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Synthetic record source backed by the sample generator.
#[derive(Debug)]
pub struct SampleSource {
    count: usize,
    latency: Latency,
    rng: Mutex<StdRng>,
}

impl SampleSource {
    pub fn new(count: usize, latency: Latency) -> Self {
        Self {
            count,
            latency,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic variant: the same seed yields the same collection.
    pub fn seeded(count: usize, latency: Latency, seed: u64) -> Self {
        Self {
            count,
            latency,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RecordSource for SampleSource {
    fn fetch_all(&self) -> SourceResult<Vec<User>> {
        pause(self.latency.load_ms);
        let mut rng = self.rng.lock().map_err(|_| SourceError::Unavailable)?;
        Ok(generate_sample_users(self.count, &mut *rng))
    }

    fn save(&self, user: &User) -> SourceResult<User> {
        pause(self.latency.save_ms);
        Ok(user.clone())
    }

    fn create(&self, user: &User) -> SourceResult<User> {
        pause(self.latency.create_ms);
        Ok(user.clone())
    }

    fn delete(&self, _id: u64) -> SourceResult<()> {
        pause(self.latency.delete_ms);
        Ok(())
    }

    fn delete_many(&self, _ids: &[u64]) -> SourceResult<()> {
        pause(self.latency.bulk_delete_ms);
        Ok(())
    }
}

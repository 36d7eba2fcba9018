// Library for testable modules
pub mod async_task;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod format;
pub mod notify;
pub mod source;
pub mod state;
pub mod view;

// Re-export main types used in tests
pub use async_task::{Completion, SourceOperation, SourceOutcome, TaskManager};
pub use config::TableConfig;
pub use data::{Role, SortColumn, SortDirection, Status, User};
pub use error::{ConfigError, ExportError, SourceError, TableError};
pub use source::{Latency, RecordSource, SampleSource};
pub use state::UserTable;
pub use view::{derive_view, PageMarker, TableQuery, TableView};

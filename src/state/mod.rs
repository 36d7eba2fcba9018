//! State for the user table.
//!
//! The store is an explicit object owned by whoever drives it (the terminal
//! front-end, or a test). Nothing here is global, so several independent tables
//! can coexist.
//!
//! # Architecture
//!
//! ```text
//! UserTable
//! ├── TableQuery   - search, filters, sort, page (see `view`)
//! ├── selection    - selected ids, independent of paging
//! ├── EditBuffer   - at most one inline edit
//! └── CreateForm   - add-user modal with field errors
//! ```

mod create;
mod edit;
mod table;

pub use create::{validate_email, CreateField, CreateForm, FieldErrors};
pub use edit::{EditBuffer, EditField};
pub use table::UserTable;

//! Task management core
//!
//! - Data model (tasks, priorities, archive records)
//! - Date-expression parsing for due dates
//! - JSON-file storage of the active list and the archive
//! - Terminal lifecycle transitions (complete / delete / expire)

pub mod dates;
pub mod lifecycle;
pub mod model;
pub mod storage;

pub use dates::ParseError;
pub use lifecycle::{Lifecycle, LifecycleError};
pub use model::{ArchiveReason, ArchivedTask, Priority, Task, ValidationError};
pub use storage::{ArchiveFilter, ArchiveSort, Store, StoreError};

//! Task store: the client-side cache of the logged-in user's task list.
//!
//! The list lives in a watch channel, ordered by descending creation time,
//! and is only mutated after the server confirms the corresponding write.
//! Derived views (counts, completed/pending slices, substring search) are
//! computed from the current snapshot without any I/O.

pub mod contract;
pub mod domain;

pub use contract::model::{NewTask, Task, TaskFilter, TaskPatch};
pub use domain::store::TaskStore;

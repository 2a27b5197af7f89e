//! Session store: the client-side authentication cache.
//!
//! Holds the current logged-in [`contract::model::User`] (or none) behind a
//! watch channel, persists it to local storage through the
//! [`domain::storage::SessionStorage`] port, and synchronizes login /
//! registration / logout with the remote API.

pub mod contract;
pub mod domain;
pub mod infra;

pub use contract::model::User;
pub use domain::storage::{SessionStorage, StorageError};
pub use domain::store::SessionStore;
pub use infra::storage::{FileSessionStorage, MemorySessionStorage};

use thiserror::Error;

use crate::contract::model::User;

/// Failures of the local session storage. These never reach the end user;
/// the store logs them and falls back to a defined state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("stored session is not valid JSON: {0}")]
    Corrupt(String),

    #[error("session storage I/O failed: {0}")]
    Io(String),
}

/// Port for the one locally persisted value: the serialized current user.
///
/// The session store is the only writer of this slot, so implementations
/// only need to serialize their own writes, not coordinate across
/// components.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted user. `Ok(None)` means "logged out".
    fn load(&self) -> Result<Option<User>, StorageError>;

    /// Persist the user, replacing any previous value.
    fn save(&self, user: &User) -> Result<(), StorageError>;

    /// Remove the persisted value. Removing an absent value is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

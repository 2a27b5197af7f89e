use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::contract::model::User;
use crate::domain::storage::{SessionStorage, StorageError};

/// In-memory session storage for tests.
///
/// Two failure switches exercise the store's swallow-and-log paths:
/// `set_corrupt` makes the next load fail like an unparseable file (cleared
/// by `clear`, mirroring "delete the corrupt entry"), `set_fail_writes`
/// makes saves and clears fail like a full disk.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<User>>,
    corrupt: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        let storage = Self::default();
        *storage.slot.lock() = Some(user);
        storage
    }

    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// What the "disk" currently holds.
    pub fn stored(&self) -> Option<User> {
        self.slot.lock().clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<User>, StorageError> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(StorageError::Corrupt("simulated corrupt entry".into()));
        }
        Ok(self.slot.lock().clone())
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("simulated write failure".into()));
        }
        *self.slot.lock() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("simulated clear failure".into()));
        }
        self.corrupt.store(false, Ordering::SeqCst);
        *self.slot.lock() = None;
        Ok(())
    }
}

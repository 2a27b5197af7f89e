use std::sync::Arc;

use api_client::{ApiClient, ApiError};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::User;
use crate::domain::storage::SessionStorage;

/// Client-side authentication cache.
///
/// The current session lives in a watch channel: readers take cheap
/// snapshots, subscribers are notified on every transition. Each transition
/// is persisted through the storage port before subscribers see it, so a
/// process restart immediately after `login`/`create_user`/`logout`
/// observes the same state.
pub struct SessionStore {
    api: Arc<ApiClient>,
    storage: Arc<dyn SessionStorage>,
    current: watch::Sender<Option<User>>,
}

impl SessionStore {
    /// Build the store, seeding the session from local storage.
    ///
    /// An unreadable persisted session must not block login: it is logged,
    /// deleted best-effort, and treated as "logged out".
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn SessionStorage>) -> Self {
        let initial = match storage.load() {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                if let Err(err) = storage.clear() {
                    warn!(error = %err, "failed to remove unreadable stored session");
                }
                None
            }
        };

        let (current, _) = watch::channel(initial);
        Self {
            api,
            storage,
            current,
        }
    }

    /// Look an email up without touching the session. A 404 from the server
    /// is the valid "not registered" outcome, not an error.
    #[instrument(name = "session.check_user_exists", skip(self))]
    pub async fn check_user_exists(&self, email: &str) -> Result<Option<User>, ApiError> {
        match self.api.lookup_user(email).await {
            Ok(record) => Ok(Some(record.into())),
            Err(err) if err.is_not_found() => {
                debug!("email is not registered");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Look the email up and, when it is registered, make that user the
    /// current session.
    #[instrument(name = "session.login", skip(self))]
    pub async fn login(&self, email: &str) -> Result<Option<User>, ApiError> {
        let found = self.check_user_exists(email).await?;
        if let Some(user) = &found {
            self.set_current(user.clone());
            info!(user_id = %user.id, "logged in");
        }
        Ok(found)
    }

    /// Register the email remotely and make the created user the current
    /// session.
    #[instrument(name = "session.create_user", skip(self))]
    pub async fn create_user(&self, email: &str) -> Result<User, ApiError> {
        let user: User = self.api.create_user(email).await?.into();
        self.set_current(user.clone());
        info!(user_id = %user.id, "registered and logged in");
        Ok(user)
    }

    /// Drop the session. A failing storage delete is logged and swallowed;
    /// the in-memory session is cleared either way, so the caller never
    /// fails to log out.
    #[instrument(name = "session.logout", skip(self))]
    pub fn logout(&self) {
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "failed to clear stored session during logout");
        }
        self.current.send_replace(None);
        info!("logged out");
    }

    // --- pure reads, never any I/O ---

    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|u| u.id.clone())
    }

    pub fn current_user_email(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|u| u.email.clone())
    }

    pub fn current_user_created_at(&self) -> Option<DateTime<Utc>> {
        self.current.borrow().as_ref().map(|u| u.created_at)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Watch the session; the receiver always starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    /// Persist first, then notify. A failed write keeps the in-memory
    /// transition (next launch just starts logged out).
    fn set_current(&self, user: User) {
        if let Err(err) = self.storage.save(&user) {
            warn!(error = %err, "failed to persist session; keeping in-memory session");
        }
        self.current.send_replace(Some(user));
    }
}

use api_client::dto::UserRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user. This is also the shape persisted to the session
/// file, with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

//! Wire records for the remote API.
//!
//! The server speaks camelCase JSON. Date-like fields arrive either as epoch
//! milliseconds or as RFC 3339 strings depending on which backend wrote them;
//! [`timestamp`] normalizes both into `DateTime<Utc>` at the deserialization
//! boundary so the rest of the client only ever sees one temporal type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(with = "timestamp::flexible", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A task as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: String,
    #[serde(with = "timestamp::flexible", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(
        with = "timestamp::flexible_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserBody {
    pub email: String,
}

/// Body of `POST /tasks`. New tasks always start pending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub completed: bool,
}

impl CreateTaskBody {
    pub fn new(title: String, description: String, user_id: String) -> Self {
        Self {
            title,
            description,
            user_id,
            completed: false,
        }
    }
}

/// Body of `PUT /tasks/{id}`: absent fields are not serialized, so the
/// server only sees what actually changed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Error envelope some endpoints return alongside a 4xx status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

pub mod timestamp {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    fn convert<E: de::Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        match raw {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
            Raw::Float(ms) => Utc
                .timestamp_millis_opt(ms as i64)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
            Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("invalid timestamp '{s}': {e}"))),
        }
    }

    /// Epoch millis or RFC 3339 in, epoch millis out.
    pub mod flexible {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
            convert(Raw::deserialize(d)?)
        }

        pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_i64(dt.timestamp_millis())
        }
    }

    /// [`flexible`] over an optional field.
    pub mod flexible_opt {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<Raw>::deserialize(d)?.map(convert).transpose()
        }

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_i64(dt.timestamp_millis()),
                None => s.serialize_none(),
            }
        }
    }
}

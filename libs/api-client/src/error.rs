use thiserror::Error;

/// Errors produced by the remote API transport.
///
/// The `Display` string of every variant is the human-readable message the
/// presentation layer shows directly; callers do not re-word transport
/// failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Could not reach the server. Check your internet connection.")]
    NetworkUnreachable,

    #[error("{}", message.as_deref().unwrap_or("Invalid request data"))]
    BadRequest { message: Option<String> },

    #[error("Not authorized. Please sign in again.")]
    Unauthorized,

    #[error("The requested resource was not found")]
    NotFound,

    #[error("Internal server error. Please try again later.")]
    ServerError { status: u16 },

    #[error("Unexpected error: {reason}")]
    Unknown { reason: String },
}

impl ApiError {
    pub fn bad_request(message: Option<String>) -> Self {
        Self::BadRequest { message }
    }

    pub fn server_error(status: u16) -> Self {
        Self::ServerError { status }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Map a failure that happened before any response arrived.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::NetworkUnreachable
        } else {
            Self::unknown(err.to_string())
        }
    }

    /// Map a non-success HTTP status, with the server-supplied message when
    /// the body carried one.
    pub(crate) fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 => Self::bad_request(message),
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            500..=599 => Self::server_error(status),
            other => Self::unknown(format!("Server returned status {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses_into_taxonomy() {
        assert_eq!(
            ApiError::from_status(400, Some("title is required".into())),
            ApiError::BadRequest {
                message: Some("title is required".into())
            }
        );
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(404, None), ApiError::NotFound);
        assert_eq!(
            ApiError::from_status(503, None),
            ApiError::ServerError { status: 503 }
        );
        assert!(matches!(
            ApiError::from_status(418, None),
            ApiError::Unknown { .. }
        ));
    }

    #[test]
    fn bad_request_prefers_server_message() {
        let with_msg = ApiError::bad_request(Some("email already taken".into()));
        assert_eq!(with_msg.to_string(), "email already taken");

        let without = ApiError::bad_request(None);
        assert_eq!(without.to_string(), "Invalid request data");
    }

    #[test]
    fn not_found_predicate() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(!ApiError::Unauthorized.is_not_found());
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Timeout,
    NetworkUnreachable,
    ClientError,
    ServerError,
    Unknown,
}

/// Failure of a single fetch. `Display` yields the fixed user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("Network error. Please check your connection.")]
    NetworkUnreachable,
    #[error("{}", status_message(.0))]
    ClientError(u16),
    #[error("{}", status_message(.0))]
    ServerError(u16),
    #[error("Failed to fetch data")]
    Unknown(String),
}

impl FetchError {
    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            FetchError::ServerError(status)
        } else {
            FetchError::ClientError(status)
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FetchError::Timeout => ErrorCode::Timeout,
            FetchError::NetworkUnreachable => ErrorCode::NetworkUnreachable,
            FetchError::ClientError(_) => ErrorCode::ClientError,
            FetchError::ServerError(_) => ErrorCode::ServerError,
            FetchError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::ClientError(status) | FetchError::ServerError(status) => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Underlying cause kept for logs; never shown to the user.
    pub fn detail(&self) -> Option<&str> {
        match self {
            FetchError::Unknown(detail) => Some(detail),
            _ => None,
        }
    }
}

fn status_message(status: &u16) -> String {
    match *status {
        400 => "Bad request. Please check your input.".to_string(),
        401 => "Unauthorized. Please login again.".to_string(),
        403 => "Forbidden. You do not have permission.".to_string(),
        404 => "Not found. The requested resource does not exist.".to_string(),
        500 => "Server error. Please try again later.".to_string(),
        other => format!("Request failed with status {other}"),
    }
}

/// Serializable form of a [`FetchError`] for snapshots handed to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&FetchError> for ApiError {
    fn from(value: &FetchError) -> Self {
        Self {
            code: value.code(),
            status: value.status(),
            message: value.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_fixed_messages() {
        let cases = [
            (400, "Bad request. Please check your input."),
            (401, "Unauthorized. Please login again."),
            (403, "Forbidden. You do not have permission."),
            (404, "Not found. The requested resource does not exist."),
            (500, "Server error. Please try again later."),
        ];
        for (status, expected) in cases {
            assert_eq!(FetchError::from_status(status).user_message(), expected);
        }
    }

    #[test]
    fn other_statuses_use_generic_message() {
        assert_eq!(
            FetchError::from_status(418).user_message(),
            "Request failed with status 418"
        );
        assert_eq!(
            FetchError::from_status(503).user_message(),
            "Request failed with status 503"
        );
    }

    #[test]
    fn classifies_status_ranges() {
        assert_eq!(FetchError::from_status(429), FetchError::ClientError(429));
        assert_eq!(FetchError::from_status(502), FetchError::ServerError(502));
        assert_eq!(FetchError::from_status(502).code(), ErrorCode::ServerError);
    }

    #[test]
    fn unknown_hides_detail_from_user_message() {
        let err = FetchError::Unknown("expected value at line 1".into());
        assert_eq!(err.user_message(), "Failed to fetch data");
        assert_eq!(err.detail(), Some("expected value at line 1"));
    }

    #[test]
    fn api_error_carries_code_status_and_message() {
        let api: ApiError = (&FetchError::Timeout).into();
        assert_eq!(api.code, ErrorCode::Timeout);
        assert_eq!(api.status, None);
        assert_eq!(api.message, "Request timeout. Please try again.");
    }
}

//! Mapping from library errors to HTTP responses.
//!
//! The client only ever sees a short generic message; the detail is logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use menumenu_core::MenuError;
use serde_json::json;

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    pub fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Image too large".to_string(),
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(err: MenuError) -> Self {
        let (status, message) = match &err {
            MenuError::InvalidInput(msg) => {
                tracing::debug!("Rejected request: {msg}");
                return Self::bad_request(msg);
            }
            MenuError::AnalysisFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process menu")
            }
            MenuError::SearchFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Image search failed")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        tracing::error!("{err}");
        Self {
            status,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MenuError::InvalidInput("No query provided".into()), 400),
            (MenuError::AnalysisFailed("HTTP 503".into()), 500),
            (MenuError::SearchFailed("unsplash search error: HTTP 401".into()), 500),
            (MenuError::Io(std::io::Error::other("disk")), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status.as_u16(), expected);
        }
    }

    #[test]
    fn test_upstream_detail_is_not_exposed() {
        let err = ApiError::from(MenuError::SearchFailed("key=secret123 rejected".into()));
        assert_eq!(err.message, "Image search failed");
    }

    #[test]
    fn test_invalid_input_keeps_message() {
        let err = ApiError::from(MenuError::InvalidInput("No image provided".into()));
        assert_eq!(err.message, "No image provided");
    }
}

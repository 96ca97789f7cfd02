//! API Error Types
//!
//! Hard failures are returned as `{ "error": <label>, "details": <message> }`
//! with a status per category. A negative verification is never an `ApiError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docseal::SignError;
use serde_json::json;
use thiserror::Error;

/// Failure talking to an external HTTP collaborator (Pinata, Gemini)
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport failure; the request URL is stripped before storing
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream response missing {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// HTTP handler error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Sign(#[from] SignError),

    #[error("{0}")]
    BadRequest(String),

    #[error("pinning failed: {0}")]
    Pinning(#[source] UpstreamError),

    #[error("assistant request failed: {0}")]
    Assistant(#[source] UpstreamError),

    #[error("assistant is not configured")]
    AssistantUnavailable,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Sign(e) => match e {
                SignError::Input(_) => StatusCode::BAD_REQUEST,
                SignError::ArtifactNotFound(_) => StatusCode::NOT_FOUND,
                SignError::ArtifactExists(_) => StatusCode::CONFLICT,
                SignError::KeyDecode(_)
                | SignError::UnsupportedKeyType(_)
                | SignError::VerificationInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Pinning(_) | Self::Assistant(_) => StatusCode::BAD_GATEWAY,
            Self::AssistantUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sign(e) => e.label(),
            Self::BadRequest(_) => "bad_request",
            Self::Pinning(_) => "pinning_failed",
            Self::Assistant(_) => "assistant_failed",
            Self::AssistantUnavailable => "assistant_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = json!({
            "error": self.label(),
            "details": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::BadRequest(format!("File upload failed: {}", err.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("worker task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_error_statuses() {
        let cases = [
            (SignError::input("empty"), StatusCode::BAD_REQUEST),
            (
                SignError::ArtifactNotFound("a".into()),
                StatusCode::NOT_FOUND,
            ),
            (SignError::ArtifactExists("a".into()), StatusCode::CONFLICT),
            (
                SignError::key_decode("bad"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SignError::verification_input("short"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SignError::key_generation("rng"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SignError::store("disk"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_upstream_statuses() {
        let err = ApiError::Pinning(UpstreamError::MissingField("IpfsHash"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.label(), "pinning_failed");
        assert_eq!(
            err.to_string(),
            "pinning failed: upstream response missing IpfsHash"
        );
        assert_eq!(
            ApiError::AssistantUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_label_passes_through() {
        let err = ApiError::from(SignError::ArtifactNotFound("a".into()));
        assert_eq!(err.label(), "artifact_not_found");
        assert_eq!(
            err.to_string(),
            "No signature artifact found for document: a"
        );
    }
}

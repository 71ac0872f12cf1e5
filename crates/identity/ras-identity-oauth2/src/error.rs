//! OAuth2 error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type OAuth2Result<T> = Result<T, OAuth2Error>;

#[derive(Debug, Error)]
pub enum OAuth2Error {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    /// The identity provider answered with an error payload or a failing status.
    ///
    /// `body` is the decoded response body, untouched.
    #[error("Identity provider error ({status}): {message}")]
    IdentityProvider {
        message: String,
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl OAuth2Error {
    /// Build an [`OAuth2Error::IdentityProvider`] whose message defaults to the
    /// status reason phrase.
    pub fn identity_provider(
        status: StatusCode,
        message: Option<String>,
        body: serde_json::Value,
    ) -> Self {
        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        });

        OAuth2Error::IdentityProvider {
            message,
            status,
            body,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            OAuth2Error::IdentityProvider { status, .. } => Some(*status),
            OAuth2Error::HttpError(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_provider_error_defaults_to_reason_phrase() {
        let err = OAuth2Error::identity_provider(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            json!({"errors": []}),
        );

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            err.to_string(),
            "Identity provider error (500 Internal Server Error): Internal Server Error"
        );
    }

    #[test]
    fn test_identity_provider_error_keeps_body() {
        let body = json!({"errors": [{"code": "E_API_NOT_AUTHORIZED"}]});
        let err = OAuth2Error::identity_provider(
            StatusCode::UNAUTHORIZED,
            Some("Not authorized".to_string()),
            body.clone(),
        );

        match err {
            OAuth2Error::IdentityProvider {
                message,
                body: kept,
                ..
            } => {
                assert_eq!(message, "Not authorized");
                assert_eq!(kept, body);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

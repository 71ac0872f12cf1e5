//! OAuth2 protocol types.

use serde::{Deserialize, Serialize};

/// Caller-supplied options for building an authorization URL.
///
/// Anything left unset falls back to the provider defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizationOptions {
    pub state: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub additional_params: Vec<(String, String)>,
}

impl AuthorizationOptions {
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_params.push((key.into(), value.into()));
        self
    }
}

/// A ready-to-redirect authorization URL and the state embedded in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUrl {
    pub url: String,
    pub state: String,
}

/// Query parameters delivered to the redirect URI after the user consents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Grant presented to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum Grant {
    AuthorizationCode { code: String },
    RefreshToken { refresh_token: String },
    ClientCredentials,
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::AuthorizationCode { .. } => "authorization_code",
            Grant::RefreshToken { .. } => "refresh_token",
            Grant::ClientCredentials => "client_credentials",
        }
    }

    /// Grant-specific form fields, excluding `grant_type` itself.
    pub fn params(&self) -> Vec<(String, String)> {
        match self {
            Grant::AuthorizationCode { code } => vec![("code".to_string(), code.clone())],
            Grant::RefreshToken { refresh_token } => {
                vec![("refresh_token".to_string(), refresh_token.clone())]
            }
            Grant::ClientCredentials => Vec::new(),
        }
    }
}

//! Elance endpoints and response handling.

use crate::lookup::is_empty_like;
use crate::resource_owner::ElanceResourceOwner;
use ras_identity_oauth2::{
    AccessToken, OAuth2Error, OAuth2ProviderAdapter, OAuth2Result, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

pub const ELANCE_DOMAIN: &str = "https://api.elance.com";

const AUTHORIZE_PATH: &str = "/api2/oauth/authorize";
const TOKEN_PATH: &str = "/api2/oauth/token";
const PROFILE_PATH: &str = "/api2/profiles/my";

pub const DEFAULT_SCOPES: &[&str] = &["basicInfo"];
pub const SCOPE_SEPARATOR: &str = ",";

/// One entry of the `errors` array Elance returns on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElanceApiError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ElanceProvider {
    domain: String,
}

impl ElanceProvider {
    pub fn new() -> Self {
        Self::with_domain(ELANCE_DOMAIN)
    }

    /// Point the provider at a different API host, e.g. a sandbox or a mock server.
    pub fn with_domain(domain: impl Into<String>) -> Self {
        let domain = domain.into().trim_end_matches('/').to_string();
        Self { domain }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Decode the `errors` array of a response body. Entries that are not
    /// objects are skipped.
    pub fn api_errors(body: &Value) -> Vec<ElanceApiError> {
        body.get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for ElanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuth2ProviderAdapter for ElanceProvider {
    type Owner = ElanceResourceOwner;

    fn provider_id(&self) -> &str {
        "elance"
    }

    fn base_authorization_url(&self) -> String {
        format!("{}{}", self.domain, AUTHORIZE_PATH)
    }

    fn base_access_token_url(&self, _params: &[(String, String)]) -> String {
        format!("{}{}", self.domain, TOKEN_PATH)
    }

    fn resource_owner_details_url(&self, token: &AccessToken) -> String {
        let encoded: String =
            form_urlencoded::byte_serialize(token.access_token.as_bytes()).collect();
        format!("{}{}?access_token={}", self.domain, PROFILE_PATH, encoded)
    }

    fn default_scopes(&self) -> Vec<String> {
        DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
    }

    fn scope_separator(&self) -> &str {
        SCOPE_SEPARATOR
    }

    fn check_response(&self, status: StatusCode, body: &Value) -> OAuth2Result<()> {
        let has_errors = body.get("errors").is_some_and(|errors| !is_empty_like(errors));
        let failed = status.is_client_error() || status.is_server_error();

        if !has_errors && !failed {
            return Ok(());
        }

        let message = Self::api_errors(body)
            .into_iter()
            .map(|e| e.description)
            .find(|description| !description.is_empty());

        Err(OAuth2Error::identity_provider(status, message, body.clone()))
    }

    /// Elance wraps token fields in a `data` envelope.
    fn prepare_access_token_response(&self, body: Value) -> Value {
        match body {
            Value::Object(mut fields) => match fields.remove("data") {
                Some(data @ Value::Object(_)) => data,
                Some(other) => {
                    fields.insert("data".to_string(), other);
                    Value::Object(fields)
                }
                None => Value::Object(fields),
            },
            other => other,
        }
    }

    fn create_resource_owner(&self, body: Value, _token: &AccessToken) -> ElanceResourceOwner {
        ElanceResourceOwner::new(body)
    }
}

//! Extension contract implemented by concrete identity providers.

use crate::error::OAuth2Result;
use crate::token::AccessToken;
use ras_identity_core::ResourceOwner;
use reqwest::StatusCode;
use serde_json::Value;

/// Everything the [`OAuth2Client`](crate::OAuth2Client) needs to know about a
/// particular identity provider to drive the Authorization Code grant.
///
/// Implementations are plain configuration plus response mapping; all I/O
/// happens in the client.
pub trait OAuth2ProviderAdapter: Send + Sync {
    type Owner: ResourceOwner;

    /// Short identifier, e.g. `"elance"`.
    fn provider_id(&self) -> &str;

    fn base_authorization_url(&self) -> String;

    /// Token endpoint. `params` is the form about to be posted.
    fn base_access_token_url(&self, params: &[(String, String)]) -> String;

    fn resource_owner_details_url(&self, token: &AccessToken) -> String;

    /// Scopes requested when the caller supplies none.
    fn default_scopes(&self) -> Vec<String>;

    fn scope_separator(&self) -> &str {
        " "
    }

    /// Extra query parameters added to every authorization URL.
    fn authorization_parameters(&self) -> Vec<(String, String)> {
        vec![("approval_prompt".to_string(), "auto".to_string())]
    }

    /// Headers sent with the resource owner details request.
    fn authorization_headers(&self, token: &AccessToken) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", token.access_token),
        )]
    }

    /// Token response field carrying the resource owner id, if any.
    fn access_token_resource_owner_id(&self) -> Option<&str> {
        None
    }

    /// Inspect a decoded response body and fail if it describes an error.
    fn check_response(&self, status: StatusCode, body: &Value) -> OAuth2Result<()>;

    /// Reshape the decoded token response before it is parsed.
    fn prepare_access_token_response(&self, body: Value) -> Value {
        body
    }

    fn create_resource_owner(&self, body: Value, token: &AccessToken) -> Self::Owner;
}

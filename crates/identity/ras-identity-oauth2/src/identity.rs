//! `IdentityProvider` implementation on top of an [`OAuth2Client`].

use crate::client::OAuth2Client;
use crate::provider::OAuth2ProviderAdapter;
use crate::transport::HttpTransport;
use crate::types::Grant;
use async_trait::async_trait;
use ras_identity_core::{
    IdentityError, IdentityProvider, IdentityResult, ResourceOwner, VerifiedIdentity,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Payload accepted by [`OAuth2IdentityProvider::verify`]: the authorization
/// code delivered to the redirect URI.
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuth2AuthPayload {
    pub code: String,
}

pub struct OAuth2IdentityProvider<P, T> {
    client: OAuth2Client<P, T>,
    provider_id: String,
}

impl<P: OAuth2ProviderAdapter, T: HttpTransport> OAuth2IdentityProvider<P, T> {
    pub fn new(client: OAuth2Client<P, T>) -> Self {
        let provider_id = format!("oauth2:{}", client.provider().provider_id());
        Self {
            client,
            provider_id,
        }
    }

    pub fn client(&self) -> &OAuth2Client<P, T> {
        &self.client
    }
}

#[async_trait]
impl<P, T> IdentityProvider for OAuth2IdentityProvider<P, T>
where
    P: OAuth2ProviderAdapter,
    T: HttpTransport,
{
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn verify(&self, auth_payload: serde_json::Value) -> IdentityResult<VerifiedIdentity> {
        let payload: OAuth2AuthPayload =
            serde_json::from_value(auth_payload).map_err(|_| IdentityError::InvalidPayload)?;

        let token = self
            .client
            .get_access_token(Grant::AuthorizationCode { code: payload.code })
            .await
            .map_err(|e| IdentityError::ProviderError(e.to_string()))?;

        let owner = self
            .client
            .get_resource_owner(&token)
            .await
            .map_err(|e| IdentityError::ProviderError(e.to_string()))?;

        let identity = owner.to_verified_identity(&self.provider_id)?;

        info!("Successfully verified identity for provider: {}", self.provider_id);
        Ok(identity)
    }
}

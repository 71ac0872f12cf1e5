//! Core identity provider traits and types.
//!
//! Provider plugins expose the authenticated user through [`ResourceOwner`];
//! services consume identities through [`IdentityProvider`] and
//! [`VerifiedIdentity`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid authentication payload")]
    InvalidPayload,
}

pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub provider_id: String,
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn verify(&self, auth_payload: serde_json::Value) -> IdentityResult<VerifiedIdentity>;
}

/// The authenticated end-user as seen by an upstream identity provider.
///
/// Implementations are read-only projections over the provider's raw profile
/// response. Every accessor returns `None` rather than failing when the
/// provider omitted the field.
pub trait ResourceOwner: Send + Sync {
    fn id(&self) -> Option<String>;

    fn username(&self) -> Option<String>;

    fn avatar_url(&self) -> Option<String>;

    /// The raw profile response, as returned by the provider.
    fn to_value(&self) -> serde_json::Value;

    /// Map the owner into a [`VerifiedIdentity`] for session issuance.
    fn to_verified_identity(&self, provider_id: &str) -> IdentityResult<VerifiedIdentity> {
        let subject = self.id().ok_or_else(|| {
            IdentityError::ProviderError(format!(
                "Provider '{}' returned a profile without a user id",
                provider_id
            ))
        })?;

        let mut metadata = serde_json::Map::new();
        if let Some(avatar) = self.avatar_url() {
            metadata.insert("avatar_url".to_string(), serde_json::Value::String(avatar));
        }
        metadata.insert("profile".to_string(), self.to_value());

        Ok(VerifiedIdentity {
            provider_id: provider_id.to_string(),
            subject,
            email: None,
            display_name: self.username(),
            metadata: Some(serde_json::Value::Object(metadata)),
        })
    }
}

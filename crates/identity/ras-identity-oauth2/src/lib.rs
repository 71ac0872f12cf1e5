//! Generic OAuth2 Authorization Code client.
//!
//! Concrete identity providers plug in through [`OAuth2ProviderAdapter`]:
//! they declare endpoints, default scopes and how to read the provider's
//! responses, while [`OAuth2Client`] performs the HTTP exchanges through a
//! swappable [`HttpTransport`]. [`OAuth2IdentityProvider`] exposes the result
//! through the ras-identity-core traits.

mod client;
mod config;
mod error;
mod identity;
mod provider;
mod token;
mod transport;
mod types;


pub use client::OAuth2Client;
pub use config::OAuth2ClientConfig;
pub use error::{OAuth2Error, OAuth2Result};
pub use identity::{OAuth2AuthPayload, OAuth2IdentityProvider};
pub use provider::OAuth2ProviderAdapter;
pub use token::AccessToken;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{AuthorizationOptions, AuthorizationResponse, AuthorizationUrl, Grant};

// Re-export common types for convenience
pub use ras_identity_core::{IdentityProvider, ResourceOwner, VerifiedIdentity};
pub use reqwest::StatusCode;

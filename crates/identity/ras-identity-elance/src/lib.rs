//! Elance identity provider for ras-identity-oauth2.
//!
//! [`ElanceProvider`] points the generic OAuth2 client at the Elance API
//! (`/api2/oauth/authorize`, `/api2/oauth/token`, `/api2/profiles/my`),
//! requests the `basicInfo` scope by default, joins scopes with `,`, and
//! unwraps the `data` envelope around token responses. The authenticated user
//! comes back as an [`ElanceResourceOwner`].
//!
//! ```no_run
//! use ras_identity_elance::{ElanceProvider, ResourceOwner};
//! use ras_identity_oauth2::{AuthorizationOptions, Grant, OAuth2Client, OAuth2ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuth2ClientConfig::new("client-id", "client-secret", "https://app.test/callback");
//! let client = OAuth2Client::new(config, ElanceProvider::new())?;
//!
//! let auth = client.authorization_url(AuthorizationOptions::default())?;
//! // redirect the user to auth.url, keep auth.state, then on callback:
//! let token = client
//!     .get_access_token(Grant::AuthorizationCode { code: "code-from-callback".into() })
//!     .await?;
//! let owner = client.get_resource_owner(&token).await?;
//! println!("{:?} {:?}", owner.id(), owner.username());
//! # Ok(())
//! # }
//! ```

mod lookup;
mod provider;
mod resource_owner;

#[cfg(test)]
mod tests;

pub use lookup::{is_empty_like, lookup_path, scalar_to_string, string_at};
pub use provider::{DEFAULT_SCOPES, ELANCE_DOMAIN, ElanceApiError, ElanceProvider, SCOPE_SEPARATOR};
pub use resource_owner::ElanceResourceOwner;

pub use ras_identity_core::ResourceOwner;

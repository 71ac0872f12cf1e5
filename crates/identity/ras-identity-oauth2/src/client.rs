//! OAuth2 Authorization Code client.

use crate::config::OAuth2ClientConfig;
use crate::error::{OAuth2Error, OAuth2Result};
use crate::provider::OAuth2ProviderAdapter;
use crate::token::AccessToken;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::{AuthorizationOptions, AuthorizationUrl, Grant};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Drives the Authorization Code grant against a single provider.
pub struct OAuth2Client<P, T = ReqwestTransport> {
    config: OAuth2ClientConfig,
    provider: P,
    transport: T,
}

impl<P: OAuth2ProviderAdapter> OAuth2Client<P, ReqwestTransport> {
    pub fn new(config: OAuth2ClientConfig, provider: P) -> OAuth2Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.http_timeout_seconds)?;
        Ok(Self::with_transport(config, provider, transport))
    }
}

impl<P: OAuth2ProviderAdapter, T: HttpTransport> OAuth2Client<P, T> {
    /// Build a client over an existing transport. The config is taken as is;
    /// call [`OAuth2ClientConfig::validate`] first when it comes from outside.
    pub fn with_transport(config: OAuth2ClientConfig, provider: P, transport: T) -> Self {
        Self {
            config,
            provider,
            transport,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &OAuth2ClientConfig {
        &self.config
    }

    /// Build the URL the user is redirected to for consent.
    ///
    /// Caller scopes replace the provider defaults; an empty list counts as none.
    pub fn authorization_url(
        &self,
        options: AuthorizationOptions,
    ) -> OAuth2Result<AuthorizationUrl> {
        let mut url = Url::parse(&self.provider.base_authorization_url())?;

        let state = options
            .state
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let scopes = match options.scopes {
            Some(scopes) if !scopes.is_empty() => scopes,
            _ => self.provider.default_scopes(),
        };

        let redirect_uri = options
            .redirect_uri
            .unwrap_or_else(|| self.config.redirect_uri.clone());

        let mut params = url.query_pairs_mut();
        params.append_pair("state", &state);
        params.append_pair("scope", &scopes.join(self.provider.scope_separator()));
        params.append_pair("response_type", "code");
        params.append_pair("redirect_uri", &redirect_uri);
        params.append_pair("client_id", &self.config.client_id);

        for (key, value) in &self.provider.authorization_parameters() {
            params.append_pair(key, value);
        }

        for (key, value) in &options.additional_params {
            params.append_pair(key, value);
        }

        drop(params);

        debug!(
            "Generated authorization URL for provider {}",
            self.provider.provider_id()
        );

        Ok(AuthorizationUrl {
            url: url.to_string(),
            state,
        })
    }

    /// Exchange a grant for an access token.
    pub async fn get_access_token(&self, grant: Grant) -> OAuth2Result<AccessToken> {
        let mut form = vec![
            ("client_id".to_string(), self.config.client_id.clone()),
            ("client_secret".to_string(), self.config.client_secret.clone()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("grant_type".to_string(), grant.grant_type().to_string()),
        ];
        form.extend(grant.params());

        let url = Url::parse(&self.provider.base_access_token_url(&form))?;
        let body = self.fetch(HttpRequest::post_form(url, form)).await?;

        let prepared = self.provider.prepare_access_token_response(body);
        let token =
            AccessToken::from_response(prepared, self.provider.access_token_resource_owner_id())?;

        info!(
            "Obtained access token from provider {} using {} grant",
            self.provider.provider_id(),
            grant.grant_type()
        );
        Ok(token)
    }

    /// Fetch and map the profile of the user the token was issued to.
    pub async fn get_resource_owner(&self, token: &AccessToken) -> OAuth2Result<P::Owner> {
        let url = Url::parse(&self.provider.resource_owner_details_url(token))?;

        let mut request = HttpRequest::get(url);
        for (name, value) in self.provider.authorization_headers(token) {
            request = request.with_header(name, value);
        }

        let body = self.fetch(request).await?;

        debug!(
            "Fetched resource owner details from provider {}",
            self.provider.provider_id()
        );
        Ok(self.provider.create_resource_owner(body, token))
    }

    async fn fetch(&self, request: HttpRequest) -> OAuth2Result<Value> {
        let HttpResponse { status, body } = self.transport.send(request).await?;

        let failed = status.is_client_error() || status.is_server_error();
        let decoded = match serde_json::from_str::<Value>(&body) {
            Ok(value) => value,
            Err(_) if failed => Value::String(body),
            Err(e) => {
                return Err(OAuth2Error::InvalidResponse(format!(
                    "response body is not valid JSON: {}",
                    e
                )));
            }
        };

        if let Err(e) = self.provider.check_response(status, &decoded) {
            warn!(
                "Provider {} rejected the request: {}",
                self.provider.provider_id(),
                e
            );
            return Err(e);
        }

        if !decoded.is_object() {
            return Err(OAuth2Error::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }

        Ok(decoded)
    }
}

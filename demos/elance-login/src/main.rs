mod pending;

use crate::pending::PendingStates;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
};
use ras_identity_core::{IdentityProvider, VerifiedIdentity};
use ras_identity_elance::ElanceProvider;
use ras_identity_oauth2::{
    AuthorizationOptions, AuthorizationResponse, OAuth2Client, OAuth2ClientConfig,
    OAuth2IdentityProvider, ReqwestTransport,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

type ElanceIdentityProvider = OAuth2IdentityProvider<ElanceProvider, ReqwestTransport>;

/// Configuration for the Elance login demo
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub elance_client_id: String,
    pub elance_client_secret: String,
    pub redirect_uri: String,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            elance_client_id: std::env::var("ELANCE_CLIENT_ID")
                .context("ELANCE_CLIENT_ID environment variable is required")?,
            elance_client_secret: std::env::var("ELANCE_CLIENT_SECRET")
                .context("ELANCE_CLIENT_SECRET environment variable is required")?,
            redirect_uri: std::env::var("ELANCE_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string()),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub identity_provider: Arc<ElanceIdentityProvider>,
    pub pending_states: Arc<RwLock<PendingStates>>,
}

fn create_identity_provider(config: &AppConfig) -> Result<ElanceIdentityProvider> {
    let client_config = OAuth2ClientConfig::new(
        config.elance_client_id.clone(),
        config.elance_client_secret.clone(),
        config.redirect_uri.clone(),
    )
    .with_http_timeout(30);

    let client = OAuth2Client::new(client_config, ElanceProvider::new())
        .context("Failed to create OAuth2 client")?;

    Ok(OAuth2IdentityProvider::new(client))
}

async fn index_handler() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html><html><body><a href="/auth/elance">Sign in with Elance</a></body></html>"#)
}

/// Redirect the browser to Elance's consent page
async fn start_handler(State(state): State<AppState>) -> Result<Redirect, (StatusCode, String)> {
    let auth = state
        .identity_provider
        .client()
        .authorization_url(AuthorizationOptions::default())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let pending = {
        let mut pending_states = state.pending_states.write().await;
        pending_states.insert(auth.state);
        pending_states.count()
    };

    info!("Starting Elance OAuth2 flow ({} pending)", pending);
    Ok(Redirect::to(&auth.url))
}

/// Handle the redirect back from Elance
async fn callback_handler(
    State(state): State<AppState>,
    Query(callback): Query<AuthorizationResponse>,
) -> Result<Json<VerifiedIdentity>, (StatusCode, String)> {
    if let Some(error) = &callback.error {
        let error_desc = callback
            .error_description
            .as_deref()
            .unwrap_or("No description");
        error!("OAuth2 callback error: {}: {}", error, error_desc);
        return Err((StatusCode::BAD_REQUEST, format!("{}: {}", error, error_desc)));
    }

    let state_param = callback
        .state
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing state parameter".to_string()))?;

    if !state.pending_states.write().await.take(&state_param) {
        warn!("Rejected callback with unknown or expired state");
        return Err((StatusCode::BAD_REQUEST, "Invalid state parameter".to_string()));
    }

    let code = callback
        .code
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing authorization code".to_string()))?;

    let identity = state
        .identity_provider
        .verify(serde_json::json!({ "code": code }))
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    info!("Elance login succeeded for subject {}", identity.subject);
    Ok(Json(identity))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    info!("Starting Elance login demo server");

    let app_state = AppState {
        identity_provider: Arc::new(create_identity_provider(&config)?),
        pending_states: Arc::new(RwLock::new(PendingStates::default())),
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/auth/elance", get(start_handler))
        .route("/auth/callback", get(callback_handler))
        .with_state(app_state);

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);
    info!("OAuth2 redirect URI: {}", config.redirect_uri);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

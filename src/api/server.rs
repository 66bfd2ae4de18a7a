//! HTTP API server

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{CookieOptions, SessionService, TokenCodec};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::oauth::GoogleClient;
use crate::store::{PgStore, SharedStore};
use std::sync::Arc;

use super::routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub store: SharedStore,
    pub google: Option<GoogleClient>,
    pub frontend_url: String,
}

impl AppState {
    /// Assemble state from configuration and a store handle
    pub fn new(config: &Config, store: SharedStore) -> Result<Self> {
        if config.auth.jwt_secret.is_empty() {
            return Err(Error::Config(
                "auth.jwt_secret must be set (see JWT_SECRET_KEY)".to_string(),
            ));
        }

        let codec = TokenCodec::new(&config.auth.jwt_secret, config.auth.session_ttl_days);
        let cookies = CookieOptions::new(
            config.auth.cookie_name.clone(),
            config.server.environment.is_production(),
            config.auth.session_ttl_days,
        );
        let sessions = SessionService::new(Arc::clone(&store), codec, cookies);
        let google = config
            .google
            .as_ref()
            .map(|g| GoogleClient::new(g, &config.urls.backend));

        Ok(Self {
            sessions,
            store,
            google,
            frontend_url: config.urls.frontend.trim_end_matches('/').to_string(),
        })
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let store: SharedStore = Arc::new(PgStore::connect(&config.database).await?);
    let state = AppState::new(&config, store)?;

    let app = create_router(&config, state)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(config: &Config, state: AppState) -> Result<Router> {
    let origin = config
        .urls
        .frontend
        .parse::<HeaderValue>()
        .map_err(|e| Error::Config(format!("Invalid frontend URL: {}", e)))?;

    // Credentialed CORS: the frontend origin only, cookies allowed
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Ok(Router::new()
        // Session flows
        .route("/login", post(routes::login))
        .route("/signup", post(routes::signup))
        .route("/logout", post(routes::logout))
        .route("/auth/check", get(routes::auth_check))
        // Google OAuth flow
        .route("/auth/google", get(routes::google_auth))
        .route("/auth/google/callback", get(routes::google_callback))
        // Guarded lab progress
        .route("/progress", post(routes::save_progress))
        .route("/progress/{lab_id}", get(routes::get_progress))
        // Liveness
        .route("/api/health", get(routes::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

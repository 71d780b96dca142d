pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

use anyhow::Context;
use axum::{extract::State, http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use services::CinemaBackendClient;
use session::DraftStore;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub backend: CinemaBackendClient,
    pub drafts: DraftStore,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let backend = CinemaBackendClient::from_config(&config.backend, &config.circuit_breaker)
            .context("Failed to create cinema backend client")?;

        Ok(Arc::new(Self {
            backend,
            drafts: DraftStore::with_submit_timeout(config.backend.timeout()),
            config,
        }))
    }
}

/// Полный роутер приложения: служебные маршруты и API под `/api`.
pub fn app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.app.cors_allow_origin)?;

    Ok(Router::new()
        .route("/", get(|| async { "Cinema Admin API v1.0" }))
        .route("/health", get(health))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "backend_circuit": format!("{:?}", state.backend.circuit_breaker().get_state()),
        "open_drafts": state.drafts.len().await,
    }))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(origin)
            .with_context(|| format!("CORS_ALLOW_ORIGIN is not a valid origin: '{origin}'"))?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

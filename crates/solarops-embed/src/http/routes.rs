use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::error::ApiError;
use crate::panel::PanelType;
use crate::service::{EmbedLink, EmbedService, EmbedSession};
use crate::store::JobStore;

/// Shared state for embed route handlers.
pub struct AppState<S> {
    service: Arc<EmbedService<S>>,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: JobStore> AppState<S> {
    pub fn new(service: EmbedService<S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the embed router.
///
/// - `POST /api/embed/link` issues a link for `{ jobId, panelType }`
/// - `GET /api/embed/session?token=` resolves the iframe's token
/// - `GET /health`
pub fn build_router<S: JobStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/embed/link", post(create_link::<S>))
        .route("/api/embed/session", get(resolve_session::<S>))
        .route("/health", get(health))
        .with_state(state)
}

/// CORS policy for the cross-origin iframe. An empty list allows any origin.
pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkRequest {
    job_id: String,
    panel_type: PanelType,
}

async fn create_link<S: JobStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<EmbedLink>, ApiError> {
    let link = state
        .service
        .generate_embed_link(&req.job_id, req.panel_type)
        .await?;
    Ok(Json(link))
}

#[derive(Debug, Deserialize)]
struct SessionParams {
    token: Option<String>,
}

async fn resolve_session<S: JobStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<SessionParams>,
) -> Result<Json<EmbedSession>, ApiError> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingToken)?;
    let session = state.service.resolve_embed_session(&token).await?;
    Ok(Json(session))
}

async fn health() -> &'static str {
    "ok"
}

//! HTTP routes exposing the rendered presence view

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::presence::{PageView, Phase, SharedPage};

#[derive(Clone)]
pub struct AppState {
    pub page: SharedPage,
    pub phase: Option<watch::Receiver<Phase>>,
    pub app_name: String,
}

impl AppState {
    pub fn new(page: SharedPage, app_name: impl Into<String>) -> Self {
        Self { page, phase: None, app_name: app_name.into() }
    }

    pub fn with_phase(mut self, phase: watch::Receiver<Phase>) -> Self {
        self.phase = Some(phase);
        self
    }
}

#[derive(Serialize)]
pub struct PhaseResponse { #[serde(flatten)] phase: Phase }

pub fn create_router(page: SharedPage) -> Router { create_router_with_state(AppState::new(page, "pagepresence")) }

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/presence", get(presence))
        .route("/phase", get(phase))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) async fn health(State(s): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": s.app_name}))
}

pub(crate) async fn presence(State(s): State<AppState>) -> Json<PageView> {
    Json(s.page.snapshot())
}

pub(crate) async fn phase(State(s): State<AppState>) -> Result<Json<PhaseResponse>, (StatusCode, String)> {
    match &s.phase {
        Some(rx) => Ok(Json(PhaseResponse { phase: *rx.borrow() })),
        None => Err((StatusCode::NOT_FOUND, "presence client not running".into())),
    }
}

//! HTTP boundary: the form-facing lookup endpoint.
//!
//! `POST /weather` and `POST /api/weather` accept `{ "placeName": "..." }` and
//! answer with a snapshot or `{ "error": "..." }`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use weather_proxy_core::{ErrorKind, LookupError, LookupService, WeatherSnapshot};

pub type AppState = Arc<LookupService>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub place_name: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error rendered at the boundary. Only stable messages leave the process.
#[derive(Debug)]
pub enum ApiError {
    Lookup(LookupError),
    BadRequest,
    MethodNotAllowed,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Lookup(err) => status_for(err.kind()),
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::Lookup(err) => err.kind().public_message(),
            ApiError::BadRequest => "Request body must be JSON with a `placeName` string",
            ApiError::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Lookup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message().to_string() };
        (self.status(), Json(body)).into_response()
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidQuery => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::UpstreamUnavailable
        | ErrorKind::UpstreamError
        | ErrorKind::RequestSetupError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the router. Both lookup paths share one handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/weather", lookup_route())
        .route("/api/weather", lookup_route())
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn lookup_route() -> MethodRouter<AppState> {
    post(lookup).fallback(method_not_allowed)
}

async fn lookup(
    State(service): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected lookup request body");
        ApiError::BadRequest
    })?;

    let snapshot = service.resolve(&request.place_name).await?;
    Ok(Json(snapshot))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(service: LookupService, addr: &str) -> Result<()> {
    let app = build_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %listener.local_addr().context("Failed to read bound address")?, "weather proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("weather proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C; shutting down");
    }
}

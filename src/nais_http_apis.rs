use crate::app_state::AppState;
use crate::errors::{AppDomain, AppError};
use axum::extract::State;
use axum::{http::StatusCode, routing::get, Router};
use log::info;
use prometheus::{Encoder, TextEncoder};
use tokio::task::JoinHandle;

/// Binds the port up front so a taken port fails startup immediately, then
/// serves on a spawned task.
pub async fn register_nais_http_apis(
    app_state: AppState,
    port: u16,
) -> Result<JoinHandle<Result<(), AppError>>, AppError> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| {
            AppError::new(AppDomain::HttpServer, format!("Could not bind port {}: {}", port, e))
        })?;
    info!("HTTP server listening on port {}", port);
    let routes = routes(app_state);
    Ok(tokio::spawn(async move {
        axum::serve(listener, routes)
            .await
            .map_err(|e| AppError::new(AppDomain::HttpServer, e.to_string()))
    }))
}

fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/internal/isAlive", get(is_alive))
        .route("/internal/isReady", get(is_ready))
        .route("/internal/hasStarted", get(has_started))
        .route("/internal/metrics", get(prometheus))
        .with_state(app_state)
}

fn health(ok: bool) -> (StatusCode, &'static str) {
    if ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
    }
}

async fn is_alive(State(app_state): State<AppState>) -> (StatusCode, &'static str) {
    health(app_state.is_alive())
}

async fn is_ready(State(app_state): State<AppState>) -> (StatusCode, &'static str) {
    health(app_state.is_ready() && app_state.has_started())
}

async fn has_started(State(app_state): State<AppState>) -> (StatusCode, &'static str) {
    health(app_state.has_started())
}

async fn prometheus() -> (StatusCode, [(&'static str, &'static str); 1], String) {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let body = encoder
        .encode(&metrics, &mut buffer)
        .map_err(|e| e.to_string())
        .and_then(|_| String::from_utf8(buffer).map_err(|e| e.to_string()));
    match body {
        Ok(body) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("Content-Type", "text/plain")],
            e,
        ),
    }
}

//! Frame Analysis HTTP Server

use std::net::SocketAddr;

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use frame_analysis::request::AnalyzeRequest;
use frame_analysis::service;

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    version: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
struct ValidationErrorResponse {
    ok: bool,
    error: String,
}

async fn analyze(Json(request): Json<AnalyzeRequest>) -> impl IntoResponse {
    let request = request.with_defaults();
    if let Err(e) = request.validate() {
        log::warn!("rejecting invalid model: {e}");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse {
                ok: false,
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let response = service::run_analysis(request);
    if !response.ok {
        log::warn!("analysis failed: {}", response.note);
    }
    Json(response).into_response()
}

fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8086".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    println!("Frame Analysis Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Analysis:     POST /api/analyze");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;
    Ok(())
}

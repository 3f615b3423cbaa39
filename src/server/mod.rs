//! HTTP frontend.
//!
//! Routes:
//! - `GET /`              static page embedding both charts
//! - `GET /img-confirmed` confirmed-cases chart (SVG)
//! - `GET /img-deaths`    deaths chart (SVG)
//! - `GET /health`        liveness probe
//!
//! Chart generation is synchronous (blocking fetch + parse + render), so each
//! request runs it on the blocking pool. Requests share nothing mutable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tracing::{error, info, warn};

use crate::app::pipeline;
use crate::data::SeriesSource;
use crate::domain::{Category, Chart, ChartConfig};
use crate::error::AppError;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
	<head>
		<title>COVID-19</title>
	</head>
	<body>
		<div id="content">
			<img id="plot-confirmed" src="/img-confirmed"/>
			<img id="plot-deaths" src="/img-deaths"/>
		</div>
	</body>
</html>
"#;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SeriesSource>,
    pub config: Arc<ChartConfig>,
    /// When set, every generated chart is also written here.
    pub save_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(source: Arc<dyn SeriesSource>, config: ChartConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
            save_dir: None,
        }
    }

    pub fn with_save_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.save_dir = dir;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/img-confirmed", get(confirmed_chart))
        .route("/img-deaths", get(deaths_chart))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("could not bind {addr}: {e}")))?;
    info!("ready to serve on http://{addr}");

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn confirmed_chart(State(state): State<AppState>) -> Response {
    chart_response(state, Category::Confirmed).await
}

async fn deaths_chart(State(state): State<AppState>) -> Response {
    chart_response(state, Category::Deaths).await
}

async fn chart_response(state: AppState, category: Category) -> Response {
    let save_dir = state.save_dir.clone();
    let result = tokio::task::spawn_blocking(move || {
        let threshold = state.config.threshold(category);
        pipeline::generate_chart(state.source.as_ref(), &state.config, category, threshold)
    })
    .await;

    let chart = match result {
        Ok(Ok(chart)) => chart,
        Ok(Err(err)) => {
            error!(%category, stage = err.stage(), "error: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
        Err(join) => {
            error!(%category, "chart task failed: {join}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "chart generation failed").into_response();
        }
    };

    if let Some(dir) = save_dir {
        save_chart(&dir, &chart).await;
    }

    ([(header::CONTENT_TYPE, Chart::CONTENT_TYPE)], chart.svg).into_response()
}

async fn save_chart(dir: &std::path::Path, chart: &Chart) {
    let path = dir.join(chart.file_name());
    match tokio::fs::write(&path, chart.svg.as_bytes()).await {
        Ok(()) => info!(path = %path.display(), "chart saved"),
        Err(e) => warn!(path = %path.display(), "could not save chart: {e}"),
    }
}

//! HTTP server
//!
//! Mounts every registered deployment at `POST {prefix}/{route}` plus a
//! model listing, a health check and Prometheus metrics.

use crate::runtime::ServeRuntime;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use toystand_common::error::ToyStandError;
use toystand_common::METRICS;
use toystand_proto::{HealthResponse, ModelCard, ModelList, Reply};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ServeRuntime>,
}

/// Gateway-level failure rendered as `{"error": ...}`
pub struct ApiError(pub ToyStandError);

impl From<ToyStandError> for ApiError {
    fn from(err: ToyStandError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_client_error() {
            warn!("Request rejected with {}: {}", status, self.0);
        } else {
            error!("Request failed with {}: {}", status, self.0);
        }
        (status, Json(Reply::error(self.0.to_string()))).into_response()
    }
}

/// Build the gateway router
pub fn build_router(runtime: Arc<ServeRuntime>, enable_metrics: bool) -> Router {
    let api = Router::new()
        .route("/models", get(list_models))
        .route("/{deployment}", post(call_deployment));

    let prefix = runtime.route_prefix().to_string();
    let mut router = Router::new().route("/health", get(health));
    if enable_metrics {
        router = router.route("/metrics", get(metrics));
    }

    let router = if prefix == "/" {
        router.merge(api)
    } else {
        router.nest(&prefix, api)
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { runtime })
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP listener bound on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

async fn call_deployment(
    State(state): State<AppState>,
    Path(deployment): Path<String>,
    body: Bytes,
) -> Result<Json<Reply>, ApiError> {
    let handle = state.runtime.get(&deployment).await?;

    METRICS.gateway.active_requests.inc();
    let reply = handle.handle_bytes(&body);
    METRICS.gateway.active_requests.dec();

    Ok(Json(reply))
}

async fn list_models(State(state): State<AppState>) -> Json<ModelList> {
    let data = state
        .runtime
        .routes()
        .await
        .into_iter()
        .map(ModelCard::new)
        .collect();

    Json(ModelList::new(data))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        deployments: state.runtime.deployment_count().await,
    })
}

async fn metrics() -> String {
    METRICS.gather()
}

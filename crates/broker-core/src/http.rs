use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response as HttpResponse},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::backend::LogicalBackend;
use crate::error::BrokerError;
use crate::request::{Operation, Request};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn LogicalBackend>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HelpQuery {
    #[serde(default)]
    pub help: Option<String>,
}

impl HelpQuery {
    fn wants_help(&self) -> bool {
        matches!(self.help.as_deref(), Some(v) if v != "0" && !v.eq_ignore_ascii_case("false"))
    }
}

pub fn create_router(backend: Arc<dyn LogicalBackend>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/v1/{*path}",
            get(read_path).post(write_path).put(write_path),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { backend })
}

/// Bind `listen` and serve the backend until Ctrl-C.
pub async fn serve(listen: &str, backend: Arc<dyn LogicalBackend>) -> anyhow::Result<()> {
    let name = backend.name().to_string();
    let app = create_router(backend);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(backend = %name, "Server running on http://{}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal");
        })
        .await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn read_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<HelpQuery>,
) -> HttpResponse {
    let operation = if query.wants_help() {
        Operation::Help
    } else {
        Operation::Read
    };
    dispatch(state.backend.as_ref(), Request::new(operation, path)).await
}

async fn write_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> HttpResponse {
    let data = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice::<Map<String, Value>>(&body) {
            Ok(data) => data,
            Err(e) => {
                return error_reply(StatusCode::BAD_REQUEST, format!("invalid request body: {e}"))
            }
        }
    };
    dispatch(state.backend.as_ref(), Request::write(path, data)).await
}

async fn dispatch(backend: &dyn LogicalBackend, req: Request) -> HttpResponse {
    match backend.handle_request(&req).await {
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(resp)) if resp.is_error() => {
            error_reply(StatusCode::BAD_REQUEST, resp.error.unwrap_or_default())
        }
        Ok(Some(resp)) => (
            StatusCode::OK,
            Json(json!({ "data": resp.data, "warnings": resp.warnings })),
        )
            .into_response(),
        Err(e @ BrokerError::UnsupportedPath(_)) => {
            error_reply(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e @ BrokerError::UnsupportedOperation { .. }) => {
            error_reply(StatusCode::METHOD_NOT_ALLOWED, e.to_string())
        }
        Err(e) => {
            tracing::error!(
                path = %req.path,
                operation = %req.operation,
                error = %e,
                "Request failed"
            );
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_reply(status: StatusCode, message: String) -> HttpResponse {
    (status, Json(json!({ "errors": [message] }))).into_response()
}

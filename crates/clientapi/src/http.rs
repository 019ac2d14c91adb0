//! # HTTP Surface
//!
//! axum routes over a shared [`ClientService`]. Handlers do three things: extract
//! the request, run the service call on the blocking pool, and map the outcome
//! to a status code. All business rules live in `clientapp`.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/` | 200 |
//! | GET | `/health` | 200 |
//! | GET | `/clients` | 200 |
//! | GET | `/clients/{id}` | 200 |
//! | POST | `/clients` | 201 |
//! | PUT | `/clients/{id}` | 200 |
//! | DELETE | `/clients/{id}` | 204 |
//!
//! ## Error Mapping
//!
//! Every error body is `{"detail": "..."}`.
//!
//! - `NotFound` → 404
//! - `Validation` → 422
//! - Unreadable JSON body → the extractor's own status (400, 415 or 422)
//! - Anything else (I/O, corrupt store, duplicate id, poisoned lock) → 500

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use clientapp::dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use clientapp::store::StorageBackend;
use clientapp::{ClientError, ClientService};
use log::{error, info};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const SERVICE_NAME: &str = "Client Management API";

pub type SharedService<B> = Arc<ClientService<B>>;

pub fn router<B: StorageBackend + 'static>(service: SharedService<B>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/clients", get(list_clients::<B>).post(create_client::<B>))
        .route(
            "/clients/:client_id",
            get(get_client::<B>)
                .put(update_client::<B>)
                .delete(delete_client::<B>),
        )
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve<B: StorageBackend + 'static>(
    addr: &str,
    service: SharedService<B>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        "event=server_start addr={} store={}",
        listener.local_addr()?,
        service.repository().backend().location().display()
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler: run until killed
        std::future::pending::<()>().await;
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn internal(detail: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let status = match &err {
            ClientError::NotFound(_) => StatusCode::NOT_FOUND,
            ClientError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("event=request_failed status={} error={}", status.as_u16(), err);
        }
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Run a service call on the blocking pool; the store does synchronous file I/O.
async fn blocking<B, T, F>(service: SharedService<B>, call: F) -> Result<T, ApiError>
where
    B: StorageBackend + 'static,
    T: Send + 'static,
    F: FnOnce(&ClientService<B>) -> clientapp::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(service.as_ref()))
        .await
        .map_err(|e| ApiError::internal(format!("worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", SERVICE_NAME),
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
    }))
}

async fn list_clients<B: StorageBackend + 'static>(
    State(service): State<SharedService<B>>,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = blocking(service, |s| s.get_all_clients()).await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

async fn get_client<B: StorageBackend + 'static>(
    State(service): State<SharedService<B>>,
    Path(client_id): Path<String>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = blocking(service, move |s| s.get_client(&client_id)).await?;
    Ok(Json(client.into()))
}

async fn create_client<B: StorageBackend + 'static>(
    State(service): State<SharedService<B>>,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    let Json(request) = payload?;
    let client = blocking(service, move |s| s.create_client(request)).await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

async fn update_client<B: StorageBackend + 'static>(
    State(service): State<SharedService<B>>,
    Path(client_id): Path<String>,
    payload: Result<Json<UpdateClientRequest>, JsonRejection>,
) -> Result<Json<ClientResponse>, ApiError> {
    let Json(request) = payload?;
    let client = blocking(service, move |s| s.update_client(&client_id, request)).await?;
    Ok(Json(client.into()))
}

async fn delete_client<B: StorageBackend + 'static>(
    State(service): State<SharedService<B>>,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    blocking(service, move |s| s.delete_client(&client_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

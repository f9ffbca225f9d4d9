//! Webhook HTTP ingress.

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use log::debug;
use log::info;
use log::warn;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::webhook::context::NotifyContext;
use crate::webhook::router::Dispatcher;
use crate::webhook::source::WebhookSource;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub notify: Arc<NotifyContext>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/webhook/:source", post(receive_webhook))
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Webhook server listening on {}.", bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Accepted payloads are always acknowledged: delivery failures surface
/// through logs and the admin channel, not through the webhook response.
async fn receive_webhook(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Json(payload): Json<Value>,
) -> StatusCode {
    let source = match source.parse::<WebhookSource>() {
        Ok(source) => source,
        Err(e) => {
            warn!("Rejected webhook: {}", e);
            return StatusCode::NOT_FOUND;
        }
    };

    debug!("Received {} webhook.", source);
    state
        .dispatcher
        .dispatch(&state.notify, source, &payload)
        .await;
    StatusCode::OK
}

//! REST API handlers.
//!
//! Each handler makes one call through `StateStoreClient`. A store that
//! answers with a failure status has that status forwarded; a store that
//! cannot be reached is a 502, and an undecodable stored value is a 500.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, info};

use webshop_state::StateError;

use crate::ApiState;
use crate::order::{ORDER_KEY, Order};

/// Error body for failures that did not come from the store itself.
#[derive(serde::Serialize)]
struct ApiError {
    success: bool,
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiError {
            success: false,
            error: msg.to_string(),
        }),
    )
}

fn client_error_response(e: &StateError) -> axum::response::Response {
    let status = if e.is_transport() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(&e.to_string(), status).into_response()
}

// ── Orders ─────────────────────────────────────────────────────

/// POST /neworder
pub async fn new_order(State(state): State<ApiState>, Json(order): Json<Order>) -> impl IntoResponse {
    info!(order_id = %order.order_id, "got a new order");

    match state.client.set(ORDER_KEY, &order).await {
        Ok(result) if result.is_success() => {
            info!(order_id = %order.order_id, "persisted order state");
            StatusCode::OK.into_response()
        }
        Ok(result) => {
            error!(
                status = result.status_code(),
                reason = result.error_reason().unwrap_or_default(),
                body = result.error_body().unwrap_or_default(),
                "failed to persist order state"
            );
            StatusCode::from_u16(result.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to persist order state");
            client_error_response(&e)
        }
    }
}

/// GET /order
///
/// A store that has no order (or refuses the read) yields an empty list
/// with 200, not an error status.
pub async fn get_order(State(state): State<ApiState>) -> impl IntoResponse {
    match state.client.get::<Order>(ORDER_KEY).await {
        Ok(result) => match result.into_value() {
            Some(order) => Json(vec![order]).into_response(),
            None => {
                error!("could not get order state");
                Json(Vec::<Order>::new()).into_response()
            }
        },
        Err(e) => {
            error!(error = %e, "could not get order state");
            client_error_response(&e)
        }
    }
}

// ── Ports ──────────────────────────────────────────────────────

/// GET /ports
pub async fn ports(State(state): State<ApiState>) -> impl IntoResponse {
    info!(
        http_port = state.ports.http_port.as_deref().unwrap_or_default(),
        grpc_port = state.ports.grpc_port.as_deref().unwrap_or_default(),
        "sidecar ports"
    );
    Json(state.ports)
}

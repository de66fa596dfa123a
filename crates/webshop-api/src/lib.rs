//! webshop-api — REST API for the webshop.
//!
//! Thin axum layer over [`StateStoreClient`]: every handler makes one
//! state call and maps its outcome onto an HTTP status.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/neworder` | Persist an order under the `order` key |
//! | GET | `/order` | Read the stored order (`[]` when none) |
//! | GET | `/ports` | Report the sidecar ports this process was given |

pub mod handlers;
pub mod order;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use webshop_state::StateStoreClient;

pub use order::{ORDER_KEY, Order};

/// Raw sidecar port values as discovered from the environment.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SidecarPorts {
    pub http_port: Option<String>,
    pub grpc_port: Option<String>,
}

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub client: StateStoreClient,
    pub ports: SidecarPorts,
}

/// Build the API router around an already-constructed client.
pub fn build_router(client: StateStoreClient, ports: SidecarPorts) -> Router {
    let state = ApiState { client, ports };

    Router::new()
        .route("/neworder", post(handlers::new_order))
        .route("/order", get(handlers::get_order))
        .route("/ports", get(handlers::ports))
        .with_state(state)
}

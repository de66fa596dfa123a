//! End-to-end order flow tests.
//!
//! Drives the assembled API router with `oneshot` requests while the state
//! client talks to an in-process fake sidecar over real TCP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower::ServiceExt;
use webshop_api::{SidecarPorts, build_router};
use webshop_state::{ClientConfig, StateEntry, StateStoreClient};

#[derive(Clone, Default)]
struct Sidecar {
    values: Arc<Mutex<HashMap<String, Value>>>,
    /// When set, every write is answered with this status and body.
    reject_writes: Option<(StatusCode, &'static str)>,
}

async fn save(State(sidecar): State<Sidecar>, axum::Json(entries): axum::Json<Vec<StateEntry<Value>>>) -> Response {
    if let Some((status, body)) = sidecar.reject_writes {
        return (status, body).into_response();
    }
    let mut values = sidecar.values.lock().unwrap();
    for entry in entries {
        values.insert(entry.key, entry.value);
    }
    StatusCode::CREATED.into_response()
}

async fn load(State(sidecar): State<Sidecar>, Path((_store, key)): Path<(String, String)>) -> Response {
    match sidecar.values.lock().unwrap().get(&key) {
        Some(value) => (StatusCode::OK, axum::Json(value.clone())).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn start_sidecar(sidecar: Sidecar) -> StateStoreClient {
    let router = Router::new()
        .route("/v1.0/state/{store}", post(save))
        .route("/v1.0/state/{store}/{key}", get(load))
        .with_state(sidecar);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    StateStoreClient::new(&ClientConfig::new("127.0.0.1", port, "statestore")).unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_order(order: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/neworder")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(order).unwrap()))
        .unwrap()
}

fn get_order() -> Request<Body> {
    Request::builder().uri("/order").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn order_posted_then_read_back() {
    let client = start_sidecar(Sidecar::default()).await;
    let router = build_router(client, SidecarPorts::default());

    let order = json!({"orderId": "42", "item": "A"});
    let resp = router.clone().oneshot(post_order(&order)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router.oneshot(get_order()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([order]));
}

#[tokio::test]
async fn no_order_yet_is_empty_list() {
    let client = start_sidecar(Sidecar::default()).await;
    let router = build_router(client, SidecarPorts::default());

    let resp = router.oneshot(get_order()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn rejected_write_status_is_forwarded() {
    let sidecar = Sidecar {
        reject_writes: Some((StatusCode::INTERNAL_SERVER_ERROR, r#"{"errorCode":"ERR_STATE_SAVE"}"#)),
        ..Sidecar::default()
    };
    let client = start_sidecar(sidecar).await;
    let router = build_router(client, SidecarPorts::default());

    let resp = router
        .clone()
        .oneshot(post_order(&json!({"orderId": "7"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = router.oneshot(get_order()).await.unwrap();
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn malformed_order_is_rejected_before_store() {
    let sidecar = Sidecar::default();
    let values = sidecar.values.clone();
    let client = start_sidecar(sidecar).await;
    let router = build_router(client, SidecarPorts::default());

    let resp = router
        .oneshot(post_order(&json!({"item": "no id"})))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    assert!(values.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_sidecar_is_bad_gateway() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = StateStoreClient::new(&ClientConfig::new("127.0.0.1", port, "statestore")).unwrap();
    let router = build_router(client, SidecarPorts::default());

    let resp = router
        .clone()
        .oneshot(post_order(&json!({"orderId": "1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let resp = router.oneshot(get_order()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn ports_endpoint_reports_environment() {
    let client = start_sidecar(Sidecar::default()).await;
    let ports = SidecarPorts {
        http_port: Some("3500".into()),
        grpc_port: Some("50001".into()),
    };
    let router = build_router(client, ports);

    let req = Request::builder().uri("/ports").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"httpPort": "3500", "grpcPort": "50001"})
    );
}

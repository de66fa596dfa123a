//! StateStoreClient — typed access to the sidecar state API.
//!
//! Wire contract:
//!
//! | Operation | Request | Success |
//! |---|---|---|
//! | `get` | `GET {base}/{store}/{key}` | 200 + JSON value |
//! | `set` / `set_many` | `POST {base}/{store}` + `[{"key","value"}, ...]` | 200 or 201 |
//!
//! Requests go through a pooled hyper client shared by all clones.

use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{StateError, StateResult};
use crate::types::{GetResult, SetResult, StateEntry};

type HttpClient = Client<HttpConnector, Full<Bytes>>;

/// Bytes escaped when a key is placed in the path as one segment.
const KEY_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A completed request/response exchange.
struct Exchange {
    status: StatusCode,
    body: Result<Bytes, hyper::Error>,
}

impl Exchange {
    /// Body as text for error reporting; unreadable bodies become `""`.
    fn body_text(&self) -> String {
        match &self.body {
            Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Err(e) => {
                debug!(error = %e, status = %self.status, "could not read error body");
                String::new()
            }
        }
    }
}

/// Client for one named state store behind a sidecar.
#[derive(Clone)]
pub struct StateStoreClient {
    http: HttpClient,
    base_url: String,
    store_url: String,
    store_name: String,
    timeout: Option<Duration>,
}

impl StateStoreClient {
    /// Build a client from validated settings.
    pub fn new(config: &ClientConfig) -> StateResult<Self> {
        let timeout = config.validate()?;
        let base_url = config.base_url();
        let store_url = format!("{base_url}/{}", config.store_name);
        store_url
            .parse::<Uri>()
            .map_err(|e| StateError::InvalidConfig(format!("bad endpoint {store_url}: {e}")))?;

        let http = Client::builder(TokioExecutor::new()).build_http();
        debug!(%store_url, ?timeout, "state client created");
        Ok(Self {
            http,
            base_url,
            store_url,
            store_name: config.store_name.clone(),
            timeout,
        })
    }

    /// `http://{host}:{port}/v1.0/state`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{store}`
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Read `key` and decode it as `T`.
    ///
    /// Any non-200 status, including the store's "no such key" answer, is
    /// returned as a `GetResult` that is not found. A 200 whose body does
    /// not decode as `T` is a [`StateError::Decode`].
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StateResult<GetResult<T>> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        let uri = format!("{}/{}", self.store_url, encode_key(key));
        let req = Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .body(Full::new(Bytes::new()))
            .map_err(|e| StateError::InvalidKey {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let exchange = self.exchange(req).await?;
        if exchange.status != StatusCode::OK {
            let body = exchange.body_text();
            debug!(%key, status = %exchange.status, "state read returned no value");
            return Ok(GetResult::missing(exchange.status, body));
        }

        let bytes = exchange
            .body
            .map_err(|e| StateError::Transport(format!("reading response body: {e}")))?;
        let value: T =
            serde_json::from_slice(&bytes).map_err(|e| StateError::Decode(e.to_string()))?;
        debug!(%key, "state read");
        Ok(GetResult::found(value, exchange.status))
    }

    /// Write a single entry. Same as `set_many` with one element.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> StateResult<SetResult> {
        self.set_many(&[StateEntry::new(key, value)]).await
    }

    /// Write all `entries` in one request.
    ///
    /// The store answers for the batch as a whole; there is no per-entry
    /// result.
    pub async fn set_many<T: Serialize>(&self, entries: &[StateEntry<T>]) -> StateResult<SetResult> {
        if entries.is_empty() {
            return Err(StateError::EmptyBatch);
        }
        if entries.iter().any(|entry| entry.key.is_empty()) {
            return Err(StateError::EmptyKey);
        }

        let payload = serde_json::to_vec(entries).map_err(|e| StateError::Encode(e.to_string()))?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(&self.store_url)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| StateError::InvalidConfig(e.to_string()))?;

        let exchange = self.exchange(req).await?;
        if SetResult::is_success_status(exchange.status) {
            debug!(entries = entries.len(), status = %exchange.status, "state saved");
            return Ok(SetResult::succeeded(exchange.status));
        }

        let body = exchange.body_text();
        warn!(
            entries = entries.len(),
            status = %exchange.status,
            "state store rejected write"
        );
        Ok(SetResult::rejected(exchange.status, body))
    }

    /// Send a request and collect the full response body, bounded by the
    /// configured timeout if there is one.
    async fn exchange(&self, req: Request<Full<Bytes>>) -> StateResult<Exchange> {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let call = async {
            let resp = self.http.request(req).await.map_err(|e| {
                debug!(%method, %uri, error = %e, "state request failed");
                transport_error(&e)
            })?;
            let status = resp.status();
            let body = resp.into_body().collect().await.map(|c| c.to_bytes());
            Ok::<_, StateError>(Exchange { status, body })
        };

        match self.timeout {
            None => call.await,
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    debug!(%method, %uri, ?limit, "state request timed out");
                    Err(StateError::Timeout(limit))
                }
            },
        }
    }
}

impl std::fmt::Debug for StateStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStoreClient")
            .field("store_url", &self.store_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Escape `key` so it always occupies exactly one path segment.
fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_SEGMENT).to_string()
}

/// Flatten the error chain; the top-level hyper-util message alone is
/// just "client error (Connect)".
fn transport_error(e: &(dyn std::error::Error + 'static)) -> StateError {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    StateError::Transport(message)
}

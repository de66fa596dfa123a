//! webshop-state — client for the sidecar key-value state store.
//!
//! Talks to the state API a sidecar exposes at
//! `http://{host}:{port}/v1.0/state/{store}` and turns each exchange into a
//! typed result the caller can inspect.
//!
//! # Outcomes
//!
//! ```text
//! StateStoreClient::get / set / set_many
//!   ├── Ok(GetResult / SetResult)   store answered (found, missing, rejected)
//!   └── Err(StateError)             request never completed, bad input,
//!                                   or an OK body that would not decode
//! ```
//!
//! Non-OK statuses are data, not errors: the status code, canonical reason
//! phrase and raw response body are handed back verbatim so callers can log
//! them or forward the status. Only an unreachable store, a timeout, a decode
//! failure or a rejected argument surfaces as `Err`.
//!
//! The client is `Clone` + `Send` + `Sync`; clones share one pooled
//! connection set and hold no per-call state.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::StateStoreClient;
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STORE_NAME, resolve_port};
pub use error::{StateError, StateResult};
pub use types::*;

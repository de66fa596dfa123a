//! Client configuration.
//!
//! The client only consumes already-resolved values. Turning an
//! environment variable into a port is done by [`resolve_port`], which the
//! composing binary calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{StateError, StateResult};

/// Sidecar host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Sidecar HTTP port used when none is configured or the value is unusable.
pub const DEFAULT_PORT: u16 = 3500;

/// Logical state store name used when none is configured.
pub const DEFAULT_STORE_NAME: &str = "statestore";

/// Connection settings for a [`StateStoreClient`](crate::StateStoreClient).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub store_name: String,
    /// Per-request timeout ("10s", "500ms", "1m"). Unset means calls wait
    /// for the remote indefinitely.
    pub request_timeout: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store_name: DEFAULT_STORE_NAME.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, store_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            store_name: store_name.into(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.request_timeout = Some(timeout.into());
        self
    }

    /// Check the settings and resolve the timeout.
    pub fn validate(&self) -> StateResult<Option<Duration>> {
        if self.host.trim().is_empty() {
            return Err(StateError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(StateError::InvalidConfig("port must not be 0".into()));
        }
        if self.store_name.is_empty() {
            return Err(StateError::InvalidConfig(
                "store name must not be empty".into(),
            ));
        }
        if !is_path_segment(&self.store_name) {
            return Err(StateError::InvalidConfig(format!(
                "store name {:?} is not a valid path segment",
                self.store_name
            )));
        }
        match &self.request_timeout {
            None => Ok(None),
            Some(raw) => parse_duration(raw).map(Some).ok_or_else(|| {
                StateError::InvalidConfig(format!("unparsable request timeout {raw:?}"))
            }),
        }
    }

    /// `http://{host}:{port}/v1.0/state`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/v1.0/state", self.host, self.port)
    }
}

/// Resolve a raw port value (typically `DAPR_HTTP_PORT`) to a port,
/// falling back to [`DEFAULT_PORT`] when it is unset, blank, unparsable
/// or zero.
pub fn resolve_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_PORT;
    };
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => {
            warn!(value = raw, default = DEFAULT_PORT, "unusable sidecar port, using default");
            DEFAULT_PORT
        }
        Ok(port) => port,
    }
}

/// Whether `s` can be placed in a URI path as exactly one segment.
pub(crate) fn is_path_segment(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'/' | b'?' | b'#' | b'%' | b'"' | b'<' | b'>' | b'\\' | b'^' | b'`' | b'{'
                        | b'|' | b'}'
                )
        })
}

/// Parse a duration string like "5s", "500ms", "1m".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

//! webshop.toml configuration.
//!
//! ```toml
//! [server]
//! port = 5000
//!
//! [state]
//! host = "localhost"
//! port = 3500
//! store_name = "statestore"
//! request_timeout = "10s"
//! ```
//!
//! Every section and field is optional. Precedence, lowest to highest:
//! file, then command-line flags, then `DAPR_HTTP_PORT` for the state port.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use webshop_state::{ClientConfig, resolve_port};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebshopConfig {
    pub server: ServerConfig,
    pub state: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl WebshopConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        let config: WebshopConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Override the state port with a raw `DAPR_HTTP_PORT` value, if one
    /// was set. Unusable values fall back to the default sidecar port.
    pub fn apply_sidecar_port(&mut self, raw: Option<&str>) {
        if raw.is_some() {
            self.state.port = resolve_port(raw);
        }
    }
}

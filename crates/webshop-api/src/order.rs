//! The order record persisted by the API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State key the current order is stored under.
pub const ORDER_KEY: &str = "order";

/// A webshop order. Only `orderId` is interpreted; all other fields are
/// stored and returned as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Order {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(name.into(), value.into());
        self
    }
}

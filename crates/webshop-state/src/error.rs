//! Error types for the state store client.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for state client operations.
pub type StateResult<T> = Result<T, StateError>;

/// Hard failures of a state client call.
///
/// A store that answers with a non-OK status is not an error; that outcome
/// is carried by [`GetResult`](crate::GetResult) / [`SetResult`](crate::SetResult).
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid client config: {0}")]
    InvalidConfig(String),

    #[error("state key must not be empty")]
    EmptyKey,

    #[error("invalid state key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("batch write requires at least one entry")]
    EmptyBatch,

    #[error("failed to encode state value: {0}")]
    Encode(String),

    #[error("failed to decode state value: {0}")]
    Decode(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl StateError {
    /// Whether the store could not be reached at all (as opposed to
    /// rejecting the input or returning an undecodable value).
    pub fn is_transport(&self) -> bool {
        matches!(self, StateError::Transport(_) | StateError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(StateError::Transport("connection refused".into()).is_transport());
        assert!(StateError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(!StateError::Decode("eof".into()).is_transport());
        assert!(!StateError::EmptyBatch.is_transport());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            StateError::EmptyKey.to_string(),
            "state key must not be empty"
        );
        let err = StateError::InvalidKey {
            key: "a b".into(),
            reason: "bad segment".into(),
        };
        assert_eq!(err.to_string(), "invalid state key \"a b\": bad segment");
    }
}

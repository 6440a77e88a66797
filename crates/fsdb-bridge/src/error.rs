//! Client error types.

use thiserror::Error;

use crate::subscription::SubscriptionKind;

/// Client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The native side returned a null handle.
    #[error("failed to create FSDB client '{client_id}'")]
    Creation { client_id: String },

    /// The status flag did not read true after subscribing.
    #[error("{kind} subscription {key} did not take effect")]
    Subscription { kind: SubscriptionKind, key: String },

    /// Client id cannot be passed across the bridge.
    #[error("invalid client id: {0}")]
    InvalidClientId(String),

    /// The handle has already been released.
    #[error("client handle is closed")]
    Closed,

    /// Malformed subscription key text.
    #[error("invalid subscription key: {0}")]
    InvalidSubscriptionKey(String),
}

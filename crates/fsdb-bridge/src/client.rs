//! FSDB client API.
//!
//! This module provides the `Client` struct, the owned wrapper around a
//! native FSDB client handle.

use std::ffi::CString;
use std::time::Duration;

use crate::bridge::{Bridge, RawHandle};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::subscription::{SubscriptionKey, SubscriptionKind, SubscriptionStatus};

/// An owned native FSDB client.
///
/// The handle is released exactly once, by [`Client::close`] or on drop.
/// After release every native operation fails with [`Error::Closed`] and the
/// status reads return `false`. The client is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```ignore
/// use fsdb_bridge::{Client, ClientConfig, LoopbackBridge};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), fsdb_bridge::Error> {
///     let mut client = Client::create(LoopbackBridge::new(), ClientConfig::new("demo"))?;
///
///     client.subscribe_to_state().await?;
///     client.subscribe_to_stats().await?;
///     assert!(client.status().state && client.status().stats);
///
///     client.close();
///     Ok(())
/// }
/// ```
pub struct Client<B: Bridge> {
    bridge: B,
    handle: Option<RawHandle>,
    config: ClientConfig,
}

impl<B: Bridge> Client<B> {
    /// Allocate a native client for `config.client_id`.
    pub fn create(bridge: B, config: ClientConfig) -> Result<Self, Error> {
        if config.client_id.is_empty() {
            return Err(Error::InvalidClientId("client id is empty".to_string()));
        }
        let client_id = CString::new(config.client_id.as_str()).map_err(|e| {
            Error::InvalidClientId(format!("{:?}: {}", config.client_id, e))
        })?;

        // `client_id` is released when this function returns.
        let handle = bridge.create(&client_id).ok_or_else(|| Error::Creation {
            client_id: config.client_id.clone(),
        })?;

        tracing::debug!(
            client_id = %config.client_id,
            bridge = bridge.name(),
            "fsdb client created"
        );

        Ok(Self {
            bridge,
            handle: Some(handle),
            config,
        })
    }

    /// Allocate a native client with default settings for the given id.
    pub fn with_client_id(bridge: B, client_id: impl Into<String>) -> Result<Self, Error> {
        Self::create(bridge, ClientConfig::new(client_id))
    }

    /// Subscribe to the switch-state port maps.
    pub async fn subscribe_to_state(&mut self) -> Result<(), Error> {
        self.subscribe(SubscriptionKind::State).await
    }

    /// Subscribe to the agent stats tree.
    pub async fn subscribe_to_stats(&mut self) -> Result<(), Error> {
        self.subscribe(SubscriptionKind::Stats).await
    }

    /// Issue the canned subscription for `kind` and wait for its flag.
    ///
    /// Fails with [`Error::Subscription`] if the flag does not read true
    /// within the configured subscribe timeout. No retry is attempted.
    pub async fn subscribe(&mut self, kind: SubscriptionKind) -> Result<(), Error> {
        let handle = self.handle()?;
        let key = self.subscription_key(kind);

        tracing::debug!(subscription = %key, "issuing subscription");
        // SAFETY: `handle` is live; it is only released through `close`.
        unsafe {
            match kind {
                SubscriptionKind::State => self.bridge.subscribe_to_port_maps(handle),
                SubscriptionKind::Stats => self.bridge.subscribe_to_stats_path(handle),
            }
        }

        if self.wait_for(kind, self.config.subscribe_timeout).await? {
            tracing::info!(subscription = %key, "subscription active");
            Ok(())
        } else {
            tracing::warn!(
                subscription = %key,
                timeout_ms = self.config.subscribe_timeout.as_millis() as u64,
                "subscription did not take effect"
            );
            Err(Error::Subscription {
                kind,
                key: key.to_string(),
            })
        }
    }

    /// Poll the flag for `kind` until it reads true or `timeout` elapses.
    ///
    /// A zero timeout performs a single check. Returns whether the flag was
    /// observed true.
    pub async fn wait_for(&self, kind: SubscriptionKind, timeout: Duration) -> Result<bool, Error> {
        self.handle()?;
        if self.is_subscribed(kind) {
            return Ok(true);
        }

        let poll = async {
            loop {
                tokio::time::sleep(self.config.poll_interval).await;
                if self.is_subscribed(kind) {
                    break;
                }
            }
        };
        let observed = tokio::time::timeout(timeout, poll).await.is_ok();

        Ok(observed || self.is_subscribed(kind))
    }

    /// Whether the state subscription has taken effect.
    pub fn has_state_subscription(&self) -> bool {
        self.is_subscribed(SubscriptionKind::State)
    }

    /// Whether the stats subscription has taken effect.
    pub fn has_stats_subscription(&self) -> bool {
        self.is_subscribed(SubscriptionKind::Stats)
    }

    /// Read both flags.
    pub fn status(&self) -> SubscriptionStatus {
        SubscriptionStatus {
            state: self.has_state_subscription(),
            stats: self.has_stats_subscription(),
        }
    }

    /// Point-in-time read of one flag. Always `false` once closed.
    pub fn is_subscribed(&self, kind: SubscriptionKind) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        // SAFETY: `handle` is live; it is only released through `close`.
        unsafe {
            match kind {
                SubscriptionKind::State => self.bridge.has_state_subscription(handle),
                SubscriptionKind::Stats => self.bridge.has_stats_subscription(handle),
            }
        }
    }

    /// The client id given at construction.
    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// The client id as recorded by the native side.
    pub fn native_client_id(&self) -> Result<Option<String>, Error> {
        let handle = self.handle()?;
        // SAFETY: `handle` is live; it is only released through `close`.
        Ok(unsafe { self.bridge.client_id(handle) })
    }

    /// Key identifying the canned subscription for `kind`.
    pub fn subscription_key(&self, kind: SubscriptionKind) -> SubscriptionKey {
        SubscriptionKey::canned(self.config.host.as_str(), kind)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the bridge this client talks through.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Release the native handle. Later calls are no-ops.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            // SAFETY: taken out of `self.handle`, so this is the only release.
            unsafe { self.bridge.destroy(handle) };
            tracing::debug!(client_id = %self.config.client_id, "fsdb client closed");
        }
    }

    /// Check if the handle has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn handle(&self) -> Result<RawHandle, Error> {
        self.handle.ok_or(Error::Closed)
    }
}

impl<B: Bridge> Drop for Client<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: Bridge> std::fmt::Debug for Client<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.config.client_id)
            .field("bridge", &self.bridge.name())
            .field("closed", &self.is_closed())
            .finish()
    }
}

//! FSDB Bridge - Safe client for the native FSDB publish/subscribe bridge.
//!
//! The native library owns the pub/sub transport, state diffing and
//! reconnection. This crate wraps its handle-based C surface in an owned
//! [`Client`] that releases the handle exactly once.
//!
//! Build with the `native` feature to link the real library. Without it the
//! in-process [`LoopbackBridge`] provides the same surface.
//!
//! # Quick Start
//!
//! ```ignore
//! use fsdb_bridge::{Client, ClientConfig, LoopbackBridge};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::create(LoopbackBridge::new(), ClientConfig::new("demo"))?;
//!
//!     client.subscribe_to_state().await?;
//!     client.subscribe_to_stats().await?;
//!
//!     println!("status: {:?}", client.status());
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "native")]
pub mod ffi;
pub mod loopback;
pub mod subscription;

pub use bridge::{Bridge, RawHandle};
pub use client::Client;
pub use config::ClientConfig;
pub use error::Error;
#[cfg(feature = "native")]
pub use ffi::NativeBridge;
pub use loopback::LoopbackBridge;
pub use subscription::{SubscriptionKey, SubscriptionKind, SubscriptionMode, SubscriptionStatus};

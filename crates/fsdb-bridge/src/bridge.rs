//! The seam between the safe client and the native FSDB bridge.
//!
//! `Bridge` mirrors the native C surface one call at a time. Implementations
//! hand out raw, non-null handles from [`Bridge::create`]; every other method
//! takes such a handle back.
//!
//! # Safety
//!
//! Handle-taking methods are `unsafe`. Callers must pass a handle returned by
//! `create` on the same bridge that has not yet been passed to `destroy`.
//! [`Client`](crate::Client) upholds this by owning the handle and emptying it
//! on release.

use std::ffi::{c_void, CStr};
use std::ptr::NonNull;

/// Opaque native client handle.
pub type RawHandle = NonNull<c_void>;

/// The native FSDB client surface.
pub trait Bridge {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Allocate a native client. `None` means the native side returned null.
    fn create(&self, client_id: &CStr) -> Option<RawHandle>;

    /// Release a native client.
    ///
    /// # Safety
    /// See the module docs. The handle is invalid afterwards.
    unsafe fn destroy(&self, handle: RawHandle);

    /// Issue the switch-state port maps subscription.
    ///
    /// # Safety
    /// See the module docs.
    unsafe fn subscribe_to_port_maps(&self, handle: RawHandle);

    /// Issue the agent stats subscription.
    ///
    /// # Safety
    /// See the module docs.
    unsafe fn subscribe_to_stats_path(&self, handle: RawHandle);

    /// # Safety
    /// See the module docs.
    unsafe fn has_state_subscription(&self, handle: RawHandle) -> bool;

    /// # Safety
    /// See the module docs.
    unsafe fn has_stats_subscription(&self, handle: RawHandle) -> bool;

    /// Client id as recorded by the native side, copied out.
    ///
    /// # Safety
    /// See the module docs.
    unsafe fn client_id(&self, handle: RawHandle) -> Option<String>;
}

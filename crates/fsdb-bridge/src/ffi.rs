//! Raw bindings to the native FSDB bridge library.
//!
//! Only compiled with the `native` feature. The library is expected to be
//! linkable as `fsdb_bridge` (e.g. `libfsdb_bridge.so` on the linker path).
//!
//! Strings cross as NUL-terminated bytes. Ids passed in are owned by Rust for
//! the duration of the call; the id returned by `fsdb_client_get_client_id`
//! is owned by the native client and copied before the call returns.

use std::ffi::{c_char, CStr};
use std::marker::{PhantomData, PhantomPinned};
use std::ptr::NonNull;

use crate::bridge::{Bridge, RawHandle};

/// Opaque native client.
#[repr(C)]
pub struct FsdbClient {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[link(name = "fsdb_bridge")]
extern "C" {
    pub fn fsdb_client_create(client_id: *const c_char) -> *mut FsdbClient;
    pub fn fsdb_client_destroy(client: *mut FsdbClient);
    pub fn fsdb_client_subscribe_port_maps(client: *mut FsdbClient);
    pub fn fsdb_client_subscribe_stats_path(client: *mut FsdbClient);
    pub fn fsdb_client_has_state_subscription(client: *mut FsdbClient) -> bool;
    pub fn fsdb_client_has_stats_subscription(client: *mut FsdbClient) -> bool;
    pub fn fsdb_client_get_client_id(client: *mut FsdbClient) -> *const c_char;
}

/// Bridge backed by the linked native library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBridge;

impl NativeBridge {
    fn raw(handle: RawHandle) -> *mut FsdbClient {
        handle.as_ptr().cast()
    }
}

impl Bridge for NativeBridge {
    fn name(&self) -> &'static str {
        "native"
    }

    fn create(&self, client_id: &CStr) -> Option<RawHandle> {
        // SAFETY: `client_id` is a valid NUL-terminated string for the whole call.
        let client = unsafe { fsdb_client_create(client_id.as_ptr()) };
        NonNull::new(client.cast())
    }

    unsafe fn destroy(&self, handle: RawHandle) {
        unsafe { fsdb_client_destroy(Self::raw(handle)) }
    }

    unsafe fn subscribe_to_port_maps(&self, handle: RawHandle) {
        unsafe { fsdb_client_subscribe_port_maps(Self::raw(handle)) }
    }

    unsafe fn subscribe_to_stats_path(&self, handle: RawHandle) {
        unsafe { fsdb_client_subscribe_stats_path(Self::raw(handle)) }
    }

    unsafe fn has_state_subscription(&self, handle: RawHandle) -> bool {
        unsafe { fsdb_client_has_state_subscription(Self::raw(handle)) }
    }

    unsafe fn has_stats_subscription(&self, handle: RawHandle) -> bool {
        unsafe { fsdb_client_has_stats_subscription(Self::raw(handle)) }
    }

    unsafe fn client_id(&self, handle: RawHandle) -> Option<String> {
        let id = unsafe { fsdb_client_get_client_id(Self::raw(handle)) };
        if id.is_null() {
            return None;
        }
        // SAFETY: non-null and owned by the live native client.
        let id = unsafe { CStr::from_ptr(id) };
        Some(id.to_string_lossy().into_owned())
    }
}

//! In-process bridge with the same handle semantics as the native library.
//!
//! Each handle is a heap-allocated session. Subscriptions become visible
//! through the status flags once the configured latency has elapsed, which
//! models the native side establishing its stream in the background.

use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bridge::{Bridge, RawHandle};
use crate::subscription::SubscriptionKind;

/// A native-side client session.
#[derive(Debug)]
struct LoopbackSession {
    client_id: CString,
    latency: Duration,
    rejected: HashSet<SubscriptionKind>,
    state_since: Option<Instant>,
    stats_since: Option<Instant>,
}

impl LoopbackSession {
    fn subscribe(&mut self, kind: SubscriptionKind) {
        if self.rejected.contains(&kind) {
            tracing::debug!(
                client_id = %self.client_id.to_string_lossy(),
                %kind,
                "loopback rejected subscription"
            );
            return;
        }

        let since = match kind {
            SubscriptionKind::State => &mut self.state_since,
            SubscriptionKind::Stats => &mut self.stats_since,
        };
        since.get_or_insert_with(Instant::now);

        tracing::debug!(
            client_id = %self.client_id.to_string_lossy(),
            %kind,
            "loopback subscription registered"
        );
    }

    fn is_active(&self, kind: SubscriptionKind) -> bool {
        let since = match kind {
            SubscriptionKind::State => self.state_since,
            SubscriptionKind::Stats => self.stats_since,
        };
        since.is_some_and(|t| t.elapsed() >= self.latency)
    }
}

#[derive(Debug, Default)]
struct Counters {
    created: AtomicUsize,
    destroyed: AtomicUsize,
}

/// In-process [`Bridge`].
///
/// Clones share their counters, so a test can keep one clone to inspect
/// what a client did with the other.
#[derive(Debug, Clone, Default)]
pub struct LoopbackBridge {
    latency: Duration,
    rejected: HashSet<SubscriptionKind>,
    refuse_create: bool,
    counters: Arc<Counters>,
}

impl LoopbackBridge {
    /// Bridge whose subscriptions take effect immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay between a subscribe call and its flag reading true.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Never let subscriptions of this kind take effect.
    pub fn rejecting(mut self, kind: SubscriptionKind) -> Self {
        self.rejected.insert(kind);
        self
    }

    /// Return a null handle from every create call.
    pub fn refusing_creation(mut self) -> Self {
        self.refuse_create = true;
        self
    }

    /// Number of handles handed out.
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Number of destroy calls received.
    pub fn destroyed(&self) -> usize {
        self.counters.destroyed.load(Ordering::SeqCst)
    }

    /// Handles created but not yet destroyed.
    pub fn live_handles(&self) -> usize {
        self.created().saturating_sub(self.destroyed())
    }

    unsafe fn session<'a>(handle: RawHandle) -> &'a mut LoopbackSession {
        unsafe { &mut *handle.as_ptr().cast::<LoopbackSession>() }
    }
}

impl Bridge for LoopbackBridge {
    fn name(&self) -> &'static str {
        "loopback"
    }

    fn create(&self, client_id: &CStr) -> Option<RawHandle> {
        if self.refuse_create || client_id.to_bytes().is_empty() {
            return None;
        }

        let session = Box::new(LoopbackSession {
            client_id: client_id.to_owned(),
            latency: self.latency,
            rejected: self.rejected.clone(),
            state_since: None,
            stats_since: None,
        });
        self.counters.created.fetch_add(1, Ordering::SeqCst);

        Some(NonNull::from(Box::leak(session)).cast())
    }

    unsafe fn destroy(&self, handle: RawHandle) {
        let session = unsafe { Box::from_raw(handle.as_ptr().cast::<LoopbackSession>()) };
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            client_id = %session.client_id.to_string_lossy(),
            "loopback session destroyed"
        );
    }

    unsafe fn subscribe_to_port_maps(&self, handle: RawHandle) {
        unsafe { Self::session(handle) }.subscribe(SubscriptionKind::State);
    }

    unsafe fn subscribe_to_stats_path(&self, handle: RawHandle) {
        unsafe { Self::session(handle) }.subscribe(SubscriptionKind::Stats);
    }

    unsafe fn has_state_subscription(&self, handle: RawHandle) -> bool {
        unsafe { Self::session(handle) }.is_active(SubscriptionKind::State)
    }

    unsafe fn has_stats_subscription(&self, handle: RawHandle) -> bool {
        unsafe { Self::session(handle) }.is_active(SubscriptionKind::Stats)
    }

    unsafe fn client_id(&self, handle: RawHandle) -> Option<String> {
        let session = unsafe { Self::session(handle) };
        Some(session.client_id.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_create_destroy_counts() {
        let bridge = LoopbackBridge::new();
        let handle = bridge.create(&id("agent")).unwrap();
        assert_eq!(bridge.live_handles(), 1);

        unsafe { bridge.destroy(handle) };
        assert_eq!(bridge.created(), 1);
        assert_eq!(bridge.destroyed(), 1);
        assert_eq!(bridge.live_handles(), 0);
    }

    #[test]
    fn test_empty_id_returns_null() {
        let bridge = LoopbackBridge::new();
        assert!(bridge.create(&id("")).is_none());
        assert_eq!(bridge.created(), 0);
    }

    #[test]
    fn test_refusing_creation() {
        let bridge = LoopbackBridge::new().refusing_creation();
        assert!(bridge.create(&id("agent")).is_none());
    }

    #[test]
    fn test_flags_follow_subscribe_calls() {
        let bridge = LoopbackBridge::new();
        let handle = bridge.create(&id("agent")).unwrap();

        unsafe {
            assert!(!bridge.has_state_subscription(handle));
            assert!(!bridge.has_stats_subscription(handle));

            bridge.subscribe_to_port_maps(handle);
            assert!(bridge.has_state_subscription(handle));
            assert!(!bridge.has_stats_subscription(handle));

            bridge.subscribe_to_stats_path(handle);
            assert!(bridge.has_stats_subscription(handle));

            assert_eq!(bridge.client_id(handle).as_deref(), Some("agent"));
            bridge.destroy(handle);
        }
    }

    #[test]
    fn test_rejected_kind_stays_false() {
        let bridge = LoopbackBridge::new().rejecting(SubscriptionKind::Stats);
        let handle = bridge.create(&id("agent")).unwrap();

        unsafe {
            bridge.subscribe_to_stats_path(handle);
            bridge.subscribe_to_port_maps(handle);
            assert!(!bridge.has_stats_subscription(handle));
            assert!(bridge.has_state_subscription(handle));
            bridge.destroy(handle);
        }
    }

    #[test]
    fn test_latency_delays_flag() {
        let bridge = LoopbackBridge::new().with_latency(Duration::from_millis(30));
        let handle = bridge.create(&id("agent")).unwrap();

        unsafe {
            bridge.subscribe_to_port_maps(handle);
            assert!(!bridge.has_state_subscription(handle));
            std::thread::sleep(Duration::from_millis(40));
            assert!(bridge.has_state_subscription(handle));
            bridge.destroy(handle);
        }
    }

    #[test]
    fn test_clones_share_counters() {
        let bridge = LoopbackBridge::new();
        let observer = bridge.clone();
        let handle = bridge.create(&id("agent")).unwrap();
        assert_eq!(observer.live_handles(), 1);
        unsafe { bridge.destroy(handle) };
        assert_eq!(observer.live_handles(), 0);
    }
}

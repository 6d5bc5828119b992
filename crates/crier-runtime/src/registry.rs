//! Adapter registry and message router.
//!
//! The [`AdapterRegistry`] is the hub of the bridge: it owns the set of
//! registered adapters, the optional message filter, and the host's inbound
//! sink, and routes messages between them.
//!
//! ```text
//! host ──▶ broadcast ──▶ filter ──▶ adapter.handle_message  (A, B, C ...)
//! adapter ──▶ receive_from_adapter ──▶ filter ──▶ inbound sink
//! ```
//!
//! The host constructs one registry at startup, installs the inbound sink
//! (and optionally the filter), and hands the registry to its adapters by
//! reference. There is no ambient singleton; tests construct fresh, isolated
//! instances.
//!
//! # Ordering and identity
//!
//! Adapters are kept in registration order, and broadcast order is
//! registration order. Identity is the adapter's `identifier()` string:
//! registering an adapter whose identifier is already present replaces the
//! old instance (shutting it down first if it is still active). At most one
//! adapter per identifier is registered at any instant.
//!
//! # Thread safety
//!
//! Interior state is guarded by a single mutex, held only while the adapter
//! list is mutated or snapshotted, never across adapter callbacks. Adapters
//! may therefore re-enter the registry from `handle_message` without
//! deadlocking. One consequence: an adapter unregistered while a broadcast is
//! in flight can still receive that broadcast's message, since dispatch works
//! from the snapshot taken when the broadcast started.
//!
//! # Failure isolation
//!
//! A failing `handle_message` or `shutdown` is logged against the offending
//! adapter and never prevents delivery to the remaining adapters or crashes
//! the caller. Missing configuration (no sink, no filter) and unknown
//! identifiers are silent no-ops.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crier_core::{Message, SharedAdapter};

/// The process-wide message filter.
///
/// Applied to every message crossing the bridge in either direction before
/// final delivery. Returning `None` vetoes the message entirely: neither
/// adapters nor the host sink see it.
pub type MessageFilter = Arc<dyn Fn(Message) -> Option<Message> + Send + Sync>;

/// The host's inbound handler, invoked once per accepted external message.
pub type InboundSink = Arc<dyn Fn(Message) + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    /// Registration order; at most one adapter per identifier.
    adapters: Vec<SharedAdapter>,
    filter: Option<MessageFilter>,
    sink: Option<InboundSink>,
}

impl RegistryInner {
    fn position(&self, id: &str) -> Option<usize> {
        self.adapters.iter().position(|a| a.identifier() == id)
    }
}

/// Registry of external-platform adapters and router for messages crossing
/// the bridge.
#[derive(Default)]
pub struct AdapterRegistry {
    inner: Mutex<RegistryInner>,
}

impl AdapterRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the host's inbound sink.
    ///
    /// The sink is invoked for every externally-originated message that
    /// passes the filter. Intended to be called once by the host during
    /// startup; calling it again replaces the previous sink (last write
    /// wins). Until a sink is installed, inbound messages are silently
    /// dropped.
    pub fn set_inbound_sink<F>(&self, sink: F)
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        self.inner.lock().sink = Some(Arc::new(sink));
        debug!("inbound sink installed");
    }

    /// Installs the process-wide message filter.
    ///
    /// The filter runs on every message in both directions; returning `None`
    /// vetoes delivery. Calling this again replaces the previous filter
    /// (last write wins). Without a filter, messages pass through unchanged.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(Message) -> Option<Message> + Send + Sync + 'static,
    {
        self.inner.lock().filter = Some(Arc::new(filter));
        debug!("message filter installed");
    }

    /// Registers an adapter, replacing any adapter with the same identifier.
    ///
    /// Replacement is keyed purely on `identifier()`: the previous instance
    /// is removed and, if it still reports active, shut down. Afterwards
    /// exactly one adapter with that identifier is registered, and it is the
    /// supplied instance. New registrations go to the end of the broadcast
    /// order.
    ///
    /// The swap happens atomically under the lock; the old adapter's
    /// `shutdown` runs after it, outside the lock. A shutdown handler that
    /// re-enters the registry therefore already observes the new instance.
    pub fn register(&self, adapter: SharedAdapter) {
        let id = adapter.identifier().to_string();
        let replaced = {
            let mut inner = self.inner.lock();
            let replaced = inner.position(&id).map(|idx| inner.adapters.remove(idx));
            inner.adapters.push(adapter);
            replaced
        };
        match replaced {
            Some(old) => {
                shutdown_if_active(&old);
                info!(adapter = %id, "replaced adapter");
            }
            None => info!(adapter = %id, "registered adapter"),
        }
    }

    /// Removes the adapter with the given identifier, shutting it down if it
    /// is still active. Unknown identifiers are a no-op.
    pub fn unregister(&self, id: &str) {
        let removed = {
            let mut inner = self.inner.lock();
            inner.position(id).map(|idx| inner.adapters.remove(idx))
        };
        match removed {
            Some(adapter) => {
                shutdown_if_active(&adapter);
                info!(adapter = %id, "unregistered adapter");
            }
            None => debug!(adapter = %id, "unregister ignored: unknown adapter"),
        }
    }

    /// Removes every adapter, shutting down those still active.
    ///
    /// Idempotent: clearing an empty registry does nothing.
    pub fn clear_all(&self) {
        let drained: Vec<SharedAdapter> = {
            let mut inner = self.inner.lock();
            inner.adapters.drain(..).collect()
        };
        if drained.is_empty() {
            return;
        }
        info!(count = drained.len(), "clearing all adapters");
        for adapter in &drained {
            shutdown_if_active(adapter);
        }
    }

    /// Broadcasts an outbound message to every registered adapter.
    ///
    /// With no adapters registered this is a no-op and the filter is not
    /// evaluated. Otherwise the filter runs once; a veto drops the message
    /// before any adapter sees it. Delivery is synchronous on the calling
    /// thread, in registration order. A failing adapter is logged and does
    /// not block delivery to the rest.
    pub fn broadcast(&self, message: Message) {
        let (adapters, filter) = {
            let inner = self.inner.lock();
            if inner.adapters.is_empty() {
                return;
            }
            (inner.adapters.clone(), inner.filter.clone())
        };
        let Some(message) = apply_filter(&filter, message) else {
            debug!("outbound message vetoed by filter");
            return;
        };
        for adapter in &adapters {
            if let Err(error) = adapter.handle_message(&message) {
                warn!(adapter = %adapter.identifier(), %error, "outbound delivery failed");
            }
        }
    }

    /// Accepts an inbound message from an adapter and forwards it to the
    /// host's sink.
    ///
    /// Only externally-originated messages are forwarded; host-originated
    /// input on this path is ignored. Without an installed sink the message
    /// is silently dropped. Otherwise the filter runs once; surviving
    /// messages reach the sink exactly once.
    pub fn receive_from_adapter(&self, message: Message) {
        if !message.is_external() {
            debug!("ignoring host-originated message on the inbound path");
            return;
        }
        let (sink, filter) = {
            let inner = self.inner.lock();
            (inner.sink.clone(), inner.filter.clone())
        };
        let Some(sink) = sink else {
            debug!(platform = message.platform(), "inbound message dropped: no sink installed");
            return;
        };
        match apply_filter(&filter, message) {
            Some(message) => sink(message),
            None => debug!("inbound message vetoed by filter"),
        }
    }

    /// Looks up an adapter by identifier.
    pub fn get(&self, id: &str) -> Option<SharedAdapter> {
        let inner = self.inner.lock();
        inner.position(id).map(|idx| inner.adapters[idx].clone())
    }

    /// Returns the identifiers of all registered adapters, in broadcast
    /// order.
    pub fn ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .adapters
            .iter()
            .map(|a| a.identifier().to_string())
            .collect()
    }

    /// Returns the number of registered adapters.
    pub fn count(&self) -> usize {
        self.inner.lock().adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().adapters.is_empty()
    }

    /// Returns a snapshot of registry statistics.
    pub fn stats(&self) -> RegistryStats {
        // Liveness probes run outside the lock, like any adapter callback.
        let adapters = self.inner.lock().adapters.clone();
        let active = adapters.iter().filter(|a| a.is_active()).count();
        RegistryStats {
            total: adapters.len(),
            active,
            inactive: adapters.len() - active,
        }
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapter_count", &self.count())
            .finish()
    }
}

/// A point-in-time summary of the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total number of registered adapters.
    pub total: usize,
    /// Adapters reporting active.
    pub active: usize,
    /// Adapters reporting inactive.
    pub inactive: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Adapters: {} total ({} active, {} inactive)",
            self.total, self.active, self.inactive
        )
    }
}

fn shutdown_if_active(adapter: &SharedAdapter) {
    if !adapter.is_active() {
        return;
    }
    if let Err(error) = adapter.shutdown() {
        warn!(adapter = %adapter.identifier(), %error, "adapter shutdown failed");
    }
}

fn apply_filter(filter: &Option<MessageFilter>, message: Message) -> Option<Message> {
    match filter {
        Some(filter) => filter(message),
        None => Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crier_core::{Adapter, AdapterError, AdapterResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Records deliveries and shutdowns; optionally fails every delivery.
    struct MockAdapter {
        id: String,
        active: AtomicBool,
        shutdowns: AtomicUsize,
        received: Mutex<Vec<Message>>,
        delivery_log: Arc<Mutex<Vec<String>>>,
        fail_delivery: bool,
    }

    impl MockAdapter {
        fn new(id: &str) -> Arc<Self> {
            Self::with_log(id, Arc::new(Mutex::new(Vec::new())))
        }

        fn with_log(id: &str, delivery_log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                active: AtomicBool::new(true),
                shutdowns: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                delivery_log,
                fail_delivery: false,
            })
        }

        fn failing(id: &str, delivery_log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                active: AtomicBool::new(true),
                shutdowns: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                delivery_log,
                fail_delivery: true,
            })
        }

        fn deactivate(&self) {
            self.active.store(false, Ordering::SeqCst);
        }

        fn shutdown_count(&self) -> usize {
            self.shutdowns.load(Ordering::SeqCst)
        }

        fn received(&self) -> Vec<Message> {
            self.received.lock().clone()
        }
    }

    impl Adapter for MockAdapter {
        fn identifier(&self) -> &str {
            &self.id
        }

        fn handle_message(&self, message: &Message) -> AdapterResult<()> {
            self.delivery_log.lock().push(self.id.clone());
            if self.fail_delivery {
                return Err(AdapterError::delivery("mock delivery failure"));
            }
            self.received.lock().push(message.clone());
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }

        fn shutdown(&self) -> AdapterResult<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            self.active.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    fn host_msg() -> Message {
        Message::from_host("u1", "Steve", "hello")
    }

    fn external_msg() -> Message {
        Message::from_platform("d#42", "steve_d", "hi!", "discord")
    }

    #[test]
    fn register_replaces_adapter_with_same_identifier() {
        let registry = AdapterRegistry::new();
        let old = MockAdapter::new("discord");
        let new = MockAdapter::new("discord");

        registry.register(old.clone());
        registry.register(new.clone());

        assert_eq!(old.shutdown_count(), 1);
        assert_eq!(new.shutdown_count(), 0);
        assert_eq!(registry.count(), 1);

        registry.broadcast(host_msg());
        assert!(old.received().is_empty());
        assert_eq!(new.received().len(), 1);
    }

    #[test]
    fn register_does_not_shut_down_inactive_predecessor() {
        let registry = AdapterRegistry::new();
        let old = MockAdapter::new("discord");
        old.deactivate();
        registry.register(old.clone());

        registry.register(MockAdapter::new("discord"));
        assert_eq!(old.shutdown_count(), 0);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn replace_preserves_other_adapters() {
        let registry = AdapterRegistry::new();
        registry.register(MockAdapter::new("discord"));
        registry.register(MockAdapter::new("telegram"));
        registry.register(MockAdapter::new("discord"));

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.ids(), vec!["telegram", "discord"]);
    }

    #[test]
    fn unregister_unknown_identifier_is_a_no_op() {
        let registry = AdapterRegistry::new();
        let adapter = MockAdapter::new("discord");
        registry.register(adapter.clone());

        registry.unregister("telegram");

        assert_eq!(registry.count(), 1);
        assert_eq!(adapter.shutdown_count(), 0);
    }

    #[test]
    fn unregister_shuts_down_active_adapter() {
        let registry = AdapterRegistry::new();
        let adapter = MockAdapter::new("discord");
        registry.register(adapter.clone());

        registry.unregister("discord");

        assert_eq!(adapter.shutdown_count(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn broadcast_with_vetoing_filter_reaches_no_adapter() {
        let registry = AdapterRegistry::new();
        let adapter = MockAdapter::new("discord");
        registry.register(adapter.clone());
        registry.set_filter(|_| None);

        registry.broadcast(host_msg());

        assert!(adapter.received().is_empty());
    }

    #[test]
    fn broadcast_without_filter_delivers_unmodified_in_order() {
        let registry = AdapterRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = MockAdapter::with_log("a", log.clone());
        let b = MockAdapter::with_log("b", log.clone());
        let c = MockAdapter::with_log("c", log.clone());
        registry.register(a.clone());
        registry.register(b.clone());
        registry.register(c.clone());

        let msg = host_msg();
        registry.broadcast(msg.clone());

        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
        for adapter in [&a, &b, &c] {
            assert_eq!(adapter.received(), vec![msg.clone()]);
        }
    }

    #[test]
    fn broadcast_applies_filter_transform() {
        let registry = AdapterRegistry::new();
        let adapter = MockAdapter::new("discord");
        registry.register(adapter.clone());
        registry.set_filter(|msg| {
            Some(Message::from_host(
                msg.sender_id(),
                msg.sender_name(),
                msg.content().to_uppercase(),
            ))
        });

        registry.broadcast(host_msg());

        assert_eq!(adapter.received()[0].content(), "HELLO");
    }

    #[test]
    fn failing_adapter_does_not_block_later_adapters() {
        let registry = AdapterRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let bad = MockAdapter::failing("bad", log.clone());
        let good = MockAdapter::with_log("good", log.clone());
        registry.register(bad);
        registry.register(good.clone());

        registry.broadcast(host_msg());

        assert_eq!(*log.lock(), vec!["bad", "good"]);
        assert_eq!(good.received().len(), 1);
    }

    #[test]
    fn receive_ignores_host_originated_messages() {
        let registry = AdapterRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();
        registry.set_inbound_sink(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.receive_from_adapter(host_msg());

        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn receive_without_sink_drops_silently() {
        let registry = AdapterRegistry::new();
        // No sink installed; nothing to assert beyond "does not panic".
        registry.receive_from_adapter(external_msg());
    }

    #[test]
    fn receive_delivers_to_sink_exactly_once() {
        let registry = AdapterRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        registry.set_inbound_sink(move |msg| sink_seen.lock().push(msg));

        let msg = external_msg();
        registry.receive_from_adapter(msg.clone());

        assert_eq!(*seen.lock(), vec![msg]);
    }

    #[test]
    fn receive_applies_filter_transform() {
        let registry = AdapterRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        registry.set_inbound_sink(move |msg| sink_seen.lock().push(msg));
        registry.set_filter(|msg| {
            Some(Message::from_platform(
                msg.sender_id(),
                msg.sender_name(),
                msg.content().to_uppercase(),
                msg.platform(),
            ))
        });

        registry.receive_from_adapter(external_msg());

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].content(), "HI!");
        assert_eq!(seen[0].platform(), "discord");
    }

    #[test]
    fn receive_respects_filter_veto() {
        let registry = AdapterRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();
        registry.set_inbound_sink(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.set_filter(|_| None);

        registry.receive_from_adapter(external_msg());

        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_all_shuts_down_only_active_adapters() {
        let registry = AdapterRegistry::new();
        let a = MockAdapter::new("a");
        let b = MockAdapter::new("b");
        let idle = MockAdapter::new("idle");
        idle.deactivate();
        registry.register(a.clone());
        registry.register(b.clone());
        registry.register(idle.clone());

        registry.clear_all();

        assert_eq!(a.shutdown_count(), 1);
        assert_eq!(b.shutdown_count(), 1);
        assert_eq!(idle.shutdown_count(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let registry = AdapterRegistry::new();
        let adapter = MockAdapter::new("a");
        registry.register(adapter.clone());

        registry.clear_all();
        registry.clear_all();

        assert_eq!(adapter.shutdown_count(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn filter_and_sink_overwrite_last_write_wins() {
        let registry = AdapterRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        registry.set_inbound_sink(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = second.clone();
        registry.set_inbound_sink(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.set_filter(|_| None);
        registry.set_filter(Some); // later filter passes everything through

        registry.receive_from_adapter(external_msg());

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn broadcast_with_no_adapters_skips_the_filter() {
        let registry = AdapterRegistry::new();
        let evaluated = Arc::new(AtomicUsize::new(0));
        let counter = evaluated.clone();
        registry.set_filter(move |msg| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(msg)
        });

        registry.broadcast(host_msg());

        assert_eq!(evaluated.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn get_finds_registered_adapter() {
        let registry = AdapterRegistry::new();
        registry.register(MockAdapter::new("discord"));

        assert!(registry.get("discord").is_some());
        assert!(registry.get("telegram").is_none());
    }

    #[test]
    fn stats_reflect_liveness() {
        let registry = AdapterRegistry::new();
        let idle = MockAdapter::new("idle");
        idle.deactivate();
        registry.register(MockAdapter::new("a"));
        registry.register(idle);

        let stats = registry.stats();
        assert_eq!(
            stats,
            RegistryStats {
                total: 2,
                active: 1,
                inactive: 1
            }
        );
        assert_eq!(
            stats.to_string(),
            "Adapters: 2 total (1 active, 1 inactive)"
        );
    }
}

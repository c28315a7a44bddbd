//! Typed subscription table.
//!
//! Maps each [`EventKind`] to an ordered list of callbacks. Registration
//! order is invocation order, and registering the same closure twice yields
//! two independent entries.

use std::{
    collections::HashMap,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::domain::{ChatEvent, EventKind};

/// A subscriber callback
pub type Callback = Arc<dyn Fn(&ChatEvent) + Send + Sync>;

/// Handle identifying one registration, returned by [`EventBus::on`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

struct Entry {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct Table {
    next_id: u64,
    subscribers: HashMap<EventKind, Vec<Entry>>,
}

#[derive(Default)]
pub struct EventBus {
    table: Mutex<Table>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `kind`, after any existing ones.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&ChatEvent) + Send + Sync + 'static,
    {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.subscribers.entry(kind).or_default().push(Entry {
            id,
            callback: Arc::new(callback),
        });
        Subscription { id, kind }
    }

    /// Remove a registration. Returns `false` if it was already gone.
    pub fn off(&self, subscription: &Subscription) -> bool {
        let mut table = self.lock();
        let Some(entries) = table.subscribers.get_mut(&subscription.kind) else {
            return false;
        };
        match entries.iter().position(|e| e.id == subscription.id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.lock().subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.lock().subscribers.clear();
    }

    /// Invoke every callback registered for the event's kind.
    ///
    /// Callbacks run against a snapshot taken before the first one is
    /// called, so they may register or unregister freely; such changes
    /// apply from the next emit. A panicking callback is logged and the
    /// remaining callbacks still run. Returns how many callbacks completed.
    pub(crate) fn emit(&self, event: &ChatEvent) -> usize {
        let kind = event.kind();
        let snapshot: Vec<Callback> = match self.lock().subscribers.get(&kind) {
            Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
            None => return 0,
        };

        let mut completed = 0;
        for callback in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(()) => completed += 1,
                Err(payload) => {
                    let reason = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!("Subscriber for '{}' panicked: {}", kind, reason);
                }
            }
        }
        completed
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

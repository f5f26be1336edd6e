//! Minimal publish/subscribe registry
//!
//! Handlers are registered per event kind or for every kind through
//! [`Topic::Any`]. Dispatch is synchronous: type-matched handlers run in
//! registration order, then wildcard handlers, all receiving the same
//! payload.
//!
//! A handler that panics is logged and skipped; the remaining handlers of the
//! same emission still run.

use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered handler, used to unsubscribe it
    pub struct ListenerId;
}

/// What a handler subscribes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic<K> {
    /// A single event kind
    Only(K),
    /// Every event kind (the `"*"` wildcard)
    Any,
}

impl<K> From<K> for Topic<K> {
    fn from(kind: K) -> Self {
        Topic::Only(kind)
    }
}

/// Boxed event handler
pub type Handler<A> = Box<dyn FnMut(&A) + Send>;

/// Per-instance event registry keyed by `K`, carrying payloads of type `A`
pub struct EventEmitter<K, A> {
    handlers: SlotMap<ListenerId, Handler<A>>,
    typed: FxHashMap<K, Vec<ListenerId>>,
    wildcard: Vec<ListenerId>,
}

impl<K, A> Default for EventEmitter<K, A>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, A> EventEmitter<K, A>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
            typed: FxHashMap::default(),
            wildcard: Vec::new(),
        }
    }

    /// Register a handler for the given topic
    pub fn on<F>(&mut self, topic: impl Into<Topic<K>>, handler: F) -> ListenerId
    where
        F: FnMut(&A) + Send + 'static,
    {
        let id = self.handlers.insert(Box::new(handler));
        match topic.into() {
            Topic::Only(kind) => self.typed.entry(kind).or_default().push(id),
            Topic::Any => self.wildcard.push(id),
        }
        id
    }

    /// Remove a registration from the given topic
    ///
    /// Returns `false` if `id` was not registered under that topic.
    pub fn off(&mut self, topic: impl Into<Topic<K>>, id: ListenerId) -> bool {
        let list = match topic.into() {
            Topic::Only(kind) => match self.typed.get_mut(&kind) {
                Some(list) => list,
                None => return false,
            },
            Topic::Any => &mut self.wildcard,
        };

        match list.iter().position(|registered| *registered == id) {
            Some(index) => {
                list.remove(index);
                self.handlers.remove(id);
                true
            }
            None => false,
        }
    }

    /// Invoke every handler registered for `kind`, then the wildcard handlers
    ///
    /// Returns how many handlers ran to completion.
    pub fn emit(&mut self, kind: &K, payload: &A) -> usize {
        // Snapshot so the dispatch order is fixed before any handler runs
        let mut order: SmallVec<[ListenerId; 8]> = SmallVec::new();
        if let Some(list) = self.typed.get(kind) {
            order.extend(list.iter().copied());
        }
        order.extend(self.wildcard.iter().copied());

        let mut completed = 0;
        for id in order {
            let Some(handler) = self.handlers.get_mut(id) else {
                continue;
            };
            match catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                Ok(()) => completed += 1,
                Err(_) => tracing::error!("event handler {:?} panicked during emit", id),
            }
        }
        completed
    }

    /// Drop every registration
    pub fn remove_all_listeners(&mut self) {
        self.handlers.clear();
        self.typed.clear();
        self.wildcard.clear();
    }

    /// Number of handlers registered under a topic
    pub fn listener_count(&self, topic: impl Into<Topic<K>>) -> usize {
        match topic.into() {
            Topic::Only(kind) => self.typed.get(&kind).map_or(0, Vec::len),
            Topic::Any => self.wildcard.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

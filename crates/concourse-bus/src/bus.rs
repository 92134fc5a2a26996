//! Bus implementation: subscriber registry and synchronous dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::HandlerError;

/// A subscriber callback. Fallible so consumers can reject stale or
/// malformed events without panicking.
type Callback = dyn FnMut(&Value) -> Result<(), HandlerError>;

/// One registered subscriber on a topic.
struct Registered {
    /// Registration token, unique within the bus.
    id: u64,
    /// The handler, shared so dispatch can run without holding the
    /// registry borrow.
    callback: Rc<RefCell<Callback>>,
}

/// Mutable bus state behind the shared handle.
struct Inner {
    /// Subscribers per topic, in registration order.
    topics: HashMap<String, Vec<Registered>>,
    /// Next registration token.
    next_id: u64,
}

/// The event bus handle. Cheap to clone; all clones share one registry.
///
/// Single-threaded by design ([`Rc`], not `Arc`): the whole engine runs
/// on the host render thread.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<Inner>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                topics: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a handler for a topic. Topics need no pre-declaration.
    ///
    /// Returns a [`Subscription`] whose `unsubscribe` removes the handler;
    /// dropping the subscription without unsubscribing leaves the handler
    /// registered (teardown is explicit, never implicit).
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> Subscription
    where
        F: FnMut(&Value) -> Result<(), HandlerError> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        // Wraps after 2^64 registrations; collision is not a practical concern.
        inner.next_id = inner.next_id.wrapping_add(1);
        inner
            .topics
            .entry(topic.to_owned())
            .or_default()
            .push(Registered {
                id,
                callback: Rc::new(RefCell::new(callback)),
            });
        debug!(topic, id, "subscribed");
        Subscription {
            inner: Rc::downgrade(&self.inner),
            topic: topic.to_owned(),
            id,
        }
    }

    /// Publish a payload to every subscriber of a topic, synchronously,
    /// in registration order. Returns the number of handlers invoked.
    ///
    /// The subscriber list is snapshotted before dispatch: handlers that
    /// subscribe during delivery do not receive the in-flight event, and
    /// handlers that unsubscribe during delivery still receive it. A
    /// handler already running further up the call stack (a topic cycle
    /// reaching the same subscriber) is skipped with a warning.
    pub fn publish(&self, topic: &str, payload: &Value) -> usize {
        let callbacks: Vec<Rc<RefCell<Callback>>> = {
            let inner = self.inner.borrow();
            inner.topics.get(topic).map_or_else(Vec::new, |subs| {
                subs.iter().map(|r| Rc::clone(&r.callback)).collect()
            })
        };

        let mut delivered = 0_usize;
        for callback in callbacks {
            let Ok(mut handler) = callback.try_borrow_mut() else {
                warn!(topic, "skipping subscriber already running in this dispatch");
                continue;
            };
            if let Err(err) = handler(payload) {
                warn!(topic, error = %err, "subscriber failed; continuing delivery");
            }
            delivered = delivered.wrapping_add(1);
        }
        delivered
    }

    /// Serialize a typed payload and publish it.
    ///
    /// A payload that fails to serialize (a programming error, not a
    /// runtime condition) is logged and dropped; delivery count is 0.
    pub fn publish_typed<T: serde::Serialize>(&self, topic: &str, value: &T) -> usize {
        match serde_json::to_value(value) {
            Ok(payload) => self.publish(topic, &payload),
            Err(err) => {
                warn!(topic, error = %err, "failed to encode payload; event dropped");
                0
            }
        }
    }

    /// Number of live subscriptions on a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .borrow()
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("topics", &inner.topics.len())
            .finish()
    }
}

/// Handle to one registration on the bus.
///
/// `unsubscribe` is idempotent and stays safe after the bus itself has
/// been dropped (the handle only holds a weak back-reference).
#[derive(Debug)]
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    topic: String,
    id: u64,
}

impl Subscription {
    /// Remove the handler from the bus. Safe to call repeatedly, during
    /// dispatch, or after the bus has been torn down.
    pub fn unsubscribe(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.borrow_mut();
            if let Some(subs) = inner.topics.get_mut(&self.topic) {
                subs.retain(|r| r.id != self.id);
            }
            debug!(topic = %self.topic, id = self.id, "unsubscribed");
        }
        // Later calls become no-ops even while the bus is alive.
        self.inner = Weak::new();
    }

    /// Whether this subscription has not yet been unsubscribed and the
    /// bus is still alive.
    pub fn is_active(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// The topic this subscription was registered on.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

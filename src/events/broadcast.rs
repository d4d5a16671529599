// events/broadcast.rs
//
// Favorites change broadcaster.
//
// DESIGN PRINCIPLES:
// 1. Minimal - an observer list, not a reactive framework
// 2. Deterministic - handlers execute in registration order
// 3. Observable - every emission is logged
// 4. Disposable - subscribe returns a handle; dropping it unregisters
// 5. No magic - explicit, straightforward code

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::FavoriteRecord;

/// Where subscriber notifications run.
///
/// The broadcaster hands the whole delivery to this context. The default
/// [`InlineDelivery`] runs it synchronously on the emitting thread; a UI
/// shell can substitute a context that marshals onto its main thread.
pub trait DeliveryContext: Send + Sync {
    fn deliver(&self, notify: Box<dyn FnOnce() + Send>);
}

/// Synchronous delivery on the caller's thread.
pub struct InlineDelivery;

impl DeliveryContext for InlineDelivery {
    fn deliver(&self, notify: Box<dyn FnOnce() + Send>) {
        notify();
    }
}

/// Subscriber callback, invoked with the full deduplicated favorite set
type SubscriberFn = Arc<dyn Fn(&[FavoriteRecord]) + Send + Sync>;

/// Registered handlers, in registration order
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, SubscriberFn)>,
}

impl Registry {
    fn is_registered(&self, id: u64) -> bool {
        self.handlers.iter().any(|(hid, _)| *hid == id)
    }
}

/// The favorites broadcaster
///
/// Push-delivers the current favorite set to every active subscriber.
/// Fire-and-forget: the emitter does not wait for acknowledgement, and a
/// panicking handler does not prevent delivery to later handlers.
pub struct FavoritesBroadcaster {
    registry: Arc<Mutex<Registry>>,
    delivery: Arc<dyn DeliveryContext>,
}

impl FavoritesBroadcaster {
    pub fn new() -> Self {
        Self::with_delivery(Arc::new(InlineDelivery))
    }

    pub fn with_delivery(delivery: Arc<dyn DeliveryContext>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
            delivery,
        }
    }

    /// Register a handler. Handlers are executed in the order they are
    /// subscribed. The returned handle unregisters on drop or [`Subscription::cancel`].
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&[FavoriteRecord]) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
            active: true,
        }
    }

    /// Emit the current favorite set to all active subscribers
    pub fn emit(&self, favorites: &[FavoriteRecord]) {
        let handlers: Vec<(u64, SubscriberFn)> = self.registry.lock().unwrap().handlers.clone();

        log::debug!(
            "broadcasting {} favorites to {} subscribers",
            favorites.len(),
            handlers.len()
        );

        self.dispatch(handlers, favorites.to_vec());
    }

    /// Emit to a single subscriber (initial snapshot on subscribe)
    pub fn emit_to(&self, subscription: &Subscription, favorites: &[FavoriteRecord]) {
        let handler = {
            let registry = self.registry.lock().unwrap();
            registry
                .handlers
                .iter()
                .find(|(hid, _)| *hid == subscription.id)
                .cloned()
        };

        if let Some(entry) = handler {
            self.dispatch(vec![entry], favorites.to_vec());
        }
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().unwrap().handlers.len()
    }

    fn dispatch(&self, handlers: Vec<(u64, SubscriberFn)>, favorites: Vec<FavoriteRecord>) {
        let registry = Arc::downgrade(&self.registry);

        self.delivery.deliver(Box::new(move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };

            for (id, handler) in handlers {
                // A subscription cancelled between emit and delivery must
                // not be invoked. Checked per handler, outside the lock,
                // so handlers may themselves subscribe or cancel.
                let still_active = registry.lock().unwrap().is_registered(id);
                if !still_active {
                    continue;
                }

                // Catch panics to prevent one handler from breaking others
                let result = catch_unwind(AssertUnwindSafe(|| handler(&favorites)));
                if let Err(e) = result {
                    log::error!("favorites subscriber {} panicked: {:?}", id, e);
                }
            }
        }));
    }
}

impl Default for FavoritesBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for an active subscription
///
/// Unregisters its handler when cancelled or dropped. Cancellation is
/// idempotent and prevents any further delivery to the handler; it does
/// not interrupt a delivery already in progress to other handlers.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap();
            registry.handlers.retain(|(hid, _)| *hid != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

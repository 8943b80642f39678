//=========================================================================
// Event Channels
//=========================================================================
//
// Synchronous, in-process publish/subscribe streams.
//
// Architecture:
//   subscribe(handler) → SubscriptionId
//   emit(&payload)     → every live handler, in subscription order
//   unsubscribe(id)    → handler is never invoked again
//
// Delivery happens inside `emit`; nothing is persisted. All methods take
// `&self`, so handlers may subscribe, unsubscribe or emit while a delivery
// is in progress. An emit on a channel that is already delivering is
// queued and delivered to every subscriber once the current payload has
// reached all of them, so subscribers see payloads in emit order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use log::trace;

//=== SubscriptionId ======================================================

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

//=== EventChannel ========================================================

type Handler<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// A single notification stream carrying payloads of type `T`.
///
/// Use `EventChannel<()>` for payload-less signals.
pub struct EventChannel<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
    delivering: Cell<bool>,
    queued: RefCell<VecDeque<T>>,
}

impl<T> EventChannel<T> {
    /// Creates a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            delivering: Cell::new(false),
            queued: RefCell::new(VecDeque::new()),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Adds a handler and returns its subscription handle.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let handler: Handler<T> = Rc::new(RefCell::new(handler));
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Removes a handler. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(sub, _)| *sub == id) {
            Some(pos) => {
                handlers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns true if `id` is still subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.handlers.borrow().iter().any(|(sub, _)| *sub == id)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    //--- Delivery ---------------------------------------------------------

    fn deliver(&self, payload: &T) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler<T>)> = self
            .handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            (&mut *handler.borrow_mut())(payload);
            delivered += 1;
        }
        delivered
    }
}

impl<T: Clone> EventChannel<T> {
    /// Delivers `payload` to every subscriber and returns how many ran.
    ///
    /// The subscriber list is snapshotted first. A handler unsubscribed by an
    /// earlier handler in the same delivery is skipped; a handler subscribed
    /// during delivery first runs on the next payload.
    ///
    /// Called from inside one of this channel's handlers, the payload is
    /// queued behind the one being delivered and this returns 0. The outer
    /// call's count includes the queued deliveries.
    pub fn emit(&self, payload: &T) -> usize {
        if self.delivering.get() {
            trace!("Queueing nested emit behind the current delivery");
            self.queued.borrow_mut().push_back(payload.clone());
            return 0;
        }

        // Leftovers from a delivery that panicked.
        self.queued.borrow_mut().clear();

        let _guard = DeliveryGuard::enter(&self.delivering);
        let mut delivered = self.deliver(payload);
        loop {
            let next = self.queued.borrow_mut().pop_front();
            match next {
                Some(next) => delivered += self.deliver(&next),
                None => break,
            }
        }
        delivered
    }
}

/// Clears the delivering flag even if a handler panics.
struct DeliveryGuard<'a>(&'a Cell<bool>);

impl<'a> DeliveryGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

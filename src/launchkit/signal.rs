//! Single-threaded notification channel.
//!
//! A [`Signal`] keeps an ordered list of handlers. [`Signal::emit`] calls
//! every handler registered at the moment of emission, in registration order,
//! synchronously. Connecting returns a [`Subscription`] guard that removes the
//! handler when dropped.
//!
//! The handler list is snapshotted before dispatch, so a handler may connect,
//! disconnect, or trigger a nested emission without tripping a `RefCell`
//! borrow. A handler dropped mid-emission still sees the emission in flight
//! and none after it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<A> = Rc<dyn Fn(&A)>;

struct SignalInner<A> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler<A>)>>,
}

/// Cloning a `Signal` yields another handle to the same handler list.
pub struct Signal<A> {
    inner: Rc<SignalInner<A>>,
}

impl<A> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            inner: Rc::new(SignalInner {
                next_id: Cell::new(0),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<A> Signal<A> {
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

impl<A: 'static> Signal<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, handler: impl Fn(&A) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));

        let weak: Weak<SignalInner<A>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
            }
        })
    }

    pub fn emit(&self, arg: &A) {
        let snapshot: Vec<Handler<A>> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            handler(arg);
        }
    }
}

/// RAII guard returned by [`Signal::connect`].
#[must_use = "dropping a Subscription disconnects its handler"]
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(disconnect: impl FnOnce() + 'static) -> Self {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }

    /// A guard that owns nothing.
    pub fn empty() -> Self {
        Self { disconnect: None }
    }

    /// Keep the handler connected for the lifetime of the signal.
    pub fn detach(mut self) {
        self.disconnect = None;
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disconnect.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_run_in_registration_order() {
        let signal: Signal<u32> = Signal::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = signal.connect(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = signal.connect(move |v| l2.borrow_mut().push(("b", *v)));

        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn debug_shows_handler_count() {
        let signal: Signal<String> = Signal::new();
        let _sub = signal.connect(|_| {});
        assert_eq!(format!("{signal:?}"), "Signal { handlers: 1 }");
    }

    #[test]
    fn dropping_subscription_disconnects() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let sub = signal.connect(move |_| h.set(h.get() + 1));
        signal.emit(&());
        drop(sub);
        signal.emit(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn detached_subscription_stays_connected() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        signal.connect(move |_| h.set(h.get() + 1)).detach();
        signal.emit(&());
        signal.emit(&());

        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn handler_may_connect_during_emission() {
        let signal: Signal<()> = Signal::new();
        let late = Rc::new(RefCell::new(Vec::new()));

        let s = signal.clone();
        let l = Rc::clone(&late);
        let _outer = signal.connect(move |_| {
            let l = Rc::clone(&l);
            l.borrow_mut().push(s.connect(|_| {}));
        });

        signal.emit(&());
        assert_eq!(signal.handler_count(), 2);
    }

    #[test]
    fn subscription_outliving_signal_is_harmless() {
        let signal: Signal<()> = Signal::new();
        let sub = signal.connect(|_| {});
        drop(signal);
        drop(sub);
    }
}

//! # Attributes
//!
//! An [`Attribute`] is a typed observable cell: a value plus a [`Status`]
//! (active, inactive, hidden). Tiles expose everything a view needs to draw
//! them as attributes, and views subscribe instead of polling.
//!
//! ## Change suppression
//!
//! `set_value` and `set_status` only notify when the new state differs from
//! the old one (`PartialEq`). Binding graphs that loop back on themselves
//! settle as soon as a pass produces no difference.
//!
//! ## Ownership
//!
//! `Attribute<T>` is a handle over `Rc` storage. The component that creates an
//! attribute keeps the first handle; [`Control`](crate::control::Control)s
//! clone it. The value's type is fixed by `T`, so writing a value of the wrong
//! type does not compile.

use crate::signal::{Signal, Subscription};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ATTR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an attribute cell (shared by all its handles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Hidden,
}

impl Status {
    pub fn is_visible(self) -> bool {
        self != Status::Hidden
    }
}

struct AttrInner<T> {
    id: AttrId,
    value: RefCell<T>,
    status: Cell<Status>,
    value_changed: Signal<T>,
    status_changed: Signal<Status>,
}

pub struct Attribute<T> {
    inner: Rc<AttrInner<T>>,
}

impl<T> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .field("status", &self.inner.status.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Attribute<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Attribute<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(AttrInner {
                id: AttrId(NEXT_ATTR_ID.fetch_add(1, Ordering::Relaxed)),
                value: RefCell::new(value),
                status: Cell::new(Status::Active),
                value_changed: Signal::new(),
                status_changed: Signal::new(),
            }),
        }
    }

    pub fn id(&self) -> AttrId {
        self.inner.id
    }

    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn status(&self) -> Status {
        self.inner.status.get()
    }

    /// Replace the value. Returns `true` and notifies subscribers only if the
    /// value changed.
    pub fn set_value(&self, value: T) -> bool {
        if *self.inner.value.borrow() == value {
            return false;
        }
        let snapshot = value.clone();
        *self.inner.value.borrow_mut() = value;
        self.inner.value_changed.emit(&snapshot);
        true
    }

    pub fn set_status(&self, status: Status) -> bool {
        if self.inner.status.get() == status {
            return false;
        }
        self.inner.status.set(status);
        self.inner.status_changed.emit(&status);
        true
    }

    pub fn connect_value_changed(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        self.inner.value_changed.connect(handler)
    }

    pub fn connect_status_changed(&self, handler: impl Fn(&Status) + 'static) -> Subscription {
        self.inner.status_changed.connect(handler)
    }

    pub fn downgrade(&self) -> WeakAttribute<T> {
        WeakAttribute {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle, used by handlers that must not keep a cell alive.
pub struct WeakAttribute<T> {
    inner: Weak<AttrInner<T>>,
}

impl<T> Clone for WeakAttribute<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakAttribute<T> {
    pub fn upgrade(&self) -> Option<Attribute<T>> {
        self.inner.upgrade().map(|inner| Attribute { inner })
    }
}

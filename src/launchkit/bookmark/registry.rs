use super::kind::StoreKind;
use super::store::{BookmarkStore, StoreEnv};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// One shared store per kind.
///
/// The registry only holds weak references: a store lives as long as some
/// caller keeps its `Rc`, and the next `get` after the last one drops opens
/// a fresh instance from disk.
pub struct StoreRegistry {
    env: StoreEnv,
    stores: RefCell<HashMap<StoreKind, Weak<BookmarkStore>>>,
}

impl StoreRegistry {
    pub fn new(env: StoreEnv) -> Self {
        Self {
            env,
            stores: RefCell::new(HashMap::new()),
        }
    }

    pub fn env(&self) -> &StoreEnv {
        &self.env
    }

    pub fn get(&self, kind: StoreKind) -> Rc<BookmarkStore> {
        if let Some(store) = self.stores.borrow().get(&kind).and_then(Weak::upgrade) {
            return store;
        }
        tracing::debug!(kind = %kind, "opening store");
        let store = BookmarkStore::open(kind, self.env.clone());
        self.stores
            .borrow_mut()
            .insert(kind, Rc::downgrade(&store));
        store
    }

    pub fn is_live(&self, kind: StoreKind) -> bool {
        self.stores
            .borrow()
            .get(&kind)
            .is_some_and(|w| w.strong_count() > 0)
    }
}

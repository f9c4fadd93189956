//! Tile models.
//!
//! A tile is a handful of [`Attribute`]s plus the [`Control`]s that keep
//! them derived from the facts they depend on. Whatever draws the tile
//! subscribes to those attributes; nothing here renders.

use crate::attribute::{Attribute, Status};
use crate::bookmark::{BookmarkItem, BookmarkStore};
use crate::control::Control;
use crate::error::Result;
use crate::network::ActiveLink;
use crate::signal::Subscription;
use std::rc::Rc;

pub const ADD_FAVORITE: &str = "Add to Favorites";
pub const REMOVE_FAVORITE: &str = "Remove from Favorites";

/// The favorite toggle on an application tile.
///
/// `pinned` follows the uri's membership in the store; `action` is the menu
/// label derived from it, inactive while the store refuses writes.
pub struct FavoriteTile {
    uri: String,
    store: Rc<BookmarkStore>,
    pinned: Attribute<bool>,
    action: Attribute<String>,
    _label: Control<bool, String>,
    _subscriptions: Vec<Subscription>,
}

impl FavoriteTile {
    pub fn new(uri: impl Into<String>, store: Rc<BookmarkStore>) -> Self {
        let uri = uri.into();
        let pinned = Attribute::new(store.has(&uri));
        let action = Attribute::default();

        let label = Control::map(&pinned, &action, |pinned| {
            let text = if *pinned { REMOVE_FAVORITE } else { ADD_FAVORITE };
            text.to_string()
        });
        refresh_action_status(&action, &store);

        let weak = Rc::downgrade(&store);
        let on_items = {
            let (weak, pinned, uri) = (weak.clone(), pinned.downgrade(), uri.clone());
            store.connect_items_changed(move |_| {
                if let (Some(store), Some(pinned)) = (weak.upgrade(), pinned.upgrade()) {
                    pinned.set_value(store.has(&uri));
                }
            })
        };
        let on_location = {
            let action = action.downgrade();
            store.connect_location_changed(move |_| {
                if let (Some(store), Some(action)) = (weak.upgrade(), action.upgrade()) {
                    refresh_action_status(&action, &store);
                }
            })
        };

        Self {
            uri,
            store,
            pinned,
            action,
            _label: label,
            _subscriptions: vec![on_items, on_location],
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn pinned(&self) -> &Attribute<bool> {
        &self.pinned
    }

    pub fn action(&self) -> &Attribute<String> {
        &self.action
    }

    /// Add or remove the uri. Returns whether it is pinned afterwards.
    pub fn toggle(&self) -> Result<bool> {
        if self.store.has(&self.uri) {
            self.store.remove(&self.uri)?;
        } else {
            self.store.add(BookmarkItem::new(self.uri.as_str()))?;
        }
        Ok(self.pinned.value())
    }
}

fn refresh_action_status(action: &Attribute<String>, store: &BookmarkStore) {
    let status = if store.is_writable() {
        Status::Active
    } else {
        Status::Inactive
    };
    action.set_status(status);
}

/// Label of the network tile, hidden while there is no link to report.
pub struct NetworkTile {
    link: Attribute<Option<ActiveLink>>,
    label: Attribute<String>,
    _label: Control<Option<ActiveLink>, String>,
}

impl NetworkTile {
    pub fn new(link: &Attribute<Option<ActiveLink>>) -> Self {
        let label = Attribute::default();
        let control = Control::bind(link, &label, |src, dst| match src.value() {
            Some(link) => {
                dst.set_value(format!("{}: {}", link.kind, link.interface));
                dst.set_status(Status::Active);
            }
            None => {
                dst.set_value(String::new());
                dst.set_status(Status::Hidden);
            }
        });
        Self {
            link: link.clone(),
            label,
            _label: control,
        }
    }

    pub fn link(&self) -> &Attribute<Option<ActiveLink>> {
        &self.link
    }

    pub fn label(&self) -> &Attribute<String> {
        &self.label
    }
}

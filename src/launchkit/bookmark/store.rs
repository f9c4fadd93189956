//! # Bookmark Store
//!
//! A [`BookmarkStore`] is the in-memory view of one store file: an ordered
//! list of [`BookmarkItem`]s with unique URIs.
//!
//! ## Reload, never patch
//!
//! Any file event triggers a full reload. The reloaded URI order is compared
//! with the current one and only a difference replaces the items and emits
//! items-changed. The store's own saves fire its own watch too; those reloads
//! find nothing new and stay silent.
//!
//! ## Writes
//!
//! Mutations build the new item list, then [`commit`](BookmarkStore::save)
//! it: resolve the write location, merge with whatever is on disk there,
//! rewrite every rank group from the list order, write a temp file and rename
//! it into place. Only a successful write replaces the in-memory state.
//!
//! ## Failure modes
//!
//! - Unparsable file on reload: previous items kept, error logged and
//!   returned.
//! - Unparsable file on first load: empty store that refuses writes until a
//!   reload succeeds, so a broken user file is never overwritten blindly.
//! - Rank corruption: logged, resolved by falling back to file order.

use super::codec::BookmarkCodec;
use super::item::BookmarkItem;
use super::kind::StoreKind;
use super::paths::{Resolution, StoreLocation, StorePaths};
use super::rank::{assign_ranks, recover_order};
use super::sentinel::{create_blank, file_uri, template_for};
use crate::error::{LaunchError, Result};
use crate::monitor::{FileMonitor, MonitorEvent, WatchId};
use crate::settings::SettingsSource;
use crate::signal::{Signal, Subscription};
use chrono::Utc;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Everything a store needs from the outside world.
#[derive(Clone)]
pub struct StoreEnv {
    pub paths: StorePaths,
    pub settings: Rc<dyn SettingsSource>,
    pub monitor: Rc<dyn FileMonitor>,
    pub codec: Rc<dyn BookmarkCodec>,
}

#[derive(Debug)]
struct StoreState {
    path: Option<PathBuf>,
    location: StoreLocation,
    items: Vec<BookmarkItem>,
    /// Set when the last load could not parse the file.
    degraded: bool,
}

struct Loaded {
    resolution: Option<Resolution>,
    items: Vec<BookmarkItem>,
}

pub struct BookmarkStore {
    kind: StoreKind,
    env: StoreEnv,
    self_ref: Weak<BookmarkStore>,
    state: RefCell<StoreState>,
    watches: RefCell<Vec<(PathBuf, WatchId)>>,
    items_changed: Signal<()>,
    location_changed: Signal<StoreLocation>,
    _policy: Subscription,
}

impl BookmarkStore {
    /// Load the store for `kind` and start watching its file.
    ///
    /// Prefer [`StoreRegistry::get`](super::StoreRegistry::get), which shares
    /// one instance per kind.
    pub fn open(kind: StoreKind, env: StoreEnv) -> Rc<Self> {
        let store = Rc::new_cyclic(|weak: &Weak<BookmarkStore>| {
            let on_policy = weak.clone();
            let policy = env.settings.subscribe(
                &kind.policy_key(),
                Box::new(move |_| {
                    if let Some(store) = on_policy.upgrade() {
                        tracing::debug!(kind = %store.kind, "store policy changed");
                        let _ = store.reload();
                    }
                }),
            );
            let modifiable = env.settings.get_bool(&kind.policy_key(), true);
            BookmarkStore {
                kind,
                self_ref: weak.clone(),
                state: RefCell::new(StoreState {
                    path: None,
                    location: initial_location(modifiable),
                    items: Vec::new(),
                    degraded: false,
                }),
                watches: RefCell::new(Vec::new()),
                items_changed: Signal::new(),
                location_changed: Signal::new(),
                _policy: policy,
                env,
            }
        });

        if let Err(e) = store.reload() {
            tracing::warn!(kind = %kind, error = %e, "starting with an empty store");
            store.state.borrow_mut().degraded = true;
        }
        store.rewatch();
        store
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn items(&self) -> Vec<BookmarkItem> {
        self.state.borrow().items.clone()
    }

    pub fn uris(&self) -> Vec<String> {
        self.state
            .borrow()
            .items
            .iter()
            .map(|i| i.uri.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has(&self, uri: &str) -> bool {
        self.state.borrow().items.iter().any(|i| i.uri == uri)
    }

    pub fn get(&self, uri: &str) -> Option<BookmarkItem> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|i| i.uri == uri)
            .cloned()
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.state.borrow().path.clone()
    }

    pub fn location(&self) -> StoreLocation {
        self.state.borrow().location
    }

    /// Whether mutations may be persisted right now.
    pub fn is_writable(&self) -> bool {
        self.user_modifiable() && !self.state.borrow().degraded
    }

    pub fn connect_items_changed(&self, handler: impl Fn(&()) + 'static) -> Subscription {
        self.items_changed.connect(handler)
    }

    pub fn connect_location_changed(
        &self,
        handler: impl Fn(&StoreLocation) + 'static,
    ) -> Subscription {
        self.location_changed.connect(handler)
    }

    /// Re-read the backing file. Returns whether the item order changed.
    pub fn reload(&self) -> Result<bool> {
        let loaded = match self.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "reload failed, keeping current items");
                return Err(e);
            }
        };

        let mut items = loaded.items;
        let mut resolution = loaded.resolution;
        let modifiable = self.user_modifiable();
        if modifiable {
            if let Some(written) = self.migrate_sentinels(&mut items) {
                resolution = Some(written);
            }
        }

        let (order_changed, location) = {
            let mut state = self.state.borrow_mut();
            let order_changed = !same_order(&state.items, &items);
            if order_changed {
                state.items = items;
            }
            let new_location = resolution
                .as_ref()
                .map(|r| r.location)
                .unwrap_or_else(|| initial_location(modifiable));
            let location = (state.location != new_location).then_some(new_location);
            state.location = new_location;
            state.path = resolution.map(|r| r.path);
            state.degraded = false;
            (order_changed, location)
        };

        tracing::debug!(kind = %self.kind, order_changed, "store reloaded");
        self.rewatch();
        if let Some(location) = location {
            self.location_changed.emit(&location);
        }
        if order_changed {
            self.items_changed.emit(&());
        }
        Ok(order_changed)
    }

    /// Insert `item` at the end, or update the existing record with the same
    /// URI. Fields left unset on `item` are not touched on update.
    pub fn add(&self, item: BookmarkItem) -> Result<()> {
        let mut item = item;
        if item.modified.is_none() {
            item.modified = Some(Utc::now());
        }

        let mut items = self.items();
        match items.iter_mut().find(|i| i.uri == item.uri) {
            Some(existing) => existing.apply_update(&item),
            None => items.push(item),
        }
        self.commit(items)
    }

    /// Returns `false` when the URI was not in the store.
    pub fn remove(&self, uri: &str) -> Result<bool> {
        let mut items = self.items();
        let before = items.len();
        items.retain(|i| i.uri != uri);
        if items.len() == before {
            return Ok(false);
        }
        self.commit(items)?;
        Ok(true)
    }

    /// Put the listed URIs first, in the given order. Items not listed keep
    /// their relative order after them; unknown URIs are ignored.
    pub fn reorder<S: AsRef<str>>(&self, uris: &[S]) -> Result<()> {
        let current = self.items();
        let mut by_uri: HashMap<&str, &BookmarkItem> =
            current.iter().map(|i| (i.uri.as_str(), i)).collect();

        let mut ordered = Vec::with_capacity(current.len());
        for uri in uris {
            if let Some(item) = by_uri.remove(uri.as_ref()) {
                ordered.push(item.clone());
            }
        }
        let placed: HashSet<String> = ordered.iter().map(|i| i.uri.clone()).collect();
        ordered.extend(current.iter().filter(|i| !placed.contains(&i.uri)).cloned());

        self.commit(ordered)
    }

    /// Write the current items back to disk.
    pub fn save(&self) -> Result<()> {
        self.commit(self.items())
    }

    fn commit(&self, mut items: Vec<BookmarkItem>) -> Result<()> {
        if !self.user_modifiable() {
            return Err(LaunchError::ReadOnly(self.kind));
        }
        if self.state.borrow().degraded {
            return Err(LaunchError::Persist {
                path: self.path().unwrap_or_default(),
                message: "store file could not be parsed; refusing to overwrite it".into(),
            });
        }

        let resolution = self.persist(&mut items)?;

        let (order_changed, location) = {
            let mut state = self.state.borrow_mut();
            let order_changed = !same_order(&state.items, &items);
            let location =
                (state.location != resolution.location).then_some(resolution.location);
            state.items = items;
            state.location = resolution.location;
            state.path = Some(resolution.path);
            (order_changed, location)
        };

        tracing::debug!(kind = %self.kind, order_changed, "store saved");
        self.rewatch();
        if let Some(location) = location {
            self.location_changed.emit(&location);
        }
        if order_changed {
            self.items_changed.emit(&());
        }
        Ok(())
    }

    /// Resolve for writing, merge with the file there, rank and write.
    fn persist(&self, items: &mut [BookmarkItem]) -> Result<Resolution> {
        let resolution = self
            .env
            .paths
            .resolve(self.kind.file_name(), true, true)
            .map_err(|e| LaunchError::Persist {
                path: self.env.paths.user_path(self.kind.file_name()),
                message: e.to_string(),
            })?
            .ok_or(LaunchError::NoLocation(self.kind))?;

        self.merge_with_disk(&resolution.path, items);
        assign_ranks(items);
        let bytes = self.env.codec.serialize(items)?;
        if let Err(e) = write_atomic(&resolution.path, &bytes) {
            tracing::warn!(kind = %self.kind, path = %resolution.path.display(), error = %e, "save failed");
            return Err(LaunchError::Persist {
                path: resolution.path,
                message: e.to_string(),
            });
        }
        Ok(resolution)
    }

    fn load(&self) -> Result<Loaded> {
        let resolution =
            self.env
                .paths
                .resolve(self.kind.file_name(), self.user_modifiable(), false)?;
        let Some(resolution) = resolution else {
            return Ok(Loaded {
                resolution: None,
                items: Vec::new(),
            });
        };

        let records = self.read_records(&resolution.path)?.unwrap_or_default();
        let records = dedupe(self.kind, records);
        let (items, issues) = recover_order(records);
        for issue in issues.iter().filter(|i| i.is_corruption()) {
            tracing::warn!(kind = %self.kind, ?issue, "store corruption, using file order");
        }
        Ok(Loaded {
            resolution: Some(resolution),
            items,
        })
    }

    /// `Ok(None)` when the file does not exist.
    fn read_records(&self, path: &Path) -> Result<Option<Vec<BookmarkItem>>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LaunchError::Io(e)),
        };
        self.env
            .codec
            .parse(&bytes)
            .map(Some)
            .map_err(|e| LaunchError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn merge_with_disk(&self, path: &Path, items: &mut [BookmarkItem]) {
        let previous = match self.read_records(path) {
            Ok(Some(records)) => records,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "not merging with unreadable file");
                return;
            }
        };
        let previous: HashMap<&str, &BookmarkItem> =
            previous.iter().map(|i| (i.uri.as_str(), i)).collect();
        for item in items.iter_mut() {
            if let Some(old) = previous.get(item.uri.as_str()) {
                item.merge_from(old);
            }
        }
    }

    /// Swap placeholders for fresh blank files and write the result.
    ///
    /// The new URIs are kept only once they are on disk. If the write fails
    /// the blank files are removed again and `items` stays as loaded, so the
    /// next reload sees the same placeholders and nothing piles up.
    fn migrate_sentinels(&self, items: &mut Vec<BookmarkItem>) -> Option<Resolution> {
        let mut migrated = items.clone();
        let created = self.materialize_sentinels(&mut migrated);
        if created.is_empty() {
            return None;
        }

        match self.persist(&mut migrated) {
            Ok(resolution) => {
                *items = migrated;
                Some(resolution)
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "could not persist migrated placeholders");
                for path in created {
                    if let Err(e) = fs::remove_file(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "could not remove blank file");
                    }
                }
                None
            }
        }
    }

    /// Returns the files created.
    fn materialize_sentinels(&self, items: &mut [BookmarkItem]) -> Vec<PathBuf> {
        let mut created = Vec::new();
        for item in items.iter_mut() {
            let Some(template) = template_for(&item.uri) else {
                continue;
            };
            match create_blank(&self.env.paths.documents_dir, template) {
                Ok(path) => {
                    let uri = file_uri(&path);
                    tracing::info!(kind = %self.kind, from = %item.uri, to = %uri, "materialized placeholder");
                    item.uri = uri;
                    item.mime_type.get_or_insert_with(|| template.mime_type.to_string());
                    created.push(path);
                }
                Err(e) => {
                    tracing::warn!(kind = %self.kind, uri = %item.uri, error = %e, "could not create blank file");
                }
            }
        }
        created
    }

    fn user_modifiable(&self) -> bool {
        self.env.settings.get_bool(&self.kind.policy_key(), true)
    }

    /// Watch the resolved file and, when users may edit, the user copy too so
    /// its creation is noticed.
    fn rewatch(&self) {
        let mut targets = Vec::new();
        if let Some(path) = self.path() {
            targets.push(path);
        }
        if self.user_modifiable() {
            let user = self.env.paths.user_path(self.kind.file_name());
            if !targets.contains(&user) {
                targets.push(user);
            }
        }

        let mut watches = self.watches.borrow_mut();
        let current: Vec<&PathBuf> = watches.iter().map(|(p, _)| p).collect();
        if current.len() == targets.len() && targets.iter().all(|t| current.contains(&t)) {
            return;
        }

        for (_, id) in watches.drain(..) {
            self.env.monitor.unwatch(id);
        }
        for target in targets {
            let weak = self.self_ref.clone();
            let id = self.env.monitor.watch(
                &target,
                Box::new(move |event: MonitorEvent| {
                    if let Some(store) = weak.upgrade() {
                        tracing::debug!(kind = %store.kind, ?event, "store file event");
                        let _ = store.reload();
                    }
                }),
            );
            watches.push((target, id));
        }
    }
}

impl Drop for BookmarkStore {
    fn drop(&mut self) {
        for (_, id) in self.watches.get_mut().drain(..) {
            self.env.monitor.unwatch(id);
        }
    }
}

fn initial_location(modifiable: bool) -> StoreLocation {
    if modifiable {
        StoreLocation::Default
    } else {
        StoreLocation::DefaultOnly
    }
}

fn same_order(a: &[BookmarkItem], b: &[BookmarkItem]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.uri == y.uri)
}

fn dedupe(kind: StoreKind, records: Vec<BookmarkItem>) -> Vec<BookmarkItem> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.uri.clone());
            if !fresh {
                tracing::warn!(kind = %kind, uri = %r.uri, "duplicate record dropped");
            }
            fresh
        })
        .collect()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("store");
    let tmp = dir.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

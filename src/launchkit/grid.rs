//! A [`Table`] backed by a [`BookmarkStore`].
//!
//! The store is the source of truth. Its items-changed feeds the table; drags
//! on the table write back through the store, whose own notification then
//! reaches the table with an order it already has and is suppressed there.
//!
//! [`BookmarkGrid::with_settings`] takes its layout from the `columns`,
//! `item-limit` and `discipline` settings and keeps following them.

use crate::bookmark::{BookmarkItem, BookmarkStore};
use crate::config::{LaunchConfig, COLUMNS_KEY, DISCIPLINE_KEY, ITEM_LIMIT_KEY};
use crate::error::Result;
use crate::settings::{SettingValue, SettingsSource};
use crate::signal::Subscription;
use crate::table::{DropOutcome, ReorderDiscipline, Table};
use std::rc::Rc;

pub struct BookmarkGrid {
    store: Rc<BookmarkStore>,
    table: Rc<Table<BookmarkItem>>,
    _items_changed: Subscription,
    tunables: Vec<Subscription>,
}

impl BookmarkGrid {
    pub fn new(
        store: Rc<BookmarkStore>,
        columns: usize,
        limit: i64,
        discipline: ReorderDiscipline,
    ) -> Self {
        let table = Rc::new(Table::new(columns).with_discipline(discipline));
        table.set_limit(limit);
        table.set_items(store.items());

        let weak_table = Rc::downgrade(&table);
        let weak_store = Rc::downgrade(&store);
        let subscription = store.connect_items_changed(move |_| {
            if let (Some(table), Some(store)) = (weak_table.upgrade(), weak_store.upgrade()) {
                table.set_items(store.items());
            }
        });

        Self {
            store,
            table,
            _items_changed: subscription,
            tunables: Vec::new(),
        }
    }

    pub fn with_settings(store: Rc<BookmarkStore>, settings: &dyn SettingsSource) -> Self {
        let defaults = LaunchConfig::default();
        let columns = settings.get_int(COLUMNS_KEY, defaults.columns as i64);
        let limit = settings.get_int(ITEM_LIMIT_KEY, defaults.item_limit);
        let discipline = settings
            .get(DISCIPLINE_KEY)
            .and_then(|value| discipline_from(&value))
            .unwrap_or(defaults.discipline);

        let mut grid = Self::new(store, columns_from(columns), limit, discipline);

        let table = Rc::downgrade(&grid.table);
        grid.tunables.push(settings.subscribe(
            COLUMNS_KEY,
            Box::new(move |value: &SettingValue| {
                if let (Some(table), Some(n)) = (table.upgrade(), value.as_int()) {
                    table.set_columns(columns_from(n));
                }
            }),
        ));

        let table = Rc::downgrade(&grid.table);
        grid.tunables.push(settings.subscribe(
            ITEM_LIMIT_KEY,
            Box::new(move |value: &SettingValue| {
                if let (Some(table), Some(n)) = (table.upgrade(), value.as_int()) {
                    table.set_limit(n);
                }
            }),
        ));

        let table = Rc::downgrade(&grid.table);
        grid.tunables.push(settings.subscribe(
            DISCIPLINE_KEY,
            Box::new(move |value: &SettingValue| {
                if let (Some(table), Some(discipline)) = (table.upgrade(), discipline_from(value)) {
                    table.set_discipline(discipline);
                }
            }),
        ));

        grid
    }

    pub fn table(&self) -> &Rc<Table<BookmarkItem>> {
        &self.table
    }

    pub fn store(&self) -> &Rc<BookmarkStore> {
        &self.store
    }

    /// Drop `uri` on `bin` and persist the result.
    ///
    /// A URI the store does not know yet is added and placed on `bin`. When
    /// the store refuses the write, the table falls back to the store order.
    pub fn drop_uri(&self, uri: &str, bin: usize) -> Result<DropOutcome<BookmarkItem>> {
        let outcome = self.table.drop_on_bin(uri, bin);
        let persisted = match &outcome {
            DropOutcome::Reordered(order) => {
                let uris: Vec<&str> = order.iter().map(|i| i.uri.as_str()).collect();
                self.store.reorder(&uris)
            }
            DropOutcome::UriAdded(added) => self.adopt(&added.uri, added.bin),
            DropOutcome::Unchanged | DropOutcome::Ignored => Ok(()),
        };

        if let Err(e) = persisted {
            tracing::warn!(uri, bin, error = %e, "drop not persisted");
            self.table.set_items(self.store.items());
            return Err(e);
        }
        Ok(outcome)
    }

    fn adopt(&self, uri: &str, bin: usize) -> Result<()> {
        self.store.add(BookmarkItem::new(uri))?;
        let mut uris = self.store.uris();
        let Some(source) = uris.iter().position(|u| u == uri) else {
            return Ok(());
        };
        let target = bin.min(self.table.occupied_bins().saturating_sub(1));
        crate::table::reorder(&mut uris, source, target, ReorderDiscipline::PushPull);
        self.store.reorder(&uris)
    }
}

fn columns_from(n: i64) -> usize {
    usize::try_from(n).unwrap_or(1).max(1)
}

fn discipline_from(value: &SettingValue) -> Option<ReorderDiscipline> {
    let raw = value.as_str()?;
    match raw.parse() {
        Ok(discipline) => Some(discipline),
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "ignoring reorder discipline setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::StoreKind;
    use crate::error::LaunchError;
    use crate::settings::{SettingValue, SettingsSource};
    use crate::test_utils::TestEnv;

    fn seeded(env: &TestEnv, uris: &[&str]) -> Rc<BookmarkStore> {
        let store = env.open(StoreKind::UserApps);
        for uri in uris {
            store.add(BookmarkItem::new(*uri)).unwrap();
        }
        store
    }

    fn table_uris(grid: &BookmarkGrid) -> Vec<String> {
        grid.table().items().iter().map(|i| i.uri.clone()).collect()
    }

    #[test]
    fn drag_persists_new_order() {
        let env = TestEnv::new();
        let store = seeded(&env, &["1", "2", "3", "4"]);
        let grid = BookmarkGrid::new(store.clone(), 2, -1, ReorderDiscipline::PushPull);

        let outcome = grid.drop_uri("1", 2).unwrap();
        assert!(matches!(outcome, DropOutcome::Reordered(_)));
        assert_eq!(store.uris(), vec!["2", "3", "1", "4"]);

        let reopened = env.open(StoreKind::UserApps);
        assert_eq!(reopened.uris(), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn store_echo_does_not_retrigger_table() {
        let env = TestEnv::new();
        let store = seeded(&env, &["a", "b", "c"]);
        let grid = BookmarkGrid::new(store.clone(), 3, -1, ReorderDiscipline::Swap);

        let tiles = Rc::new(std::cell::Cell::new(0));
        let t = Rc::clone(&tiles);
        let _sub = grid.table().connect_tiles_changed(move |_| t.set(t.get() + 1));

        grid.drop_uri("a", 2).unwrap();
        env.monitor.poll();
        assert_eq!(tiles.get(), 1);
    }

    #[test]
    fn external_edit_reaches_table() {
        let env = TestEnv::new();
        let store = seeded(&env, &["a", "b"]);
        let grid = BookmarkGrid::new(store.clone(), 2, -1, ReorderDiscipline::PushPull);

        store.reorder(&["b", "a"]).unwrap();
        assert_eq!(table_uris(&grid), vec!["b", "a"]);
    }

    #[test]
    fn foreign_uri_is_added_at_bin() {
        let env = TestEnv::new();
        let store = seeded(&env, &["a", "b", "c"]);
        let grid = BookmarkGrid::new(store.clone(), 2, -1, ReorderDiscipline::None);

        let outcome = grid.drop_uri("app://new", 1).unwrap();
        assert!(matches!(outcome, DropOutcome::UriAdded(_)));
        assert_eq!(store.uris(), vec!["a", "app://new", "b", "c"]);
        assert_eq!(table_uris(&grid), vec!["a", "app://new", "b", "c"]);
    }

    #[test]
    fn refused_write_restores_table() {
        let env = TestEnv::new();
        env.write_store(
            &env.system_file("applications.json"),
            &[("a", None), ("b", None)],
        );
        let store = seeded(&env, &["a", "b"]);
        let grid = BookmarkGrid::new(store.clone(), 2, -1, ReorderDiscipline::Swap);
        env.settings.set(
            &StoreKind::UserApps.policy_key(),
            SettingValue::Bool(false),
        );
        assert_eq!(table_uris(&grid), vec!["a", "b"]);

        let updates = Rc::new(std::cell::Cell::new(0));
        let u = Rc::clone(&updates);
        let _sub = grid.table().connect_update(move |_| u.set(u.get() + 1));

        let err = grid.drop_uri("a", 1).unwrap_err();
        assert!(matches!(err, LaunchError::ReadOnly(StoreKind::UserApps)));
        // the swap did reach the table before the store refused it
        assert_eq!(updates.get(), 1);
        assert_eq!(table_uris(&grid), vec!["a", "b"]);
        assert_eq!(store.uris(), vec!["a", "b"]);
    }

    #[test]
    fn layout_comes_from_settings() {
        let env = TestEnv::new();
        env.settings.set(COLUMNS_KEY, SettingValue::Int(3));
        env.settings.set(ITEM_LIMIT_KEY, SettingValue::Int(2));
        env.settings.set(DISCIPLINE_KEY, SettingValue::Str("swap".into()));
        let store = seeded(&env, &["a", "b", "c"]);

        let grid = BookmarkGrid::with_settings(store, &*env.settings);
        assert_eq!(grid.table().columns(), 3);
        assert_eq!(grid.table().occupied_bins(), 2);
        assert_eq!(grid.table().discipline(), ReorderDiscipline::Swap);
    }

    #[test]
    fn limit_setting_change_reaches_table() {
        let env = TestEnv::new();
        let store = seeded(&env, &["a", "b", "c"]);
        let grid = BookmarkGrid::with_settings(store, &*env.settings);
        assert_eq!(grid.table().occupied_bins(), 3);

        let tiles = Rc::new(std::cell::Cell::new(0));
        let t = Rc::clone(&tiles);
        let _sub = grid.table().connect_tiles_changed(move |_| t.set(t.get() + 1));

        env.settings.set(ITEM_LIMIT_KEY, SettingValue::Int(1));
        assert_eq!(grid.table().occupied_bins(), 1);
        assert_eq!(tiles.get(), 1);

        env.settings.set(DISCIPLINE_KEY, SettingValue::Str("bogus".into()));
        assert_eq!(grid.table().discipline(), ReorderDiscipline::PushPull);
        env.settings.set(DISCIPLINE_KEY, SettingValue::Str("none".into()));
        assert_eq!(grid.table().discipline(), ReorderDiscipline::None);
    }
}

//! # Tables
//!
//! A [`Table`] lays an ordered list of items out on a grid with a fixed
//! number of columns, filling bins row-major. With a limit set only the first
//! `limit` items occupy bins; the rest stay in the full order, invisible.
//!
//! Dropping an item on a bin produces a candidate order according to the
//! table's [`ReorderDiscipline`]:
//!
//! ```text
//! items [1,2,3,4], drag 1 onto bin 2
//!   Swap      [3,2,1,4]
//!   PushPull  [2,3,1,4]
//!   Push      [4,2,1,3]   (forward drags wrap the last item to the front)
//!   None      unchanged
//! ```
//!
//! The candidate is compared with the current order element by element. Only
//! a real change is adopted, followed by tiles-changed and then update. The
//! table never persists anything; whoever owns the backing store listens to
//! update (or inspects the returned [`DropOutcome`]) and writes the order
//! back.
//!
//! Dropping something that is not a member never reorders; it emits
//! uri-added so the owner can decide whether to adopt it.

use crate::error::LaunchError;
use crate::signal::{Signal, Subscription};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

/// Anything that can sit in a table bin.
pub trait Placeable {
    fn uri(&self) -> &str;
}

impl Placeable for String {
    fn uri(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReorderDiscipline {
    Swap,
    Push,
    #[default]
    PushPull,
    None,
}

impl fmt::Display for ReorderDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReorderDiscipline::Swap => "swap",
            ReorderDiscipline::Push => "push",
            ReorderDiscipline::PushPull => "push-pull",
            ReorderDiscipline::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for ReorderDiscipline {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swap" => Ok(ReorderDiscipline::Swap),
            "push" => Ok(ReorderDiscipline::Push),
            "push-pull" | "pushpull" => Ok(ReorderDiscipline::PushPull),
            "none" => Ok(ReorderDiscipline::None),
            other => Err(LaunchError::Api(format!(
                "Unknown reorder discipline: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriAdded {
    pub uri: String,
    pub bin: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<T> {
    /// The candidate order equals the current one.
    Unchanged,
    /// The discipline is `None`.
    Ignored,
    /// The table adopted this order.
    Reordered(Vec<T>),
    /// The dropped URI is not a member.
    UriAdded(UriAdded),
}

#[derive(Debug)]
struct TableState<T> {
    items: Vec<T>,
    columns: usize,
    limit: Option<usize>,
    discipline: ReorderDiscipline,
}

impl<T> TableState<T> {
    fn occupied(&self) -> usize {
        match self.limit {
            Some(limit) => self.items.len().min(limit),
            None => self.items.len(),
        }
    }
}

impl<T: Placeable> TableState<T> {
    fn visible_uris(&self) -> Vec<String> {
        self.items[..self.occupied()]
            .iter()
            .map(|i| i.uri().to_string())
            .collect()
    }
}

#[derive(Debug)]
pub struct Table<T> {
    state: RefCell<TableState<T>>,
    tiles_changed: Signal<()>,
    update: Signal<Vec<T>>,
    uri_added: Signal<UriAdded>,
}

impl<T: Placeable + Clone + 'static> Table<T> {
    pub fn new(columns: usize) -> Self {
        Self {
            state: RefCell::new(TableState {
                items: Vec::new(),
                columns: columns.max(1),
                limit: None,
                discipline: ReorderDiscipline::default(),
            }),
            tiles_changed: Signal::new(),
            update: Signal::new(),
            uri_added: Signal::new(),
        }
    }

    pub fn with_discipline(self, discipline: ReorderDiscipline) -> Self {
        self.state.borrow_mut().discipline = discipline;
        self
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items occupying bins, in bin order.
    pub fn visible(&self) -> Vec<T> {
        let state = self.state.borrow();
        state.items[..state.occupied()].to_vec()
    }

    pub fn visible_uris(&self) -> Vec<String> {
        self.state.borrow().visible_uris()
    }

    pub fn occupied_bins(&self) -> usize {
        self.state.borrow().occupied()
    }

    pub fn columns(&self) -> usize {
        self.state.borrow().columns
    }

    pub fn limit(&self) -> Option<usize> {
        self.state.borrow().limit
    }

    pub fn discipline(&self) -> ReorderDiscipline {
        self.state.borrow().discipline
    }

    pub fn set_discipline(&self, discipline: ReorderDiscipline) {
        self.state.borrow_mut().discipline = discipline;
    }

    pub fn rows(&self) -> usize {
        let state = self.state.borrow();
        state.occupied().div_ceil(state.columns)
    }

    /// `(row, column)` of a bin.
    pub fn bin_position(&self, bin: usize) -> (usize, usize) {
        let columns = self.columns();
        (bin / columns, bin % columns)
    }

    pub fn set_items(&self, items: Vec<T>) -> bool {
        self.relayout(|state| state.items = items)
    }

    /// A negative limit means unlimited.
    pub fn set_limit(&self, limit: i64) -> bool {
        let limit = usize::try_from(limit).ok();
        self.relayout(|state| state.limit = limit)
    }

    pub fn set_columns(&self, columns: usize) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let columns = columns.max(1);
            let changed = state.columns != columns;
            state.columns = columns;
            changed
        };
        if changed {
            self.tiles_changed.emit(&());
        }
    }

    pub fn connect_tiles_changed(&self, handler: impl Fn(&()) + 'static) -> Subscription {
        self.tiles_changed.connect(handler)
    }

    pub fn connect_update(&self, handler: impl Fn(&Vec<T>) + 'static) -> Subscription {
        self.update.connect(handler)
    }

    pub fn connect_uri_added(&self, handler: impl Fn(&UriAdded) + 'static) -> Subscription {
        self.uri_added.connect(handler)
    }

    /// Apply a drag of `uri` onto `bin`.
    pub fn drop_on_bin(&self, uri: &str, bin: usize) -> DropOutcome<T> {
        let candidate = {
            let state = self.state.borrow();
            let Some(source) = state.items.iter().position(|i| i.uri() == uri) else {
                drop(state);
                let added = UriAdded {
                    uri: uri.to_string(),
                    bin,
                };
                tracing::debug!(uri, bin, "drop of a non-member");
                self.uri_added.emit(&added);
                return DropOutcome::UriAdded(added);
            };
            if state.discipline == ReorderDiscipline::None {
                return DropOutcome::Ignored;
            }
            let target = bin.min(state.occupied().saturating_sub(1));
            let mut candidate = state.items.clone();
            reorder(&mut candidate, source, target, state.discipline);
            if same_order(&candidate, &state.items) {
                return DropOutcome::Unchanged;
            }
            candidate
        };

        self.state.borrow_mut().items = candidate.clone();
        tracing::debug!(uri, bin, "table reordered");
        self.tiles_changed.emit(&());
        self.update.emit(&candidate);
        DropOutcome::Reordered(candidate)
    }

    fn relayout(&self, change: impl FnOnce(&mut TableState<T>)) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.visible_uris();
            change(&mut state);
            state.visible_uris() != before
        };
        if changed {
            self.tiles_changed.emit(&());
        }
        changed
    }
}

/// Move `items[source]` onto index `target` according to `discipline`.
pub fn reorder<T>(items: &mut Vec<T>, source: usize, target: usize, discipline: ReorderDiscipline) {
    if source >= items.len() || target >= items.len() || source == target {
        return;
    }
    match discipline {
        ReorderDiscipline::None => {}
        ReorderDiscipline::Swap => items.swap(source, target),
        ReorderDiscipline::PushPull => {
            let item = items.remove(source);
            items.insert(target, item);
        }
        ReorderDiscipline::Push => {
            let item = items.remove(source);
            if source < target {
                if let Some(last) = items.pop() {
                    items.insert(0, last);
                }
            }
            items.insert(target, item);
        }
    }
}

fn same_order<T: Placeable>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.uri() == y.uri())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn table(items: &[&str], discipline: ReorderDiscipline) -> Table<String> {
        let table = Table::new(2).with_discipline(discipline);
        table.set_items(items.iter().map(|s| s.to_string()).collect());
        table
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn debug_output_includes_state() {
        let table = table(&["a", "b"], ReorderDiscipline::Swap);
        let shown = format!("{table:?}");
        assert!(shown.contains("\"a\""));
        assert!(shown.contains("Swap"));
    }

    fn count(table: &Table<String>) -> (Rc<Cell<usize>>, Rc<Cell<usize>>, Vec<Subscription>) {
        let tiles = Rc::new(Cell::new(0));
        let updates = Rc::new(Cell::new(0));
        let (t, u) = (Rc::clone(&tiles), Rc::clone(&updates));
        let subs = vec![
            table.connect_tiles_changed(move |_| t.set(t.get() + 1)),
            table.connect_update(move |_| u.set(u.get() + 1)),
        ];
        (tiles, updates, subs)
    }

    #[test]
    fn limit_controls_visible_bins() {
        let table = Table::new(2);
        table.set_limit(4);
        table.set_items(strings(&["a", "b", "c", "d", "e"]));
        assert_eq!(table.visible(), strings(&["a", "b", "c", "d"]));
        assert_eq!(table.rows(), 2);

        let (tiles, _, _subs) = count(&table);
        assert!(table.set_limit(-1));
        assert_eq!(table.visible(), strings(&["a", "b", "c", "d", "e"]));
        assert_eq!(table.rows(), 3);
        assert_eq!(table.len(), 5);
        assert_eq!(tiles.get(), 1);
    }

    #[test]
    fn set_items_suppresses_identical_visible_sequence() {
        let table = Table::new(3);
        table.set_limit(2);
        table.set_items(strings(&["a", "b", "c"]));
        let (tiles, _, _subs) = count(&table);

        assert!(!table.set_items(strings(&["a", "b", "c"])));
        // only the hidden tail differs
        assert!(!table.set_items(strings(&["a", "b", "z"])));
        assert_eq!(tiles.get(), 0);
        assert_eq!(table.items(), strings(&["a", "b", "z"]));

        assert!(table.set_items(strings(&["b", "a", "z"])));
        assert_eq!(tiles.get(), 1);
    }

    #[test]
    fn bins_fill_row_major() {
        let table = Table::<String>::new(3);
        assert_eq!(table.bin_position(0), (0, 0));
        assert_eq!(table.bin_position(2), (0, 2));
        assert_eq!(table.bin_position(4), (1, 1));
    }

    #[test]
    fn push_pull_relocates_onto_target() {
        let table = table(&["1", "2", "3", "4"], ReorderDiscipline::PushPull);
        let (tiles, updates, _subs) = count(&table);

        let outcome = table.drop_on_bin("1", 2);
        assert_eq!(outcome, DropOutcome::Reordered(strings(&["2", "3", "1", "4"])));
        assert_eq!(table.items(), strings(&["2", "3", "1", "4"]));
        assert_eq!((tiles.get(), updates.get()), (1, 1));
    }

    #[test]
    fn push_pull_backward() {
        let table = table(&["1", "2", "3", "4"], ReorderDiscipline::PushPull);
        table.drop_on_bin("4", 0);
        assert_eq!(table.items(), strings(&["4", "1", "2", "3"]));
    }

    #[test]
    fn swap_exchanges_two_items() {
        let table = table(&["1", "2", "3", "4"], ReorderDiscipline::Swap);
        table.drop_on_bin("1", 2);
        assert_eq!(table.items(), strings(&["3", "2", "1", "4"]));
    }

    #[test]
    fn push_forward_wraps_last_item() {
        let table = table(&["1", "2", "3", "4"], ReorderDiscipline::Push);
        table.drop_on_bin("1", 2);
        assert_eq!(table.items(), strings(&["4", "2", "1", "3"]));
    }

    #[test]
    fn push_backward_is_a_relocation() {
        let table = table(&["1", "2", "3", "4"], ReorderDiscipline::Push);
        table.drop_on_bin("3", 0);
        assert_eq!(table.items(), strings(&["3", "1", "2", "4"]));
    }

    #[test]
    fn discipline_none_ignores_drops() {
        let table = table(&["1", "2"], ReorderDiscipline::None);
        assert_eq!(table.drop_on_bin("1", 1), DropOutcome::Ignored);
        assert_eq!(table.items(), strings(&["1", "2"]));
    }

    #[test]
    fn drop_on_own_bin_never_updates() {
        for discipline in [
            ReorderDiscipline::Swap,
            ReorderDiscipline::Push,
            ReorderDiscipline::PushPull,
            ReorderDiscipline::None,
        ] {
            let table = table(&["1", "2", "3"], discipline);
            let (tiles, updates, _subs) = count(&table);
            for (bin, uri) in ["1", "2", "3"].iter().enumerate() {
                let outcome = table.drop_on_bin(uri, bin);
                assert!(!matches!(outcome, DropOutcome::Reordered(_)), "{discipline}");
            }
            assert_eq!((tiles.get(), updates.get()), (0, 0), "{discipline}");
        }
    }

    #[test]
    fn target_past_last_bin_clamps() {
        let table = table(&["1", "2", "3"], ReorderDiscipline::PushPull);
        table.drop_on_bin("1", 10);
        assert_eq!(table.items(), strings(&["2", "3", "1"]));

        // already last: nothing to do
        assert_eq!(table.drop_on_bin("1", 7), DropOutcome::Unchanged);
    }

    #[test]
    fn foreign_uri_reports_uri_added() {
        let table = table(&["1", "2"], ReorderDiscipline::None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = table.connect_uri_added(move |added| s.borrow_mut().push(added.clone()));

        let outcome = table.drop_on_bin("file:///new", 1);
        let expected = UriAdded {
            uri: "file:///new".into(),
            bin: 1,
        };
        assert_eq!(outcome, DropOutcome::UriAdded(expected.clone()));
        assert_eq!(*seen.borrow(), vec![expected]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn update_handler_may_read_the_table() {
        let table = Rc::new(table(&["a", "b"], ReorderDiscipline::Swap));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (t, s) = (Rc::downgrade(&table), Rc::clone(&seen));
        let _sub = table.connect_update(move |_| {
            if let Some(table) = t.upgrade() {
                s.borrow_mut().extend(table.items());
            }
        });
        table.drop_on_bin("a", 1);
        assert_eq!(*seen.borrow(), strings(&["b", "a"]));
    }

    #[test]
    fn discipline_parses_from_names() {
        assert_eq!(
            "push-pull".parse::<ReorderDiscipline>().unwrap(),
            ReorderDiscipline::PushPull
        );
        assert_eq!("Swap".parse::<ReorderDiscipline>().unwrap(), ReorderDiscipline::Swap);
        assert!("sideways".parse::<ReorderDiscipline>().is_err());
    }
}

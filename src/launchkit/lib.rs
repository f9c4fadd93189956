//! # launchkit
//!
//! The state core of a desktop application launcher: everything a tile
//! shows is derived from a few facts, and those facts live in observable
//! cells and persisted bookmark stores. Nothing here draws pixels.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, cli/)                               │
//! │  - inspect and edit stores, simulate drags, watch files     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API facade (api.rs) → commands (commands/*.rs)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Tiles (tile.rs), grids (grid.rs, table.rs)                 │
//! │  Attributes + Controls (attribute.rs, control.rs)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bookmark stores (bookmark/), status fetches (status.rs)    │
//! │  Boundaries: settings.rs, monitor.rs, codec.rs              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data flow
//!
//! An external edit of a store file reaches the store as a watch event; the
//! store reloads the whole file, diffs the URI order, and emits
//! items-changed only on a real change. Grids and tiles listening to the
//! store update their attributes, and the controls bound to those attributes
//! re-derive what the user sees.
//!
//! A drag goes the other way: the [`Table`](table::Table) computes the new
//! order, the grid writes it through
//! [`BookmarkStore::reorder`](bookmark::BookmarkStore::reorder), and the
//! store's own notification comes back to the table with an order it already
//! has, where it is suppressed.
//!
//! ## Threads
//!
//! Everything is single-threaded (`Rc`, `RefCell`) except the worker threads
//! behind [`StatusFetcher`](status::StatusFetcher), which hand results back
//! over a channel and never touch an attribute.

pub mod api;
pub mod attribute;
pub mod bookmark;
pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod grid;
pub mod monitor;
pub mod network;
pub mod settings;
pub mod signal;
pub mod status;
pub mod table;
pub mod tile;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

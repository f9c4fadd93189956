//! Command layer: one module per user-facing operation.
//!
//! Commands take a store (or grid) and plain arguments and return a
//! [`CmdResult`]. They never print; the CLI decides how results look.

use crate::bookmark::{BookmarkItem, StoreKind, StoreLocation};
use crate::config::LaunchConfig;
use serde::Serialize;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod grid;
pub mod list;
pub mod paths;
pub mod remove;
pub mod reorder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An item with its 1-based position in the store.
#[derive(Debug, Clone, Serialize)]
pub struct ListedItem {
    pub position: usize,
    #[serde(flatten)]
    pub item: BookmarkItem,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    pub kind: StoreKind,
    pub location: StoreLocation,
    pub path: Option<PathBuf>,
    pub writable: bool,
    pub len: usize,
}

/// One occupied grid bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub bin: usize,
    pub row: usize,
    pub column: usize,
    pub uri: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    pub columns: usize,
    pub rows: usize,
    pub cells: Vec<GridCell>,
    /// Items past the limit
    pub hidden: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_items: Vec<ListedItem>,
    pub store_info: Option<StoreInfo>,
    pub grid: Option<GridView>,
    pub config: Option<LaunchConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_items(mut self, items: Vec<ListedItem>) -> Self {
        self.listed_items = items;
        self
    }

    pub fn with_store_info(mut self, info: StoreInfo) -> Self {
        self.store_info = Some(info);
        self
    }

    pub fn with_grid(mut self, grid: GridView) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn with_config(mut self, config: LaunchConfig) -> Self {
        self.config = Some(config);
        self
    }
}

//! # Bookmarks
//!
//! Persisted, ordered, URI-keyed collections: favorite applications, recent
//! applications, system shortcuts, documents and places.
//!
//! - [`item`]: the record itself.
//! - [`codec`]: bytes to records and back.
//! - [`rank`]: order recovery from `rank-<n>` groups.
//! - [`paths`]: where a store's file lives (user copy vs. system default).
//! - [`store`]: the live collection with reload, merge-on-save and watching.
//! - [`registry`]: one shared store per kind.

pub mod codec;
pub mod item;
pub mod kind;
pub mod paths;
pub mod rank;
pub mod registry;
pub mod sentinel;
pub mod store;

pub use codec::{BookmarkCodec, JsonCodec};
pub use item::BookmarkItem;
pub use kind::StoreKind;
pub use paths::{StoreLocation, StorePaths};
pub use registry::StoreRegistry;
pub use store::{BookmarkStore, StoreEnv};

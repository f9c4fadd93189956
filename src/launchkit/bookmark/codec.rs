//! Bookmark file codecs.
//!
//! A codec turns the bytes of a store file into records and back. Records
//! come out in file order, but no codec promises that order survives an
//! external rewrite; the store recovers its order from rank groups.

use super::item::BookmarkItem;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub trait BookmarkCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<BookmarkItem>>;

    fn serialize(&self, items: &[BookmarkItem]) -> Result<Vec<u8>>;
}

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct BookmarkFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    bookmarks: Vec<BookmarkItem>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// `{"version": 1, "bookmarks": [...]}`, pretty-printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl BookmarkCodec for JsonCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<BookmarkItem>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let file: BookmarkFile = serde_json::from_slice(bytes)?;
        if file.version > FORMAT_VERSION {
            tracing::warn!(version = file.version, "bookmark file is newer than this reader");
        }
        Ok(file.bookmarks)
    }

    fn serialize(&self, items: &[BookmarkItem]) -> Result<Vec<u8>> {
        let file = BookmarkFile {
            version: FORMAT_VERSION,
            bookmarks: items.to_vec(),
        };
        let mut bytes = serde_json::to_vec_pretty(&file)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

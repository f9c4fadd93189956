//! Blank-document placeholders.
//!
//! Default document stores ship with two placeholder URIs standing for "a new
//! empty document" and "a new empty spreadsheet". The first time a writable
//! store loads one, an empty file is created in the documents directory and
//! the record is moved to that file's URI.

use crate::error::{LaunchError, Result};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const BLANK_DOCUMENT: &str = "BLANK_DOCUMENT";
pub const BLANK_SPREADSHEET: &str = "BLANK_SPREADSHEET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankTemplate {
    pub stem: &'static str,
    pub extension: &'static str,
    pub mime_type: &'static str,
}

pub fn template_for(uri: &str) -> Option<BlankTemplate> {
    match uri {
        BLANK_DOCUMENT => Some(BlankTemplate {
            stem: "new-document",
            extension: "odt",
            mime_type: "application/vnd.oasis.opendocument.text",
        }),
        BLANK_SPREADSHEET => Some(BlankTemplate {
            stem: "new-spreadsheet",
            extension: "ods",
            mime_type: "application/vnd.oasis.opendocument.spreadsheet",
        }),
        _ => None,
    }
}

/// Create an empty file for `template` in `dir`, never overwriting.
pub fn create_blank(dir: &Path, template: BlankTemplate) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(LaunchError::Io)?;
    for n in 1.. {
        let name = if n == 1 {
            format!("{}.{}", template.stem, template.extension)
        } else {
            format!("{}-{}.{}", template.stem, n, template.extension)
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(LaunchError::Io(e)),
        }
    }
    unreachable!("unbounded range")
}

/// `file://` URI for an absolute path, percent-encoding reserved bytes.
pub fn file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut uri = String::from("file://");
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                uri.push(byte as char)
            }
            _ => uri.push_str(&format!("%{byte:02X}")),
        }
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_two_sentinels_have_templates() {
        assert_eq!(template_for(BLANK_DOCUMENT).unwrap().extension, "odt");
        assert_eq!(template_for(BLANK_SPREADSHEET).unwrap().extension, "ods");
        assert!(template_for("file:///BLANK_DOCUMENT").is_none());
    }

    #[test]
    fn create_blank_uniquifies() {
        let dir = tempfile::tempdir().unwrap();
        let template = template_for(BLANK_DOCUMENT).unwrap();
        let first = create_blank(dir.path(), template).unwrap();
        let second = create_blank(dir.path(), template).unwrap();
        assert_eq!(first.file_name().unwrap(), "new-document.odt");
        assert_eq!(second.file_name().unwrap(), "new-document-2.odt");
        assert_eq!(fs::metadata(&first).unwrap().len(), 0);
    }

    #[test]
    fn file_uri_escapes_spaces() {
        assert_eq!(
            file_uri(Path::new("/home/me/My Docs/a.odt")),
            "file:///home/me/My%20Docs/a.odt"
        );
    }
}

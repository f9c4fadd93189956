use crate::table::Placeable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted entry of a bookmark store, keyed by its URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkItem {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_exec: Option<String>,
    /// Free-form group tags. The `rank-<n>` tag lives here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

impl BookmarkItem {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
            mime_type: None,
            modified: None,
            app_name: None,
            app_exec: None,
            groups: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_app(mut self, name: impl Into<String>, exec: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self.app_exec = Some(exec.into());
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Title if set, otherwise the last path segment of the URI.
    pub fn display_name(&self) -> &str {
        if let Some(title) = self.title.as_deref() {
            return title;
        }
        let trimmed = self.uri.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Copy the fields `update` sets onto `self`; unset fields are left alone.
    pub(crate) fn apply_update(&mut self, update: &BookmarkItem) {
        if update.title.is_some() {
            self.title.clone_from(&update.title);
        }
        if update.mime_type.is_some() {
            self.mime_type.clone_from(&update.mime_type);
        }
        if update.modified.is_some() {
            self.modified = update.modified;
        }
        if update.app_name.is_some() {
            self.app_name.clone_from(&update.app_name);
        }
        if update.app_exec.is_some() {
            self.app_exec.clone_from(&update.app_exec);
        }
    }

    /// Fill fields unset here from an older copy of the same record, and
    /// union the groups.
    pub(crate) fn merge_from(&mut self, older: &BookmarkItem) {
        if self.title.is_none() {
            self.title.clone_from(&older.title);
        }
        if self.mime_type.is_none() {
            self.mime_type.clone_from(&older.mime_type);
        }
        if self.modified.is_none() {
            self.modified = older.modified;
        }
        if self.app_name.is_none() {
            self.app_name.clone_from(&older.app_name);
        }
        if self.app_exec.is_none() {
            self.app_exec.clone_from(&older.app_exec);
        }
        for group in &older.groups {
            if !self.groups.contains(group) {
                self.groups.push(group.clone());
            }
        }
    }
}

impl Placeable for BookmarkItem {
    fn uri(&self) -> &str {
        &self.uri
    }
}

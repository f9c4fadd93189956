use crate::error::LaunchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The logical stores a launcher keeps. One live instance per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKind {
    UserApps,
    RecentApps,
    SystemItems,
    UserDocs,
    UserDirs,
}

impl StoreKind {
    pub const ALL: [StoreKind; 5] = [
        StoreKind::UserApps,
        StoreKind::RecentApps,
        StoreKind::SystemItems,
        StoreKind::UserDocs,
        StoreKind::UserDirs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StoreKind::UserApps => "user-apps",
            StoreKind::RecentApps => "recent-apps",
            StoreKind::SystemItems => "system-items",
            StoreKind::UserDocs => "user-docs",
            StoreKind::UserDirs => "user-dirs",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::UserApps => "applications.json",
            StoreKind::RecentApps => "recent-applications.json",
            StoreKind::SystemItems => "system-items.json",
            StoreKind::UserDocs => "documents.json",
            StoreKind::UserDirs => "places.json",
        }
    }

    /// Setting that says whether users may edit this store.
    pub fn policy_key(self) -> String {
        format!("user-modifiable-{}", self.name())
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoreKind {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        match wanted.as_str() {
            "apps" => Ok(StoreKind::UserApps),
            "recent" => Ok(StoreKind::RecentApps),
            "system" => Ok(StoreKind::SystemItems),
            "docs" => Ok(StoreKind::UserDocs),
            "dirs" | "places" => Ok(StoreKind::UserDirs),
            _ => StoreKind::ALL
                .into_iter()
                .find(|k| k.name() == wanted)
                .ok_or_else(|| LaunchError::UnknownStoreKind(s.to_string())),
        }
    }
}

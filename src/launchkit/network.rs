//! Active network link, read from sysfs.

use crate::error::{LaunchError, Result};
use crate::status::StatusSource;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const SYSFS_NET: &str = "/sys/class/net";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    Wired,
    Wireless,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Wired => f.write_str("Wired"),
            LinkKind::Wireless => f.write_str("Wireless"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveLink {
    pub interface: String,
    pub kind: LinkKind,
}

#[derive(Debug, Clone)]
pub struct SysfsNetworkSource {
    root: PathBuf,
}

impl Default for SysfsNetworkSource {
    fn default() -> Self {
        Self::new(SYSFS_NET)
    }
}

impl SysfsNetworkSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The first interface, by name, whose operstate is `up`. Loopback is
    /// never reported.
    pub fn active_link(&self) -> Result<ActiveLink> {
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != "lo")
            .collect();
        names.sort();

        for name in names {
            let dir = self.root.join(&name);
            let state = fs::read_to_string(dir.join("operstate")).unwrap_or_default();
            if state.trim() != "up" {
                continue;
            }
            let kind = if dir.join("wireless").exists() || dir.join("phy80211").exists() {
                LinkKind::Wireless
            } else {
                LinkKind::Wired
            };
            return Ok(ActiveLink {
                interface: name,
                kind,
            });
        }
        Err(LaunchError::Status("no active network link".into()))
    }
}

impl StatusSource for SysfsNetworkSource {
    type Status = ActiveLink;

    fn fetch_status(&self) -> Result<ActiveLink> {
        self.active_link()
    }
}

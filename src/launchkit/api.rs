//! # API Facade
//!
//! A thin layer over [`commands`](crate::commands): it resolves store kinds
//! to live stores through the [`StoreRegistry`], builds grids from the
//! settings, and dispatches. No printing, no exit codes.
//!
//! Stores opened here stay alive only while something holds them, exactly as
//! with the registry; a long-running client that wants change notifications
//! keeps the `Rc` returned by [`LaunchApi::store`].

use crate::bookmark::{BookmarkItem, BookmarkStore, StoreKind, StoreRegistry};
use crate::commands::{self, CmdResult};
use crate::config::{LaunchConfig, STATUS_REFRESH_KEY};
use crate::error::Result;
use crate::grid::BookmarkGrid;
use crate::settings::SettingsSource;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, MessageLevel};

pub struct LaunchApi {
    registry: StoreRegistry,
    config: LaunchConfig,
    config_dir: PathBuf,
}

impl LaunchApi {
    pub fn new(registry: StoreRegistry, config: LaunchConfig, config_dir: PathBuf) -> Self {
        Self {
            registry,
            config,
            config_dir,
        }
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn store(&self, kind: StoreKind) -> Rc<BookmarkStore> {
        self.registry.get(kind)
    }

    /// A grid over `kind` laid out from the current settings.
    pub fn grid(&self, kind: StoreKind) -> BookmarkGrid {
        BookmarkGrid::with_settings(self.store(kind), &*self.registry.env().settings)
    }

    /// How often background status sources are refetched.
    pub fn status_refresh(&self) -> Duration {
        let default = LaunchConfig::default().status_refresh_secs as i64;
        let secs = self
            .registry
            .env()
            .settings
            .get_int(STATUS_REFRESH_KEY, default);
        Duration::from_secs(u64::try_from(secs).unwrap_or(1).max(1))
    }

    pub fn list_items(&self, kind: StoreKind, search: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&self.store(kind), search)
    }

    pub fn add_item(&self, kind: StoreKind, item: BookmarkItem) -> Result<CmdResult> {
        commands::add::run(&self.store(kind), item)
    }

    pub fn remove_items<S: AsRef<str>>(&self, kind: StoreKind, uris: &[S]) -> Result<CmdResult> {
        commands::remove::run(&self.store(kind), uris)
    }

    pub fn reorder_items<S: AsRef<str>>(&self, kind: StoreKind, uris: &[S]) -> Result<CmdResult> {
        commands::reorder::run(&self.store(kind), uris)
    }

    pub fn locate_store(&self, kind: StoreKind) -> Result<CmdResult> {
        commands::paths::run(&self.store(kind))
    }

    pub fn show_grid(&self, kind: StoreKind) -> Result<CmdResult> {
        commands::grid::view(&self.grid(kind))
    }

    pub fn move_item(&self, kind: StoreKind, uri: &str, bin: usize) -> Result<CmdResult> {
        commands::grid::move_item(&self.grid(kind), uri, bin)
    }

    pub fn config_action(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DISCIPLINE_KEY;
    use crate::settings::SettingValue;
    use crate::test_utils::TestEnv;

    fn api(env: &TestEnv) -> LaunchApi {
        LaunchApi::new(
            env.registry(),
            LaunchConfig::default(),
            env.root.join("config"),
        )
    }

    #[test]
    fn add_then_list_through_facade() {
        let env = TestEnv::new();
        let api = api(&env);
        api.add_item(StoreKind::UserApps, BookmarkItem::new("app://a"))
            .unwrap();
        api.add_item(StoreKind::UserApps, BookmarkItem::new("app://b"))
            .unwrap();
        api.reorder_items(StoreKind::UserApps, &["app://b"]).unwrap();

        let listed = api.list_items(StoreKind::UserApps, None).unwrap();
        let uris: Vec<_> = listed.listed_items.iter().map(|l| l.item.uri.as_str()).collect();
        assert_eq!(uris, vec!["app://b", "app://a"]);
    }

    #[test]
    fn move_item_uses_discipline_setting() {
        let env = TestEnv::new();
        env.settings.set(DISCIPLINE_KEY, SettingValue::Str("swap".into()));
        let api = api(&env);
        for uri in ["1", "2", "3"] {
            api.add_item(StoreKind::UserApps, BookmarkItem::new(uri))
                .unwrap();
        }
        api.move_item(StoreKind::UserApps, "1", 2).unwrap();
        assert_eq!(api.store(StoreKind::UserApps).uris(), vec!["3", "2", "1"]);
    }

    #[test]
    fn status_refresh_reads_setting() {
        let env = TestEnv::new();
        let api = api(&env);
        assert_eq!(api.status_refresh(), Duration::from_secs(30));

        env.settings.set(STATUS_REFRESH_KEY, SettingValue::Int(5));
        assert_eq!(api.status_refresh(), Duration::from_secs(5));
    }
}

use crate::bookmark::paths::APP_DIR;
use crate::bookmark::rank::rank_group;
use crate::bookmark::{
    BookmarkCodec, BookmarkItem, BookmarkStore, JsonCodec, StoreEnv, StoreKind, StorePaths,
    StoreRegistry,
};
use crate::monitor::PollMonitor;
use crate::settings::MemorySettings;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Isolated user and system data directories plus in-memory settings and a
/// polling monitor.
pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub paths: StorePaths,
    pub settings: Rc<MemorySettings>,
    pub monitor: Rc<PollMonitor>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let paths = StorePaths::new(root.join("user"), vec![root.join("system")]);
        Self {
            _temp_dir: temp_dir,
            root,
            paths,
            settings: Rc::new(MemorySettings::new()),
            monitor: Rc::new(PollMonitor::new()),
        }
    }

    pub fn env(&self) -> StoreEnv {
        StoreEnv {
            paths: self.paths.clone(),
            settings: self.settings.clone(),
            monitor: self.monitor.clone(),
            codec: Rc::new(JsonCodec),
        }
    }

    pub fn open(&self, kind: StoreKind) -> Rc<BookmarkStore> {
        BookmarkStore::open(kind, self.env())
    }

    pub fn registry(&self) -> StoreRegistry {
        StoreRegistry::new(self.env())
    }

    /// Path of `file_name` in the (only) system data dir.
    pub fn system_file(&self, file_name: &str) -> PathBuf {
        self.paths.system_data_dirs[0].join(APP_DIR).join(file_name)
    }

    /// Write records with optional ranks straight to disk.
    pub fn write_store(&self, path: &Path, records: &[(&str, Option<usize>)]) {
        let items: Vec<BookmarkItem> = records
            .iter()
            .map(|(uri, rank)| {
                let mut item = BookmarkItem::new(*uri);
                if let Some(rank) = rank {
                    item.groups.push(rank_group(*rank));
                }
                item
            })
            .collect();
        fs::create_dir_all(path.parent().expect("store path has a parent"))
            .expect("failed to create store dir");
        let bytes = JsonCodec.serialize(&items).expect("failed to encode");
        fs::write(path, bytes).expect("failed to write store");
    }

    pub fn read_store(&self, path: &Path) -> Vec<BookmarkItem> {
        let bytes = fs::read(path).expect("failed to read store");
        JsonCodec.parse(&bytes).expect("failed to decode")
    }
}

//! # File Monitoring
//!
//! Stores watch their backing file through the [`FileMonitor`] trait.
//! Callbacks always run on the consumer thread, from whatever drives the
//! monitor (the main loop), never from inside `watch`.
//!
//! [`PollMonitor`] is the shipped implementation. Each call to
//! [`PollMonitor::poll`] compares a fingerprint (exists, mtime, length) of
//! every watched path with the previous one and fires callbacks for the
//! differences. Hosts with a native watcher feed their events in through
//! [`PollMonitor::notify`] instead.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Changed,
    Created,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

pub type WatchCallback = Box<dyn Fn(MonitorEvent)>;

pub trait FileMonitor {
    fn watch(&self, path: &Path, callback: WatchCallback) -> WatchId;

    fn unwatch(&self, id: WatchId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

fn fingerprint(path: &Path) -> Option<Fingerprint> {
    let meta = fs::metadata(path).ok()?;
    Some(Fingerprint {
        modified: meta.modified().ok(),
        len: meta.len(),
    })
}

struct Watch {
    id: WatchId,
    path: PathBuf,
    last: Option<Fingerprint>,
    callback: Rc<dyn Fn(MonitorEvent)>,
}

#[derive(Default)]
pub struct PollMonitor {
    next_id: Cell<u64>,
    watches: RefCell<Vec<Watch>>,
}

impl PollMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch_count(&self) -> usize {
        self.watches.borrow().len()
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watches.borrow().iter().any(|w| w.path == path)
    }

    /// Check every watched path and dispatch events. Returns the number of
    /// callbacks fired.
    pub fn poll(&self) -> usize {
        let mut fired = Vec::new();
        {
            let mut watches = self.watches.borrow_mut();
            for watch in watches.iter_mut() {
                let now = fingerprint(&watch.path);
                let event = match (watch.last, now) {
                    (None, Some(_)) => Some(MonitorEvent::Created),
                    (Some(_), None) => Some(MonitorEvent::Deleted),
                    (Some(a), Some(b)) if a != b => Some(MonitorEvent::Changed),
                    _ => None,
                };
                watch.last = now;
                if let Some(event) = event {
                    tracing::debug!(path = %watch.path.display(), ?event, "file event");
                    fired.push((Rc::clone(&watch.callback), event));
                }
            }
        }
        let count = fired.len();
        for (callback, event) in fired {
            callback(event);
        }
        count
    }

    /// Deliver an externally observed event to every watch on `path`.
    pub fn notify(&self, path: &Path, event: MonitorEvent) -> usize {
        let targets: Vec<Rc<dyn Fn(MonitorEvent)>> = {
            let mut watches = self.watches.borrow_mut();
            watches
                .iter_mut()
                .filter(|w| w.path == path)
                .map(|w| {
                    w.last = fingerprint(&w.path);
                    Rc::clone(&w.callback)
                })
                .collect()
        };
        let count = targets.len();
        for callback in targets {
            callback(event);
        }
        count
    }
}

impl FileMonitor for PollMonitor {
    fn watch(&self, path: &Path, callback: WatchCallback) -> WatchId {
        let id = WatchId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.watches.borrow_mut().push(Watch {
            id,
            path: path.to_path_buf(),
            last: fingerprint(path),
            callback: Rc::from(callback),
        });
        id
    }

    fn unwatch(&self, id: WatchId) {
        self.watches.borrow_mut().retain(|w| w.id != id);
    }
}

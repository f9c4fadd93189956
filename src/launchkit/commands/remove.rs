use crate::bookmark::BookmarkStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

pub fn run<S: AsRef<str>>(store: &BookmarkStore, uris: &[S]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for uri in uris {
        let uri = uri.as_ref();
        if store.remove(uri)? {
            result.add_message(CmdMessage::success(format!("Removed {}", uri)));
        } else {
            result.add_message(CmdMessage::warning(format!(
                "{} is not in {}",
                uri,
                store.kind()
            )));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{BookmarkItem, StoreKind};
    use crate::commands::MessageLevel;
    use crate::test_utils::TestEnv;

    #[test]
    fn removes_known_and_warns_on_unknown() {
        let env = TestEnv::new();
        let store = env.open(StoreKind::RecentApps);
        store.add(BookmarkItem::new("app://a")).unwrap();

        let result = run(&store, &["app://a", "app://zzz"]).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[1].level, MessageLevel::Warning);
        assert!(store.is_empty());
    }
}

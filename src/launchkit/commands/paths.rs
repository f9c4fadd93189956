use crate::bookmark::BookmarkStore;
use crate::commands::{CmdResult, StoreInfo};
use crate::error::Result;

pub fn run(store: &BookmarkStore) -> Result<CmdResult> {
    let info = StoreInfo {
        kind: store.kind(),
        location: store.location(),
        path: store.path(),
        writable: store.is_writable(),
        len: store.len(),
    };
    Ok(CmdResult::default().with_store_info(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{BookmarkItem, StoreKind, StoreLocation};
    use crate::test_utils::TestEnv;

    #[test]
    fn reports_user_copy_after_first_write() {
        let env = TestEnv::new();
        let store = env.open(StoreKind::UserDocs);
        let before = run(&store).unwrap().store_info.unwrap();
        assert_eq!(before.path, None);
        assert_eq!(before.location, StoreLocation::Default);

        store.add(BookmarkItem::new("file:///a.txt")).unwrap();
        let after = run(&store).unwrap().store_info.unwrap();
        assert_eq!(after.location, StoreLocation::User);
        assert_eq!(after.path, Some(env.paths.user_path("documents.json")));
        assert_eq!(after.len, 1);
    }
}

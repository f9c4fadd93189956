use crate::bookmark::BookmarkStore;
use crate::commands::{CmdResult, ListedItem};
use crate::error::Result;

pub fn run(store: &BookmarkStore, search: Option<&str>) -> Result<CmdResult> {
    let needle = search.map(str::to_lowercase);
    let listed = store
        .items()
        .into_iter()
        .enumerate()
        .map(|(i, item)| ListedItem {
            position: i + 1,
            item,
        })
        .filter(|listed| match &needle {
            Some(needle) => {
                listed.item.uri.to_lowercase().contains(needle)
                    || listed.item.display_name().to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect();

    Ok(CmdResult::default().with_listed_items(listed))
}

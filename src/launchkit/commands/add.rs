use crate::bookmark::{BookmarkItem, BookmarkStore};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

pub fn run(store: &BookmarkStore, item: BookmarkItem) -> Result<CmdResult> {
    let existed = store.has(&item.uri);
    let uri = item.uri.clone();
    store.add(item)?;

    let mut result = CmdResult::default();
    let verb = if existed { "Updated" } else { "Added" };
    result.add_message(CmdMessage::success(format!(
        "{} {} in {}",
        verb,
        uri,
        store.kind()
    )));
    Ok(result)
}

use crate::bookmark::BookmarkStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

/// Move the given URIs to the front, in order.
pub fn run<S: AsRef<str>>(store: &BookmarkStore, uris: &[S]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for uri in uris {
        let uri = uri.as_ref();
        if !store.has(uri) {
            result.add_message(CmdMessage::warning(format!("Skipping unknown {}", uri)));
        }
    }

    let before = store.uris();
    store.reorder(uris)?;
    if store.uris() == before {
        result.add_message(CmdMessage::info("Order unchanged"));
    } else {
        result.add_message(CmdMessage::success(format!("Reordered {}", store.kind())));
    }
    Ok(result)
}

use crate::commands::{CmdMessage, CmdResult, GridCell, GridView};
use crate::error::Result;
use crate::grid::BookmarkGrid;
use crate::table::DropOutcome;

pub fn view(grid: &BookmarkGrid) -> Result<CmdResult> {
    Ok(CmdResult::default().with_grid(snapshot(grid)))
}

/// Drop `uri` on `bin` (0-based) and report what happened.
pub fn move_item(grid: &BookmarkGrid, uri: &str, bin: usize) -> Result<CmdResult> {
    let outcome = grid.drop_uri(uri, bin)?;
    let mut result = CmdResult::default().with_grid(snapshot(grid));
    let message = match outcome {
        DropOutcome::Reordered(_) => CmdMessage::success(format!("Moved {} to bin {}", uri, bin)),
        DropOutcome::UriAdded(added) => {
            CmdMessage::success(format!("Added {} at bin {}", added.uri, added.bin))
        }
        DropOutcome::Unchanged => CmdMessage::info("Order unchanged"),
        DropOutcome::Ignored => CmdMessage::warning(format!(
            "Reordering is disabled ({})",
            grid.table().discipline()
        )),
    };
    result.add_message(message);
    Ok(result)
}

fn snapshot(grid: &BookmarkGrid) -> GridView {
    let table = grid.table();
    let cells = table
        .visible()
        .into_iter()
        .enumerate()
        .map(|(bin, item)| {
            let (row, column) = table.bin_position(bin);
            GridCell {
                bin,
                row,
                column,
                label: item.display_name().to_string(),
                uri: item.uri,
            }
        })
        .collect();
    GridView {
        columns: table.columns(),
        rows: table.rows(),
        cells,
        hidden: table.len() - table.occupied_bins(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{BookmarkItem, StoreKind};
    use crate::commands::MessageLevel;
    use crate::table::ReorderDiscipline;
    use crate::test_utils::TestEnv;

    fn grid(env: &TestEnv, discipline: ReorderDiscipline, limit: i64) -> BookmarkGrid {
        let store = env.open(StoreKind::UserApps);
        for uri in ["a", "b", "c", "d", "e"] {
            store.add(BookmarkItem::new(uri)).unwrap();
        }
        BookmarkGrid::new(store, 2, limit, discipline)
    }

    #[test]
    fn view_lays_out_visible_bins() {
        let env = TestEnv::new();
        let grid = grid(&env, ReorderDiscipline::PushPull, 4);
        let view = view(&grid).unwrap().grid.unwrap();
        assert_eq!(view.rows, 2);
        assert_eq!(view.hidden, 1);
        assert_eq!(view.cells[3].uri, "d");
        assert_eq!((view.cells[3].row, view.cells[3].column), (1, 1));
    }

    #[test]
    fn move_reports_outcome() {
        let env = TestEnv::new();
        let grid = grid(&env, ReorderDiscipline::PushPull, -1);
        let result = move_item(&grid, "a", 2).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(grid.store().uris(), vec!["b", "c", "a", "d", "e"]);

        let same = move_item(&grid, "a", 2).unwrap();
        assert_eq!(same.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn move_with_disabled_reordering_warns() {
        let env = TestEnv::new();
        let grid = grid(&env, ReorderDiscipline::None, -1);
        let result = move_item(&grid, "a", 2).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }
}

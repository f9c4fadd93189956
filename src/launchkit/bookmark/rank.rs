//! Rank groups.
//!
//! Store files do not keep record order, so each record carries a
//! `rank-<n>` group holding its position. Loading sorts by rank; saving
//! rewrites every rank from the in-memory order.

use super::item::BookmarkItem;

const RANK_PREFIX: &str = "rank-";

pub fn rank_group(position: usize) -> String {
    format!("{RANK_PREFIX}{position}")
}

pub fn parse_rank(group: &str) -> Option<usize> {
    let digits = group.strip_prefix(RANK_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn is_rank_group(group: &str) -> bool {
    parse_rank(group).is_some()
}

/// First rank group on the item, if any.
pub fn rank_of(item: &BookmarkItem) -> Option<usize> {
    item.groups.iter().find_map(|g| parse_rank(g))
}

/// Replace any rank groups on `item` with one for `position`.
pub fn set_rank(item: &mut BookmarkItem, position: usize) {
    item.groups.retain(|g| !is_rank_group(g));
    item.groups.push(rank_group(position));
}

/// Rewrite ranks so they match slice order.
pub fn assign_ranks(items: &mut [BookmarkItem]) {
    for (position, item) in items.iter_mut().enumerate() {
        set_rank(item, position);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankIssue {
    Missing { uri: String },
    Duplicate { uri: String, rank: usize },
    OutOfRange { uri: String, rank: usize },
}

impl RankIssue {
    /// Missing ranks are normal for hand-written files; the rest mean the
    /// file was corrupted.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, RankIssue::Missing { .. })
    }
}

/// Order records by rank.
///
/// Records with a valid, unique, in-range rank take that slot. Everything
/// else fills the free slots in file order. Without any ranks this is file
/// order.
pub fn recover_order(records: Vec<BookmarkItem>) -> (Vec<BookmarkItem>, Vec<RankIssue>) {
    let count = records.len();
    let mut slots: Vec<Option<BookmarkItem>> = vec![None; count];
    let mut leftovers = Vec::new();
    let mut issues = Vec::new();

    for record in records {
        match rank_of(&record) {
            None => {
                issues.push(RankIssue::Missing {
                    uri: record.uri.clone(),
                });
                leftovers.push(record);
            }
            Some(rank) if rank >= count => {
                issues.push(RankIssue::OutOfRange {
                    uri: record.uri.clone(),
                    rank,
                });
                leftovers.push(record);
            }
            Some(rank) if slots[rank].is_some() => {
                issues.push(RankIssue::Duplicate {
                    uri: record.uri.clone(),
                    rank,
                });
                leftovers.push(record);
            }
            Some(rank) => slots[rank] = Some(record),
        }
    }

    let mut leftovers = leftovers.into_iter();
    let ordered = slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| leftovers.next()))
        .collect();
    (ordered, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(uri: &str, rank: Option<usize>) -> BookmarkItem {
        let mut item = BookmarkItem::new(uri);
        if let Some(rank) = rank {
            item.groups.push(rank_group(rank));
        }
        item
    }

    fn uris(items: &[BookmarkItem]) -> Vec<&str> {
        items.iter().map(|i| i.uri.as_str()).collect()
    }

    #[test]
    fn parse_rank_is_strict() {
        assert_eq!(parse_rank("rank-12"), Some(12));
        assert_eq!(parse_rank("rank-"), None);
        assert_eq!(parse_rank("rank--1"), None);
        assert_eq!(parse_rank("rank-1a"), None);
        assert_eq!(parse_rank("Rank-1"), None);
        assert_eq!(parse_rank("frank-1"), None);
    }

    #[test]
    fn set_rank_replaces_old_rank_only() {
        let mut item = ranked("a", Some(4));
        item.groups.insert(0, "fav".into());
        set_rank(&mut item, 1);
        assert_eq!(item.groups, vec!["fav", "rank-1"]);
    }

    #[test]
    fn sorts_by_rank() {
        let records = vec![ranked("b", Some(1)), ranked("c", Some(2)), ranked("a", Some(0))];
        let (ordered, issues) = recover_order(records);
        assert_eq!(uris(&ordered), vec!["a", "b", "c"]);
        assert!(issues.is_empty());
    }

    #[test]
    fn unranked_files_keep_file_order() {
        let records = vec![ranked("z", None), ranked("y", None), ranked("x", None)];
        let (ordered, issues) = recover_order(records);
        assert_eq!(uris(&ordered), vec!["z", "y", "x"]);
        assert!(issues.iter().all(|i| !i.is_corruption()));
    }

    #[test]
    fn duplicates_and_out_of_range_fill_gaps_in_file_order() {
        let records = vec![
            ranked("a", Some(1)),
            ranked("b", Some(1)),
            ranked("c", Some(9)),
            ranked("d", Some(3)),
        ];
        let (ordered, issues) = recover_order(records);
        assert_eq!(uris(&ordered), vec!["b", "a", "c", "d"]);
        assert_eq!(
            issues,
            vec![
                RankIssue::Duplicate {
                    uri: "b".into(),
                    rank: 1
                },
                RankIssue::OutOfRange {
                    uri: "c".into(),
                    rank: 9
                },
            ]
        );
    }
}

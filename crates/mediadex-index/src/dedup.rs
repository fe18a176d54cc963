//! Search result deduplication and pagination.
//!
//! When the same content has been ingested into both shards, the raw
//! search collaborator returns one record per copy. This module collapses
//! those duplicates (keeping the first-seen record for each `file_id`, so
//! the collaborator's ranking order survives) and slices the deduplicated
//! sequence into pages.

use std::collections::HashSet;

use mediadex_core::FileRecord;

/// Drop records whose `file_id` was already seen, preserving first-seen
/// order.
pub fn dedup_by_file_id(records: Vec<FileRecord>) -> Vec<FileRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.file_id.clone()))
        .collect()
}

/// Slice `records` into the page at `offset`, returning the page and the
/// next offset (`None` when the sequence is exhausted).
pub fn paginate(
    records: Vec<FileRecord>,
    max_results: u32,
    offset: u32,
) -> (Vec<FileRecord>, Option<u32>) {
    let total = records.len();
    let page: Vec<FileRecord> = records
        .into_iter()
        .skip(offset as usize)
        .take(max_results as usize)
        .collect();

    let consumed = offset as usize + page.len();
    let next_offset = if consumed < total {
        Some(consumed as u32)
    } else {
        None
    };
    (page, next_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> FileRecord {
        FileRecord {
            file_id: id.to_string(),
            file_name: name.to_string(),
            file_size: 0,
            mime_type: None,
            caption: None,
        }
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let records = vec![
            record("a", "first.mp4"),
            record("b", "second.mp4"),
            record("a", "copy-of-first.mp4"),
            record("c", "third.mp4"),
            record("b", "copy-of-second.mp4"),
        ];

        let deduped = dedup_by_file_id(records);
        let ids: Vec<&str> = deduped.iter().map(|r| r.file_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // The first-seen record wins, not the later copy.
        assert_eq!(deduped[0].file_name, "first.mp4");
    }

    #[test]
    fn test_dedup_no_duplicates_is_identity() {
        let records = vec![record("a", "x"), record("b", "y")];
        assert_eq!(dedup_by_file_id(records.clone()), records);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_by_file_id(Vec::new()).is_empty());
    }

    #[test]
    fn test_paginate_first_page_with_more() {
        let records = vec![record("a", "x"), record("b", "y"), record("c", "z")];
        let (page, next) = paginate(records, 2, 0);
        assert_eq!(page.len(), 2);
        assert_eq!(next, Some(2));
    }

    #[test]
    fn test_paginate_last_page_exhausts() {
        let records = vec![record("a", "x"), record("b", "y"), record("c", "z")];
        let (page, next) = paginate(records, 2, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].file_id, "c");
        assert_eq!(next, None);
    }

    #[test]
    fn test_paginate_offset_past_end() {
        let records = vec![record("a", "x")];
        let (page, next) = paginate(records, 10, 5);
        assert!(page.is_empty());
        assert_eq!(next, None);
    }

    #[test]
    fn test_paginate_exact_boundary() {
        let records = vec![record("a", "x"), record("b", "y")];
        let (page, next) = paginate(records, 2, 0);
        assert_eq!(page.len(), 2);
        assert_eq!(next, None);
    }
}

//! Bigram aggregator - counts of ordered word-id pairs
//!
//! A pair moves through `absent -> 1 -> 2 -> ...` and never decreases.
//! Pairs with a non-positive id, or an id the dictionary never assigned,
//! are ignored without touching storage and without raising an error.

use rusqlite::{Connection, params};
use serde::Serialize;
use crate::dictionary::WordId;
use crate::storage::StoreHandle;
use crate::Result;

/// Record one occurrence of `(first, second)`.
///
/// Returns `Ok(true)` when the pair was counted and `Ok(false)` when it was
/// ignored because of an invalid or unknown id.
pub fn increment(handle: &StoreHandle, first: WordId, second: WordId) -> Result<bool> {
    increment_in(handle.conn()?, first, second)
}

pub(crate) fn increment_in(conn: &Connection, first: WordId, second: WordId) -> Result<bool> {
    if first <= 0 || second <= 0 {
        tracing::debug!("Ignoring bigram ({}, {}): ids must be positive", first, second);
        return Ok(false);
    }

    // Creation and first increment are one statement.
    let changed = conn.execute(
        r#"
        INSERT INTO bigrams (first_id, second_id, count)
        SELECT ?1, ?2, 1
        WHERE EXISTS (SELECT 1 FROM words WHERE id = ?1)
          AND EXISTS (SELECT 1 FROM words WHERE id = ?2)
        ON CONFLICT(first_id, second_id) DO UPDATE SET count = count + 1
        "#,
        params![first, second],
    )?;

    if changed == 0 {
        tracing::debug!("Ignoring bigram ({}, {}): unknown word id", first, second);
    }
    Ok(changed > 0)
}

/// Stored count for `(first, second)`, 0 when the pair was never seen
pub fn count(handle: &StoreHandle, first: WordId, second: WordId) -> Result<u64> {
    let count: i64 = handle.conn()?.query_row(
        "SELECT COALESCE(SUM(count), 0) FROM bigrams WHERE first_id = ?1 AND second_id = ?2",
        params![first, second],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Count all bigram rows
pub fn count_rows(handle: &StoreHandle) -> Result<usize> {
    let count: i64 = handle.conn()?.query_row("SELECT COUNT(*) FROM bigrams", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Sum of all counts
pub fn total_observations(handle: &StoreHandle) -> Result<u64> {
    let total: i64 = handle
        .conn()?
        .query_row("SELECT COALESCE(SUM(count), 0) FROM bigrams", [], |row| row.get(0))?;
    Ok(total as u64)
}

/// A counted pair with its word text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BigramRow {
    pub first_id: WordId,
    pub second_id: WordId,
    pub first: String,
    pub second: String,
    pub count: u64,
}

const SELECT_ROWS: &str = r#"
    SELECT b.first_id, b.second_id, w1.text, w2.text, b.count
    FROM bigrams b
    JOIN words w1 ON w1.id = b.first_id
    JOIN words w2 ON w2.id = b.second_id
"#;

/// Most frequent pairs, ties ordered by ids
pub fn top(handle: &StoreHandle, limit: usize) -> Result<Vec<BigramRow>> {
    let sql = format!("{SELECT_ROWS} ORDER BY b.count DESC, b.first_id, b.second_id LIMIT ?1");
    let mut stmt = handle.conn()?.prepare(&sql)?;

    let rows = stmt
        .query_map([limit as i64], row_to_bigram)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Words most often seen right after `word`
pub fn followers(handle: &StoreHandle, word: &str, limit: usize) -> Result<Vec<BigramRow>> {
    let sql = format!("{SELECT_ROWS} WHERE w1.text = ?1 ORDER BY b.count DESC, b.second_id LIMIT ?2");
    let mut stmt = handle.conn()?.prepare(&sql)?;

    let rows = stmt
        .query_map(params![word, limit as i64], row_to_bigram)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn row_to_bigram(row: &rusqlite::Row) -> rusqlite::Result<BigramRow> {
    let count: i64 = row.get(4)?;
    Ok(BigramRow {
        first_id: row.get(0)?,
        second_id: row.get(1)?,
        first: row.get(2)?,
        second: row.get(3)?,
        count: count as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::get_or_create_id;

    fn handle_with_words(words: &[&str]) -> (StoreHandle, Vec<WordId>) {
        let handle = StoreHandle::open_in_memory().unwrap();
        let ids = words.iter().map(|w| get_or_create_id(&handle, w).unwrap()).collect();
        (handle, ids)
    }

    #[test]
    fn test_valid_increment_adds_row() {
        let (handle, ids) = handle_with_words(&["cat", "the"]);
        let before = count_rows(&handle).unwrap();

        assert!(increment(&handle, ids[0], ids[1]).unwrap());

        assert_eq!(count_rows(&handle).unwrap(), before + 1);
        assert_eq!(count(&handle, ids[0], ids[1]).unwrap(), 1);
    }

    #[test]
    fn test_repeated_increment_counts_exactly() {
        let (handle, ids) = handle_with_words(&["a", "b"]);

        for _ in 0..5 {
            increment(&handle, ids[0], ids[1]).unwrap();
        }

        assert_eq!(count(&handle, ids[0], ids[1]).unwrap(), 5);
        assert_eq!(count_rows(&handle).unwrap(), 1);
    }

    #[test]
    fn test_order_matters() {
        let (handle, ids) = handle_with_words(&["a", "b", "c"]);

        increment(&handle, ids[0], ids[1]).unwrap();
        increment(&handle, ids[0], ids[1]).unwrap();
        increment(&handle, ids[1], ids[2]).unwrap();

        assert_eq!(count(&handle, ids[0], ids[1]).unwrap(), 2);
        assert_eq!(count(&handle, ids[1], ids[0]).unwrap(), 0);
        assert_eq!(count(&handle, ids[1], ids[2]).unwrap(), 1);
    }

    #[test]
    fn test_self_pair() {
        let (handle, ids) = handle_with_words(&["very"]);

        increment(&handle, ids[0], ids[0]).unwrap();

        assert_eq!(count(&handle, ids[0], ids[0]).unwrap(), 1);
    }

    #[test]
    fn test_negative_ids_ignored() {
        let handle = StoreHandle::open_in_memory().unwrap();

        assert!(!increment(&handle, -1, -1).unwrap());

        assert_eq!(count_rows(&handle).unwrap(), 0);
    }

    #[test]
    fn test_zero_ids_ignored() {
        let handle = StoreHandle::open_in_memory().unwrap();

        assert!(!increment(&handle, 0, 0).unwrap());

        assert_eq!(count_rows(&handle).unwrap(), 0);
    }

    #[test]
    fn test_one_invalid_id_leaves_counts_unchanged() {
        let (handle, ids) = handle_with_words(&["a", "b"]);
        increment(&handle, ids[0], ids[1]).unwrap();

        assert!(!increment(&handle, ids[0], 0).unwrap());
        assert!(!increment(&handle, -7, ids[1]).unwrap());
        assert!(!increment(&handle, ids[0], i64::MIN).unwrap());

        assert_eq!(count_rows(&handle).unwrap(), 1);
        assert_eq!(count(&handle, ids[0], ids[1]).unwrap(), 1);
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let (handle, ids) = handle_with_words(&["a"]);

        assert!(!increment(&handle, ids[0], ids[0] + 42).unwrap());
        assert!(!increment(&handle, 9_999, 10_000).unwrap());

        assert_eq!(count_rows(&handle).unwrap(), 0);
    }

    #[test]
    fn test_top_and_followers() {
        let (handle, ids) = handle_with_words(&["the", "cat", "dog"]);
        let (the, cat, dog) = (ids[0], ids[1], ids[2]);
        for _ in 0..3 {
            increment(&handle, the, cat).unwrap();
        }
        increment(&handle, the, dog).unwrap();
        increment(&handle, cat, the).unwrap();

        let ranked = top(&handle, 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].first.as_str(), ranked[0].second.as_str(), ranked[0].count), ("the", "cat", 3));
        assert_eq!(ranked[1].count, 1);
        assert_eq!((ranked[1].first_id, ranked[1].second_id), (the, dog));

        let next: Vec<_> = followers(&handle, "the", 10)
            .unwrap()
            .into_iter()
            .map(|row| row.second)
            .collect();
        assert_eq!(next, vec!["cat", "dog"]);

        assert!(followers(&handle, "unknown", 10).unwrap().is_empty());
        assert_eq!(total_observations(&handle).unwrap(), 5);
    }
}

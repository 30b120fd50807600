//! Word dictionary - stable integer ids for distinct words
//!
//! Ids are assigned by SQLite on first insertion and are always positive.
//! Lookups are idempotent: a known word keeps its id forever.

use rusqlite::{Connection, OptionalExtension};
use crate::storage::StoreHandle;
use crate::Result;

/// Identifier of a word in the dictionary.
///
/// Signed so that callers can hand the aggregator out-of-range values;
/// only positive ids ever exist in a store.
pub type WordId = i64;

/// Look up `word`, inserting it with the next free id if absent
pub fn get_or_create_id(handle: &StoreHandle, word: &str) -> Result<WordId> {
    get_or_create_id_in(handle.conn()?, word)
}

pub(crate) fn get_or_create_id_in(conn: &Connection, word: &str) -> Result<WordId> {
    let inserted = conn.execute("INSERT OR IGNORE INTO words (text) VALUES (?1)", [word])?;
    let id = conn.query_row("SELECT id FROM words WHERE text = ?1", [word], |row| row.get(0))?;
    if inserted > 0 {
        tracing::trace!("New word {:?} -> {}", word, id);
    }
    Ok(id)
}

/// Find the id of `word` without creating it
pub fn lookup_id(handle: &StoreHandle, word: &str) -> Result<Option<WordId>> {
    handle
        .conn()?
        .query_row("SELECT id FROM words WHERE text = ?1", [word], |row| row.get(0))
        .optional()
        .map_err(Into::into)
}

/// Reverse lookup
pub fn word_for_id(handle: &StoreHandle, id: WordId) -> Result<Option<String>> {
    handle
        .conn()?
        .query_row("SELECT text FROM words WHERE id = ?1", [id], |row| row.get(0))
        .optional()
        .map_err(Into::into)
}

/// Count all words
pub fn count_words(handle: &StoreHandle) -> Result<usize> {
    let count: i64 = handle.conn()?.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
    Ok(count as usize)
}

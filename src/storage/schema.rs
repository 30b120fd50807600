//! Database schema definitions

/// Pragmas applied to every new connection
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the words table.
/// AUTOINCREMENT keeps ids from being reused after a delete.
pub const CREATE_WORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the bigrams table
pub const CREATE_BIGRAMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bigrams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_id INTEGER NOT NULL REFERENCES words(id),
    second_id INTEGER NOT NULL REFERENCES words(id),
    count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
    UNIQUE(first_id, second_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_bigrams_second ON bigrams(second_id)",
    "CREATE INDEX IF NOT EXISTS idx_bigrams_count ON bigrams(count)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_WORDS_TABLE, CREATE_BIGRAMS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

//! Storage Layer - SQLite-backed persistence
//!
//! One database file holds two tables:
//! - words(id, text)
//! - bigrams(first_id, second_id, count)

pub mod schema;
pub mod sqlite;

pub use sqlite::{Store, StoreHandle, StoreStats};

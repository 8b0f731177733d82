//! Database module: quote rows, schema, and SQLite access.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for the quote table (SQLite)
//! - `sqlite.rs`: pool construction, schema ensure, insert and random-row query

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbQuote;
pub use schema::{QUOTES_TABLE, SQLITE_INIT};
pub use sqlite::{QuoteStore, SqlitePool, connect};

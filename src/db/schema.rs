//! SQL DDL for the quote table.

pub const QUOTES_TABLE: &str = "quotes";

/// Column widths, in characters.
pub const TEXT_MAX_CHARS: usize = 1000;
pub const META_MAX_CHARS: usize = 200;

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (ids are never reused)
/// - `text` required, non-blank, at most 1000 chars
/// - `author` / `source` nullable, at most 200 chars
/// - `created_at` filled by the store as RFC3339 UTC
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL CHECK (length(trim(text)) > 0 AND length(text) <= 1000),
    author TEXT NULL CHECK (author IS NULL OR length(author) <= 200),
    source TEXT NULL CHECK (source IS NULL OR length(source) <= 200),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
"#;

/// Cut `s` to at most `max` characters, on a char boundary.
pub fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

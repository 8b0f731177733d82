use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored quote row.
#[derive(Debug, Clone, PartialEq)]
pub struct DbQuote {
    pub id: i64,
    pub text: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a quote; row id and insert time stay internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteBody {
    pub text: String,
    pub author: Option<String>,
    pub source: Option<String>,
}

impl From<DbQuote> for QuoteBody {
    fn from(q: DbQuote) -> Self {
        Self {
            text: q.text,
            author: q.author,
            source: q.source,
        }
    }
}

//! First-run seeding: ensure schema, check emptiness, seed once.
//!
//! Every failure is caught here and reported as a [`SeedOutcome`]; nothing on
//! this path can stop the HTTP server from serving.

use crate::db::QuoteStore;
use crate::error::QuoteError;
use crate::service::seed_source::SeedSource;
use std::fmt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Progress of a single seeding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPhase {
    NotStarted,
    SchemaChecked,
    CountChecked,
    Seeding,
    Skipped,
    Seeded,
    SeedFailed,
    Failed,
}

impl SeedPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SeedPhase::Skipped | SeedPhase::Seeded | SeedPhase::SeedFailed | SeedPhase::Failed
        )
    }
}

impl fmt::Display for SeedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeedPhase::NotStarted => "not_started",
            SeedPhase::SchemaChecked => "schema_checked",
            SeedPhase::CountChecked => "count_checked",
            SeedPhase::Seeding => "seeding",
            SeedPhase::Skipped => "skipped",
            SeedPhase::Seeded => "seeded",
            SeedPhase::SeedFailed => "seed_failed",
            SeedPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why a seeding attempt on an empty table did not complete.
#[derive(Debug)]
pub enum SeedFailure {
    /// The seed document could not be fetched or parsed.
    Fetch(QuoteError),
    /// The document held no valid candidates.
    NoCandidates,
    /// An insert failed; rows inserted before it remain.
    Insert { inserted: usize, error: QuoteError },
}

impl fmt::Display for SeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedFailure::Fetch(e) => write!(f, "seed fetch failed: {e}"),
            SeedFailure::NoCandidates => f.write_str("no usable seed data"),
            SeedFailure::Insert { inserted, error } => {
                write!(f, "insert failed after {inserted} rows: {error}")
            }
        }
    }
}

/// Terminal result of a seeding pass.
#[derive(Debug)]
pub enum SeedOutcome {
    /// Table already had rows; nothing inserted.
    Skipped { existing: i64 },
    Seeded { inserted: usize },
    SeedFailed(SeedFailure),
    /// Schema or count check failed before seeding could be considered.
    Failed(QuoteError),
}

impl SeedOutcome {
    pub fn phase(&self) -> SeedPhase {
        match self {
            SeedOutcome::Skipped { .. } => SeedPhase::Skipped,
            SeedOutcome::Seeded { .. } => SeedPhase::Seeded,
            SeedOutcome::SeedFailed(_) => SeedPhase::SeedFailed,
            SeedOutcome::Failed(_) => SeedPhase::Failed,
        }
    }

    /// Rows this pass added to the table.
    pub fn inserted(&self) -> usize {
        match self {
            SeedOutcome::Seeded { inserted } => *inserted,
            SeedOutcome::SeedFailed(SeedFailure::Insert { inserted, .. }) => *inserted,
            _ => 0,
        }
    }
}

pub struct SeedCoordinator<S> {
    store: QuoteStore,
    source: S,
    phase: SeedPhase,
}

impl<S: SeedSource> SeedCoordinator<S> {
    pub fn new(store: QuoteStore, source: S) -> Self {
        Self {
            store,
            source,
            phase: SeedPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> SeedPhase {
        self.phase
    }

    fn advance(&mut self, next: SeedPhase) {
        debug!(from = %self.phase, to = %next, "seed phase");
        self.phase = next;
    }

    /// Run one seeding pass to a terminal phase.
    pub async fn run(&mut self) -> SeedOutcome {
        let outcome = self.drive().await;
        self.advance(outcome.phase());
        match &outcome {
            SeedOutcome::Skipped { existing } => {
                info!(existing, "quotes already present; skipping seed");
            }
            SeedOutcome::Seeded { inserted } => {
                info!(inserted, "seeded quotes");
            }
            SeedOutcome::SeedFailed(reason) => {
                warn!(inserted = outcome.inserted(), reason = %reason, "seeding skipped");
            }
            SeedOutcome::Failed(e) => {
                error!(error = %e, "seeding aborted; serving without seed");
            }
        }
        outcome
    }

    async fn drive(&mut self) -> SeedOutcome {
        match self.store.ensure_table_exists().await {
            Ok(created) => debug!(created, "quote table ensured"),
            Err(e) => return SeedOutcome::Failed(e),
        }
        self.advance(SeedPhase::SchemaChecked);

        let existing = match self.store.count().await {
            Ok(n) => n,
            Err(e) => return SeedOutcome::Failed(e),
        };
        self.advance(SeedPhase::CountChecked);
        if existing > 0 {
            return SeedOutcome::Skipped { existing };
        }

        self.advance(SeedPhase::Seeding);
        let candidates = match self.source.load_candidates().await {
            Ok(c) if c.is_empty() => return SeedOutcome::SeedFailed(SeedFailure::NoCandidates),
            Ok(c) => c,
            Err(e) => return SeedOutcome::SeedFailed(SeedFailure::Fetch(e)),
        };

        // One statement per row, no transaction: earlier rows survive a later failure.
        let mut inserted = 0;
        for candidate in &candidates {
            if let Err(error) = self.store.insert(candidate).await {
                return SeedOutcome::SeedFailed(SeedFailure::Insert { inserted, error });
            }
            inserted += 1;
        }
        SeedOutcome::Seeded { inserted }
    }
}

impl<S: SeedSource + 'static> SeedCoordinator<S> {
    /// Run seeding in the background. Requests are not held back while it runs;
    /// aborting the handle stops it between statements.
    pub fn spawn(mut self) -> JoinHandle<SeedOutcome> {
        tokio::spawn(async move { self.run().await })
    }
}

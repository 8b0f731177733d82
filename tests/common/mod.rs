#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use quote_seeder::config::DatabaseConfig;
use quote_seeder::db::{QuoteStore, connect};
use quote_seeder::service::seed_source::SeedSource;
use quote_seeder::{QuoteError, SeedCandidate};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceExt;

/// A store backed by a fresh SQLite file under the system temp dir.
pub struct TempStore {
    pub store: QuoteStore,
    pub path: PathBuf,
}

impl TempStore {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let cfg = DatabaseConfig {
            server: std::env::temp_dir().display().to_string(),
            name: format!("quote-seeder-{tag}-{}-{nanos}", std::process::id()),
            ..DatabaseConfig::default()
        };
        let path = cfg.database_path();
        Self {
            store: QuoteStore::new(connect(&cfg)),
            path,
        }
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let _ = fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

pub fn candidate(text: &str, author: Option<&str>, source: Option<&str>) -> SeedCandidate {
    SeedCandidate {
        text: text.to_string(),
        author: author.map(str::to_string),
        source: source.map(str::to_string),
    }
}

/// Returns fixed candidates and counts how often it was asked.
#[derive(Clone, Default)]
pub struct StaticSource {
    pub candidates: Vec<SeedCandidate>,
    pub calls: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(candidates: Vec<SeedCandidate>) -> Self {
        Self {
            candidates,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SeedSource for StaticSource {
    async fn load_candidates(&self) -> Result<Vec<SeedCandidate>, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }
}

/// Always fails as an unreachable object store would.
pub struct FailingSource;

impl SeedSource for FailingSource {
    async fn load_candidates(&self) -> Result<Vec<SeedCandidate>, QuoteError> {
        Err(QuoteError::SeedFetch("connection refused".to_string()))
    }
}

/// Holds the download open until the gate is opened.
pub struct GatedSource {
    pub gate: Arc<Notify>,
    pub candidates: Vec<SeedCandidate>,
}

impl SeedSource for GatedSource {
    async fn load_candidates(&self) -> Result<Vec<SeedCandidate>, QuoteError> {
        self.gate.notified().await;
        Ok(self.candidates.clone())
    }
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("response body was not json");
    (status, json)
}

/// Serve `app` on an ephemeral localhost port; returns its base URL.
pub async fn serve_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().expect("stub listener has no address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

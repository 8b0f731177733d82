use crate::api::blob_api::{BlobApi, redact};
use crate::config::Config;
use crate::credential::{CredentialProvider, STORAGE_SCOPE};
use crate::error::QuoteError;
use crate::types::seed::{SeedCandidate, parse_candidates};
use std::future::Future;
use tracing::{info, warn};
use url::Url;

/// Supplies validated candidates for first-run seeding.
pub trait SeedSource: Send + Sync {
    /// An empty list means "no usable seed data", not failure.
    fn load_candidates(
        &self,
    ) -> impl Future<Output = Result<Vec<SeedCandidate>, QuoteError>> + Send;
}

/// Seed document stored as a blob in object storage.
pub struct BlobSeedSource {
    client: reqwest::Client,
    blob_url: Url,
    credentials: CredentialProvider,
}

impl BlobSeedSource {
    pub fn new(client: reqwest::Client, blob_url: Url, credentials: CredentialProvider) -> Self {
        Self {
            client,
            blob_url,
            credentials,
        }
    }

    pub fn from_config(cfg: &Config, client: reqwest::Client) -> Result<Self, QuoteError> {
        let blob_url = cfg
            .seed
            .blob_url
            .clone()
            .ok_or_else(|| QuoteError::Configuration("seed.blob_url is not set".to_string()))?;
        let credentials = CredentialProvider::from_config(cfg, client.clone());
        Ok(Self::new(client, blob_url, credentials))
    }
}

impl SeedSource for BlobSeedSource {
    async fn load_candidates(&self) -> Result<Vec<SeedCandidate>, QuoteError> {
        info!(
            url = %redact(&self.blob_url),
            credential = self.credentials.kind(),
            "downloading seed quotes"
        );
        let token = self.credentials.access_token(STORAGE_SCOPE).await?;
        let body = BlobApi::download(&self.client, &self.blob_url, &token).await?;
        let candidates = parse_candidates(&body)?;
        if candidates.is_empty() {
            warn!(bytes = body.len(), "seed document holds no usable quotes");
        } else {
            info!(count = candidates.len(), "seed document parsed");
        }
        Ok(candidates)
    }
}

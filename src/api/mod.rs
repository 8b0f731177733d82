pub mod blob_api;

use crate::config::HttpConfig;
use crate::error::QuoteError;
use std::time::Duration;

/// Shared outbound HTTP client for the object store and identity endpoint.
pub fn build_http_client(cfg: &HttpConfig) -> Result<reqwest::Client, QuoteError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("quote-seeder/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(cfg.timeout_secs.max(1)));
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

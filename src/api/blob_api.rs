use crate::credential::AccessToken;
use crate::error::QuoteError;
use url::Url;

pub struct BlobApi;

impl BlobApi {
    /// Download a whole blob. Single attempt; any non-2xx is an error.
    pub async fn download(
        client: &reqwest::Client,
        url: &Url,
        token: &AccessToken,
    ) -> Result<Vec<u8>, QuoteError> {
        let resp = token.authorize(client, url).send().await.map_err(|e| {
            QuoteError::SeedFetch(format!("{}: {}", redact(url), e.without_url()))
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::SeedFetch(format!(
                "{} returned {}",
                redact(url),
                status
            )));
        }
        let body = resp.bytes().await?;
        Ok(body.to_vec())
    }
}

/// URL without query or credentials, safe to log.
pub fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    let _ = clean.set_password(None);
    let _ = clean.set_username("");
    clean.to_string()
}

use super::provider::AccessToken;
use crate::config::IdentityConfig;
use crate::error::QuoteError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

const IMDS_API_VERSION: &str = "2018-02-01";
const HOSTED_API_VERSION: &str = "2019-08-01";

/// Where the hosting environment hands out identity tokens.
#[derive(Debug, Clone)]
enum TokenEndpoint {
    /// Instance metadata service; requires `Metadata: true`.
    Imds(Url),
    /// Hosted-app identity endpoint guarded by a shared header secret.
    Hosted { url: Url, header: String },
}

/// Ambient managed-identity credential.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    client: reqwest::Client,
    endpoint: TokenEndpoint,
    client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<Value>,
}

impl ManagedIdentityCredential {
    pub fn new(client: reqwest::Client, cfg: &IdentityConfig) -> Self {
        let endpoint = match cfg.header.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(header) => TokenEndpoint::Hosted {
                url: cfg.endpoint.clone(),
                header: header.to_string(),
            },
            None => TokenEndpoint::Imds(cfg.endpoint.clone()),
        };
        Self {
            client,
            endpoint,
            client_id: cfg.client_id.clone().filter(|c| !c.trim().is_empty()),
        }
    }

    /// Request a bearer token for `scope` from the hosting environment.
    pub async fn get_token(&self, scope: &str) -> Result<AccessToken, QuoteError> {
        let resource = scope_to_resource(scope);
        let (mut url, api_version) = match &self.endpoint {
            TokenEndpoint::Imds(url) => (url.clone(), IMDS_API_VERSION),
            TokenEndpoint::Hosted { url, .. } => (url.clone(), HOSTED_API_VERSION),
        };
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("api-version", api_version);
            q.append_pair("resource", resource);
            if let Some(id) = &self.client_id {
                q.append_pair("client_id", id);
            }
        }
        debug!(endpoint = %url, "requesting managed identity token");

        let req = match &self.endpoint {
            TokenEndpoint::Imds(_) => self.client.get(url).header("Metadata", "true"),
            TokenEndpoint::Hosted { header, .. } => {
                self.client.get(url).header("X-IDENTITY-HEADER", header)
            }
        };
        let resp = req
            .send()
            .await
            .map_err(|e| QuoteError::Credential(format!("token endpoint unreachable: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Credential(format!(
                "token endpoint returned {status}"
            )));
        }
        let payload: TokenResponse = resp
            .json()
            .await
            .map_err(|e| QuoteError::Credential(format!("invalid token response: {e}")))?;

        let expires_on = payload.expires_on.as_ref().and_then(parse_expires_on);
        info!(resource, expires_on = ?expires_on, "managed identity token acquired");
        Ok(AccessToken::Bearer {
            token: payload.access_token,
            expires_on,
        })
    }
}

/// `https://storage.azure.com/.default` -> `https://storage.azure.com/`
fn scope_to_resource(scope: &str) -> &str {
    scope.strip_suffix(".default").unwrap_or(scope)
}

/// Token endpoints report expiry as epoch seconds, either as a number or a
/// numeric string.
fn parse_expires_on(v: &Value) -> Option<DateTime<Utc>> {
    let secs = match v {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}

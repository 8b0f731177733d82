use super::STORAGE_API_VERSION;
use super::managed_identity::ManagedIdentityCredential;
use crate::config::Config;
use crate::error::QuoteError;
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;
use url::Url;

/// Credential acquired for one object-store request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessToken {
    /// SAS query string, without the leading `?`.
    SharedAccess(String),
    Bearer {
        token: String,
        expires_on: Option<DateTime<Utc>>,
    },
}

impl AccessToken {
    /// Build an authorized GET for `url`.
    pub fn authorize(&self, client: &reqwest::Client, url: &Url) -> RequestBuilder {
        match self {
            AccessToken::SharedAccess(sas) => client.get(with_sas(url, sas)),
            AccessToken::Bearer { token, .. } => client
                .get(url.clone())
                .bearer_auth(token)
                .header("x-ms-version", STORAGE_API_VERSION),
        }
    }
}

/// Append SAS parameters to whatever query the URL already carries.
pub fn with_sas(url: &Url, sas: &str) -> Url {
    let mut url = url.clone();
    let query = match url.query() {
        Some(q) if !q.is_empty() => format!("{q}&{sas}"),
        _ => sas.to_string(),
    };
    url.set_query(Some(&query));
    url
}

/// Strategy for obtaining object-store credentials.
#[derive(Debug, Clone)]
pub enum CredentialProvider {
    SharedAccess { token: String },
    ManagedIdentity(ManagedIdentityCredential),
}

impl CredentialProvider {
    /// SAS when one is configured, otherwise the ambient managed identity.
    pub fn from_config(cfg: &Config, client: reqwest::Client) -> Self {
        match cfg.seed.sas_token() {
            Some(token) => CredentialProvider::SharedAccess {
                token: token.to_string(),
            },
            None => CredentialProvider::ManagedIdentity(ManagedIdentityCredential::new(
                client,
                &cfg.identity,
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CredentialProvider::SharedAccess { .. } => "shared_access",
            CredentialProvider::ManagedIdentity(_) => "managed_identity",
        }
    }

    pub async fn access_token(&self, scope: &str) -> Result<AccessToken, QuoteError> {
        match self {
            CredentialProvider::SharedAccess { token } => {
                Ok(AccessToken::SharedAccess(token.clone()))
            }
            CredentialProvider::ManagedIdentity(mi) => mi.get_token(scope).await,
        }
    }
}

//! Credentials for the seed object store.
//!
//! Either an explicit shared-access (SAS) token from configuration, or a
//! bearer token obtained from the hosting environment's managed identity.

pub mod managed_identity;
pub mod provider;

pub use managed_identity::ManagedIdentityCredential;
pub use provider::{AccessToken, CredentialProvider};

/// Token scope for blob storage.
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// Service version sent with bearer-authenticated blob requests.
pub const STORAGE_API_VERSION: &str = "2021-08-06";

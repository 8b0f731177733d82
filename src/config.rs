//! Service configuration.
//!
//! Layered with figment: built-in defaults, then an optional `config.toml`,
//! then the environment. Environment keys nest on `__`, so `DATABASE__SERVER`,
//! `Database__Server` and `QUOTES_DATABASE__SERVER` all land on
//! `database.server`. The hosted
//! identity variables `IDENTITY_ENDPOINT` / `IDENTITY_HEADER` are honored too.

use crate::error::QuoteError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "QUOTES_";

/// Well-known instance metadata endpoint for managed identity tokens.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

const SECTIONS: [&str; 5] = ["basic__", "database__", "seed__", "identity__", "http__"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub identity: IdentityConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: SocketAddr,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory hosting the database file.
    pub server: String,
    /// Database file stem.
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            name: String::new(),
            max_connections: 8,
            connect_timeout_secs: 15,
        }
    }
}

impl DatabaseConfig {
    /// `<server>/<name>.sqlite`
    pub fn database_path(&self) -> PathBuf {
        Path::new(self.server.trim()).join(format!("{}.sqlite", self.name.trim()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub blob_url: Option<Url>,
    pub sas_token: Option<String>,
}

impl SeedConfig {
    /// Configured SAS token without a leading `?`, if any non-blank one is set.
    pub fn sas_token(&self) -> Option<&str> {
        self.sas_token
            .as_deref()
            .map(|t| t.trim().trim_start_matches('?'))
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub endpoint: Url,
    /// Shared secret for hosted-app identity endpoints; IMDS when unset.
    pub header: Option<String>,
    pub client_id: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_IDENTITY_ENDPOINT).expect("static identity endpoint"),
            header: None,
            client_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub proxy: Option<Url>,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_secs: 30,
        }
    }
}

/// Map a flat env key onto a config path: `Seed__BlobUrl` and
/// `SEED__BLOB_URL` both become `seed.blob_url`.
fn env_key(raw: &str) -> String {
    raw.split("__")
        .map(|seg| {
            let mixed = seg.chars().any(|c| c.is_ascii_lowercase())
                && seg.chars().any(|c| c.is_ascii_uppercase());
            if !mixed || seg.contains('_') {
                return seg.to_ascii_lowercase();
            }
            let mut out = String::with_capacity(seg.len() + 4);
            for (i, c) in seg.chars().enumerate() {
                if c.is_ascii_uppercase() && i > 0 {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl Config {
    /// Load from `config.toml` (if present) and the process environment.
    pub fn load() -> Result<Self, QuoteError> {
        Self::from_figment(Self::figment(CONFIG_FILE))
    }

    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(
                Env::raw()
                    .filter(|k| {
                        let k = k.as_str().to_ascii_lowercase();
                        SECTIONS.iter().any(|s| k.starts_with(s))
                    })
                    .map(|k| env_key(k.as_str()).into()),
            )
            .merge(
                Env::raw()
                    .only(&["identity_endpoint", "identity_header"])
                    .map(|k| k.as_str().replacen("identity_", "identity.", 1).into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).map(|k| env_key(k.as_str()).into()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, QuoteError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations missing any value needed before serving.
    pub fn validate(&self) -> Result<(), QuoteError> {
        let mut missing = Vec::new();
        if self.database.server.trim().is_empty() {
            missing.push("database.server");
        }
        if self.database.name.trim().is_empty() {
            missing.push("database.name");
        }
        if self.seed.blob_url.is_none() {
            missing.push("seed.blob_url");
        }
        if !missing.is_empty() {
            return Err(QuoteError::Configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        if self.database.max_connections == 0 {
            return Err(QuoteError::Configuration(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Config {
        let mut cfg = Config::default();
        cfg.database.server = "/var/lib/quotes".to_string();
        cfg.database.name = "quotes".to_string();
        cfg.seed.blob_url =
            Some(Url::parse("https://acct.blob.core.windows.net/seed/quotes.json").unwrap());
        cfg
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn validate_lists_every_missing_setting() {
        let err = Config::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, QuoteError::Configuration(_)));
        assert!(msg.contains("database.server"));
        assert!(msg.contains("database.name"));
        assert!(msg.contains("seed.blob_url"));
    }

    #[test]
    fn blank_database_name_is_missing() {
        let mut cfg = complete();
        cfg.database.name = "   ".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("database.name"));
    }

    #[test]
    fn sas_token_strips_question_mark_and_blanks() {
        let mut seed = SeedConfig::default();
        assert_eq!(seed.sas_token(), None);
        seed.sas_token = Some("  ".to_string());
        assert_eq!(seed.sas_token(), None);
        seed.sas_token = Some("?sv=2022&sig=abc".to_string());
        assert_eq!(seed.sas_token(), Some("sv=2022&sig=abc"));
    }

    #[test]
    fn database_path_joins_server_and_name() {
        let cfg = complete();
        assert_eq!(
            cfg.database.database_path(),
            PathBuf::from("/var/lib/quotes/quotes.sqlite")
        );
    }

    #[test]
    fn toml_sections_are_hierarchical() {
        let mut path = std::env::temp_dir();
        path.push(format!("quote-seeder-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[basic]
listen_addr = "127.0.0.1:9000"

[database]
server = "/data"
name = "famous"

[seed]
blob_url = "https://acct.blob.core.windows.net/seed/quotes.json"
sas_token = "sv=1&sig=2"
"#,
        )
        .unwrap();

        let figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&path));
        let cfg = Config::from_figment(figment).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            cfg.basic.listen_addr,
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(cfg.database.name, "famous");
        assert_eq!(cfg.database.max_connections, 8);
        assert_eq!(cfg.seed.sas_token(), Some("sv=1&sig=2"));
    }

    #[test]
    fn env_key_accepts_pascal_and_upper_snake() {
        assert_eq!(env_key("Seed__BlobUrl"), "seed.blob_url");
        assert_eq!(env_key("Seed__SasToken"), "seed.sas_token");
        assert_eq!(env_key("SEED__BLOB_URL"), "seed.blob_url");
        assert_eq!(env_key("database__max_connections"), "database.max_connections");
        assert_eq!(env_key("Database__Name"), "database.name");
        assert_eq!(env_key("Identity__ClientId"), "identity.client_id");
    }

    #[test]
    fn flat_pascal_case_env_keys_bind() {
        let vars = [
            ("Database__Server", "/srv/quotes"),
            ("Database__Name", "famous"),
            (
                "Seed__BlobUrl",
                "https://acct.blob.core.windows.net/seed/quotes.json",
            ),
            ("Seed__SasToken", "sv=1&sig=2"),
        ];
        // SAFETY: no other test in this binary reads these variables.
        for (k, v) in vars {
            unsafe { std::env::set_var(k, v) };
        }
        let result = Config::from_figment(Config::figment("/nonexistent/quote-seeder.toml"));
        for (k, _) in vars {
            unsafe { std::env::remove_var(k) };
        }

        let cfg = result.unwrap();
        assert_eq!(cfg.database.server, "/srv/quotes");
        assert_eq!(cfg.database.name, "famous");
        assert_eq!(
            cfg.seed.blob_url.as_ref().map(Url::as_str),
            Some("https://acct.blob.core.windows.net/seed/quotes.json")
        );
        assert_eq!(cfg.seed.sas_token(), Some("sv=1&sig=2"));
    }
}

//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `DOCSEAL__*` environment variables. The legacy
//! `PINATA_API_KEY` / `PINATA_SECRET_KEY` / `GEMINI_API_KEY` variables are
//! folded in last so existing deployments keep working.

use std::fmt;
use std::path::{Path, PathBuf};

use docseal::SigningConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "docseal.toml";
pub const ENV_PREFIX: &str = "DOCSEAL";
pub const DEFAULT_PINATA_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding one artifact record per signed document
    pub storage_dir: PathBuf,
    /// Largest accepted multipart upload, in bytes
    pub max_upload_bytes: usize,
    /// When set, JSON logs are also written to a daily rolling file here
    pub log_dir: Option<PathBuf>,
    pub signing: SigningConfig,
    pub pinata: Option<PinataConfig>,
    pub gemini: Option<GeminiConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage_dir: PathBuf::from("./storage"),
            max_upload_bytes: 25 * 1024 * 1024,
            log_dir: None,
            signing: SigningConfig::default(),
            pinata: None,
            gemini: None,
        }
    }
}

/// Pinata pinning credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct PinataConfig {
    pub api_key: String,
    pub secret_key: String,
    #[serde(default = "default_pinata_url")]
    pub base_url: String,
}

fn default_pinata_url() -> String {
    DEFAULT_PINATA_URL.to_string()
}

impl fmt::Debug for PinataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataConfig")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini assistant credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_url() -> String {
    DEFAULT_GEMINI_URL.to_string()
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from file and process environment.
    ///
    /// An explicit `path` must exist; the default `docseal.toml` is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut loaded: ServerConfig = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.apply_legacy_env(|name| std::env::var(name).ok());
        loaded.validate()?;
        Ok(loaded)
    }

    /// Fold the flat `PINATA_*` / `GEMINI_API_KEY` credential variables into the config
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if self.pinata.is_none() {
            if let (Some(api_key), Some(secret_key)) =
                (non_empty("PINATA_API_KEY"), non_empty("PINATA_SECRET_KEY"))
            {
                self.pinata = Some(PinataConfig {
                    api_key,
                    secret_key,
                    base_url: default_pinata_url(),
                });
            }
        }

        if self.gemini.is_none() {
            if let Some(api_key) = non_empty("GEMINI_API_KEY") {
                self.gemini = Some(GeminiConfig {
                    api_key,
                    model: default_gemini_model(),
                    base_url: default_gemini_url(),
                });
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.signing.validate()?;
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal::ResignPolicy;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_dir, PathBuf::from("./storage"));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.pinata.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_env_folding() {
        let vars: HashMap<&str, &str> = [
            ("PINATA_API_KEY", "pk"),
            ("PINATA_SECRET_KEY", "sk"),
            ("GEMINI_API_KEY", "gk"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_legacy_env(|name| vars.get(name).map(|v| v.to_string()));

        let pinata = config.pinata.unwrap();
        assert_eq!(pinata.api_key, "pk");
        assert_eq!(pinata.secret_key, "sk");
        assert_eq!(pinata.base_url, DEFAULT_PINATA_URL);
        assert_eq!(config.gemini.unwrap().model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_legacy_env_requires_both_pinata_keys() {
        let mut config = ServerConfig::default();
        config.apply_legacy_env(|name| (name == "PINATA_API_KEY").then(|| "pk".to_string()));
        assert!(config.pinata.is_none());
    }

    #[test]
    fn test_secrets_are_redacted() {
        let config = PinataConfig {
            api_key: "super-secret".to_string(),
            secret_key: "even-more-secret".to_string(),
            base_url: DEFAULT_PINATA_URL.to_string(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_load_from_file_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            r#"
port = 9000
storage_dir = "/var/lib/docseal"

[signing]
key_bits = 3072
resign_policy = "reject"
"#,
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("DOCSEAL__PORT", Some("9100")),
                ("PINATA_API_KEY", None),
                ("GEMINI_API_KEY", None),
            ],
            || {
                let config = ServerConfig::load(Some(&path)).unwrap();
                assert_eq!(config.port, 9100);
                assert_eq!(config.storage_dir, PathBuf::from("/var/lib/docseal"));
                assert_eq!(config.signing.key_bits, 3072);
                assert_eq!(config.signing.resign_policy, ResignPolicy::Reject);
                assert_eq!(config.host, "0.0.0.0");
            },
        );
    }

    #[test]
    #[serial]
    fn test_load_rejects_weak_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weak.toml");
        std::fs::write(&path, "[signing]\nkey_bits = 1024\n").unwrap();
        assert!(ServerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(ServerConfig::load(Some(Path::new("/nonexistent/docseal.toml"))).is_err());
    }
}

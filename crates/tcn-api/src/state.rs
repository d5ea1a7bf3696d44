//! # Application State & Configuration
//!
//! [`AppConfig`] is assembled once at startup by [`AppConfig::load`]: an
//! optional YAML file named by `TCN_CONFIG`, then environment overrides.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `PORT` | `port` | `8080` |
//! | `TCN_ORG_MSPID` | `org_mspid` | `Org1MSP` |
//! | `TCN_VERIFIER_MSPID` | `verifier_mspid` | `Org1MSP` |
//! | `AUTH_TOKEN` | `auth_token` | unset (auth disabled) |
//! | `TCN_SEED_LEDGER` | `seed_ledger` | `false` |
//! | `TCN_LEDGER_SNAPSHOT` | `ledger_snapshot` | unset (memory only) |
//! | `TCN_STRICT_LISTING` | `strict_listing` | `false` |
//! | `TCN_METRICS_ENABLED` | `metrics_enabled` | `true` |
//! | `TCN_LOG_JSON` | `log_json` | `false` |
//!
//! [`AppState`] holds the credential service shared by every handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tcn_ledger::MemoryLedger;
use tcn_registry::{
    CredentialError, CredentialService, ListingMode, SingleVerifierPolicy,
    DEFAULT_VERIFIER_MSPID,
};
use thiserror::Error;

use crate::auth::SecretToken;

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

/// Gateway configuration.
///
/// Custom `Debug` redacts the bearer secret.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub port: u16,
    /// Organization every request acts as when auth is disabled.
    pub org_mspid: String,
    /// The one organization allowed to change verification status.
    pub verifier_mspid: String,
    pub auth_token: Option<SecretToken>,
    /// Write the sample credentials at startup.
    pub seed_ledger: bool,
    pub ledger_snapshot: Option<PathBuf>,
    /// Abort listings on unrecognized credential types.
    pub strict_listing: bool,
    pub metrics_enabled: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            org_mspid: DEFAULT_VERIFIER_MSPID.to_string(),
            verifier_mspid: DEFAULT_VERIFIER_MSPID.to_string(),
            auth_token: None,
            seed_ledger: false,
            ledger_snapshot: None,
            strict_listing: false,
            metrics_enabled: true,
            log_json: false,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("org_mspid", &self.org_mspid)
            .field("verifier_mspid", &self.verifier_mspid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("seed_ledger", &self.seed_ledger)
            .field("ledger_snapshot", &self.ledger_snapshot)
            .field("strict_listing", &self.strict_listing)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl AppConfig {
    /// Load from `TCN_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("TCN_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a YAML config file. Absent keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Override fields from environment variables read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("PORT") {
            self.port = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("TCN_ORG_MSPID") {
            self.org_mspid = v;
        }
        if let Some(v) = lookup("TCN_VERIFIER_MSPID") {
            self.verifier_mspid = v;
        }
        if let Some(v) = lookup("AUTH_TOKEN") {
            self.auth_token = (!v.is_empty()).then(|| SecretToken::new(v));
        }
        if let Some(v) = lookup("TCN_LEDGER_SNAPSHOT") {
            self.ledger_snapshot = (!v.trim().is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = lookup("TCN_SEED_LEDGER") {
            self.seed_ledger = parse_bool("TCN_SEED_LEDGER", &v)?;
        }
        if let Some(v) = lookup("TCN_STRICT_LISTING") {
            self.strict_listing = parse_bool("TCN_STRICT_LISTING", &v)?;
        }
        if let Some(v) = lookup("TCN_METRICS_ENABLED") {
            self.metrics_enabled = parse_bool("TCN_METRICS_ENABLED", &v)?;
        }
        if let Some(v) = lookup("TCN_LOG_JSON") {
            self.log_json = parse_bool("TCN_LOG_JSON", &v)?;
        }
        Ok(())
    }

    pub fn listing_mode(&self) -> ListingMode {
        if self.strict_listing {
            ListingMode::Strict
        } else {
            ListingMode::Lenient
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: CredentialService,
    /// Present when a Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("service", &self.service)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Default configuration over a fresh in-memory ledger.
    pub fn new() -> Self {
        let config = AppConfig::default();
        let ledger = MemoryLedger::new(config.org_mspid.clone());
        Self::assemble(config, ledger)
    }

    /// Build state from configuration, opening the snapshot file and seeding
    /// the ledger as configured.
    pub fn with_config(config: AppConfig) -> Result<Self, CredentialError> {
        let ledger = match &config.ledger_snapshot {
            Some(path) => MemoryLedger::open_snapshot(config.org_mspid.clone(), path)?,
            None => MemoryLedger::new(config.org_mspid.clone()),
        };
        Self::with_ledger(config, ledger)
    }

    /// Build state over an existing ledger.
    pub fn with_ledger(config: AppConfig, ledger: MemoryLedger) -> Result<Self, CredentialError> {
        let seed = config.seed_ledger;
        let state = Self::assemble(config, ledger);
        if seed {
            state.service.init_ledger()?;
        }
        Ok(state)
    }

    fn assemble(config: AppConfig, ledger: MemoryLedger) -> Self {
        let policy = Arc::new(SingleVerifierPolicy::new(config.verifier_mspid.clone()));
        let service = CredentialService::on_ledger(Arc::new(ledger), policy)
            .with_listing_mode(config.listing_mode());
        Self {
            config: Arc::new(config),
            service,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let c = AppConfig::default();
        assert_eq!(c.port, 8080);
        assert_eq!(c.org_mspid, "Org1MSP");
        assert_eq!(c.verifier_mspid, "Org1MSP");
        assert!(c.auth_token.is_none());
        assert!(c.metrics_enabled);
        assert_eq!(c.listing_mode(), ListingMode::Lenient);
    }

    #[test]
    fn env_overrides() {
        let mut c = AppConfig::default();
        c.apply_env(env(&[
            ("PORT", "9090"),
            ("TCN_ORG_MSPID", "Org2MSP"),
            ("AUTH_TOKEN", "s3cret"),
            ("TCN_STRICT_LISTING", "true"),
            ("TCN_METRICS_ENABLED", "0"),
            ("TCN_LEDGER_SNAPSHOT", "/tmp/ledger.json"),
        ]))
        .unwrap();
        assert_eq!(c.port, 9090);
        assert_eq!(c.org_mspid, "Org2MSP");
        assert_eq!(c.verifier_mspid, "Org1MSP");
        assert_eq!(c.auth_token.as_ref().unwrap().expose(), "s3cret");
        assert_eq!(c.listing_mode(), ListingMode::Strict);
        assert!(!c.metrics_enabled);
        assert_eq!(c.ledger_snapshot, Some(PathBuf::from("/tmp/ledger.json")));
    }

    #[test]
    fn empty_auth_token_disables_auth() {
        let mut c = AppConfig::default();
        c.apply_env(env(&[("AUTH_TOKEN", "")])).unwrap();
        assert!(c.auth_token.is_none());
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut c = AppConfig::default();
        assert!(matches!(
            c.apply_env(env(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidEnv { var: "PORT", .. })
        ));
        assert!(c.apply_env(env(&[("TCN_SEED_LEDGER", "maybe")])).is_err());
    }

    #[test]
    fn yaml_file_with_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcn.yaml");
        std::fs::write(
            &path,
            "port: 7000\nverifier_mspid: UniversityMSP\nseed_ledger: true\n",
        )
        .unwrap();
        let c = AppConfig::from_file(&path).unwrap();
        assert_eq!(c.port, 7000);
        assert_eq!(c.verifier_mspid, "UniversityMSP");
        assert!(c.seed_ledger);
        assert_eq!(c.org_mspid, "Org1MSP");
    }

    #[test]
    fn yaml_unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcn.yaml");
        std::fs::write(&path, "prot: 7000\n").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let c = AppConfig {
            auth_token: Some(SecretToken::new("hunter2")),
            ..AppConfig::default()
        };
        let s = format!("{c:?}");
        assert!(!s.contains("hunter2"));
        assert!(s.contains("[REDACTED]"));
    }

    #[test]
    fn seeded_state_has_samples() {
        let config = AppConfig {
            seed_ledger: true,
            ..AppConfig::default()
        };
        let state = AppState::with_config(config).unwrap();
        assert_eq!(state.service.list_all().unwrap().len(), 4);
    }

    #[test]
    fn snapshot_backed_state_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            seed_ledger: true,
            ledger_snapshot: Some(dir.path().join("ledger.json")),
            ..AppConfig::default()
        };
        AppState::with_config(config.clone()).unwrap();
        let reopened = AppState::with_config(AppConfig {
            seed_ledger: false,
            ..config
        })
        .unwrap();
        assert!(reopened.service.credential_exists("credential4").unwrap());
    }
}

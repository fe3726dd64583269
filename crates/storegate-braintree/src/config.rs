//! # Store-Scoped Gateway Configuration
//!
//! The four settings the adapter reads (`environment`, `merchant_id`,
//! `public_key`, `private_key`) are scoped per store. A value set on a
//! store scope wins; otherwise the default scope applies; otherwise the
//! setting is unset.
//!
//! [`ScopedConfigProvider`] is the seam to the host platform's config
//! subsystem. [`ScopedConfig`] is the in-process implementation, loaded
//! from YAML and optionally overlaid with `STOREGATE_*` environment
//! variables:
//!
//! ```yaml
//! default:
//!   environment: sandbox
//!   merchant_id: m_default
//!   public_key: pk_default
//!   private_key: sk_default
//! stores:
//!   2:
//!     environment: production
//!     merchant_id: m_store2
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use storegate_core::StoreId;
use zeroize::Zeroize;

/// Path prefix under which the platform stores the gateway settings.
pub const CONFIG_PATH_PREFIX: &str = "payment/braintree";

/// A gateway setting read per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// `sandbox` or `production`.
    Environment,
    /// Merchant account identifier.
    MerchantId,
    /// API public key.
    PublicKey,
    /// API private key. Secret.
    PrivateKey,
}

impl ConfigKey {
    /// Every key, in the order they are applied to the SDK.
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Environment,
        ConfigKey::MerchantId,
        ConfigKey::PublicKey,
        ConfigKey::PrivateKey,
    ];

    /// The key's name as it appears in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::MerchantId => "merchant_id",
            Self::PublicKey => "public_key",
            Self::PrivateKey => "private_key",
        }
    }

    /// Full platform config path, e.g. `payment/braintree/merchant_id`.
    pub fn path(self) -> String {
        format!("{CONFIG_PATH_PREFIX}/{}", self.as_str())
    }

    /// Environment variable that overrides the default scope.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Environment => "STOREGATE_ENVIRONMENT",
            Self::MerchantId => "STOREGATE_MERCHANT_ID",
            Self::PublicKey => "STOREGATE_PUBLIC_KEY",
            Self::PrivateKey => "STOREGATE_PRIVATE_KEY",
        }
    }

    /// Whether values for this key must never be logged or printed.
    pub fn is_secret(self) -> bool {
        matches!(self, Self::PrivateKey)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to store-scoped configuration values.
///
/// Implementations resolve scope fallback themselves: a provider asked for
/// store 2 returns the default-scope value when store 2 sets nothing.
pub trait ScopedConfigProvider: Send + Sync {
    /// The value of `key` for `store`, or `None` if unset in every scope.
    fn value(&self, key: ConfigKey, store: StoreId) -> Option<String>;
}

/// Errors loading a [`ScopedConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The configuration document is not valid.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Values set on one scope.
///
/// A key written as `""` is set: it overrides the default scope and
/// resolves to an empty credential. Only an absent key falls through.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeValues {
    environment: Option<String>,
    merchant_id: Option<String>,
    public_key: Option<String>,
    private_key: Option<String>,
}

impl ScopeValues {
    /// The value set for `key` on this scope, verbatim.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Set `key` on this scope, replacing (and wiping) any previous value.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        let slot = self.slot_mut(key);
        slot.zeroize();
        *slot = Some(value.into());
    }

    fn slot(&self, key: ConfigKey) -> &Option<String> {
        match key {
            ConfigKey::Environment => &self.environment,
            ConfigKey::MerchantId => &self.merchant_id,
            ConfigKey::PublicKey => &self.public_key,
            ConfigKey::PrivateKey => &self.private_key,
        }
    }

    fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::Environment => &mut self.environment,
            ConfigKey::MerchantId => &mut self.merchant_id,
            ConfigKey::PublicKey => &mut self.public_key,
            ConfigKey::PrivateKey => &mut self.private_key,
        }
    }
}

impl Drop for ScopeValues {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for ScopeValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ScopeValues");
        for key in ConfigKey::ALL {
            let value = self.get(key);
            let shown = if key.is_secret() {
                value.map(|_| "[REDACTED]")
            } else {
                value
            };
            out.field(key.as_str(), &shown);
        }
        out.finish()
    }
}

/// In-process store-scoped configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopedConfig {
    default: ScopeValues,
    stores: BTreeMap<StoreId, ScopeValues>,
}

impl ScopedConfig {
    /// An empty configuration: every key unset for every store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&document)?;
        tracing::debug!(
            path = %path.display(),
            stores = config.stores.len(),
            "loaded scoped gateway config"
        );
        Ok(config)
    }

    /// Set `key` on the default scope.
    pub fn with_default(mut self, key: ConfigKey, value: impl Into<String>) -> Self {
        self.default.set(key, value);
        self
    }

    /// Set `key` on the scope of `store`.
    pub fn with_store_value(
        mut self,
        store: StoreId,
        key: ConfigKey,
        value: impl Into<String>,
    ) -> Self {
        self.stores.entry(store).or_default().set(key, value);
        self
    }

    /// Overlay the default scope with `STOREGATE_*` environment variables.
    ///
    /// Store scopes still take precedence over the overlaid values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|name| std::env::var(name).ok());
    }

    /// Overlay the default scope with values from `lookup`, keyed by
    /// [`ConfigKey::env_var`]. Unset or empty values leave the scope alone.
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ConfigKey::ALL {
            if let Some(value) = lookup(key.env_var()).filter(|v| !v.is_empty()) {
                tracing::debug!(key = %key, "default scope overridden from environment");
                self.default.set(key, value);
            }
        }
    }

    /// Stores that have their own scope, in ascending order.
    pub fn configured_stores(&self) -> impl Iterator<Item = StoreId> + '_ {
        self.stores.keys().copied()
    }

    /// Values set on the default scope.
    pub fn default_scope(&self) -> &ScopeValues {
        &self.default
    }
}

impl ScopedConfigProvider for ScopedConfig {
    fn value(&self, key: ConfigKey, store: StoreId) -> Option<String> {
        self.stores
            .get(&store)
            .and_then(|scope| scope.get(key))
            .or_else(|| self.default.get(key))
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DOC: &str = r#"
default:
  environment: sandbox
  merchant_id: m_default
  public_key: pk_default
  private_key: sk_default
stores:
  2:
    environment: production
    merchant_id: m_store2
  "3":
    private_key: ""
"#;

    #[test]
    fn config_key_names_and_paths() {
        assert_eq!(ConfigKey::MerchantId.as_str(), "merchant_id");
        assert_eq!(ConfigKey::PrivateKey.path(), "payment/braintree/private_key");
        assert_eq!(ConfigKey::Environment.to_string(), "environment");
        assert!(ConfigKey::PrivateKey.is_secret());
        assert!(!ConfigKey::PublicKey.is_secret());
    }

    #[test]
    fn store_scope_wins_over_default() {
        let cfg = ScopedConfig::from_yaml_str(DOC).unwrap();
        let s2 = StoreId::new(2);
        assert_eq!(cfg.value(ConfigKey::Environment, s2).as_deref(), Some("production"));
        assert_eq!(cfg.value(ConfigKey::MerchantId, s2).as_deref(), Some("m_store2"));
        assert_eq!(cfg.value(ConfigKey::PublicKey, s2).as_deref(), Some("pk_default"));
    }

    #[test]
    fn unknown_store_falls_back_to_default() {
        let cfg = ScopedConfig::from_yaml_str(DOC).unwrap();
        let s9 = StoreId::new(9);
        assert_eq!(cfg.value(ConfigKey::MerchantId, s9).as_deref(), Some("m_default"));
    }

    #[test]
    fn empty_store_value_overrides_default() {
        let cfg = ScopedConfig::from_yaml_str(DOC).unwrap();
        let s3 = StoreId::new(3);
        assert_eq!(cfg.value(ConfigKey::PrivateKey, s3).as_deref(), Some(""));
        assert_eq!(cfg.value(ConfigKey::MerchantId, s3).as_deref(), Some("m_default"));

        let built = ScopedConfig::new()
            .with_default(ConfigKey::MerchantId, "m_default")
            .with_store_value(StoreId::new(2), ConfigKey::MerchantId, "");
        assert_eq!(built.value(ConfigKey::MerchantId, StoreId::new(2)).as_deref(), Some(""));
    }

    #[test]
    fn partial_scopes_deserialize() {
        let cfg = ScopedConfig::from_yaml_str("stores:\n  7:\n    merchant_id: m7\n").unwrap();
        let s7 = StoreId::new(7);
        assert_eq!(cfg.value(ConfigKey::MerchantId, s7).as_deref(), Some("m7"));
        assert!(cfg.value(ConfigKey::PrivateKey, s7).is_none());
        assert!(cfg.default_scope().get(ConfigKey::Environment).is_none());

        let empty_scope = ScopedConfig::from_yaml_str("default: {}\n").unwrap();
        assert!(empty_scope.value(ConfigKey::PublicKey, s7).is_none());
    }

    #[test]
    fn empty_config_has_no_values() {
        let cfg = ScopedConfig::new();
        for key in ConfigKey::ALL {
            assert!(cfg.value(key, StoreId::new(1)).is_none());
        }
    }

    #[test]
    fn builder_sets_scopes() {
        let cfg = ScopedConfig::new()
            .with_default(ConfigKey::MerchantId, "m0")
            .with_store_value(StoreId::new(4), ConfigKey::MerchantId, "m4");
        assert_eq!(cfg.value(ConfigKey::MerchantId, StoreId::new(4)).as_deref(), Some("m4"));
        assert_eq!(cfg.value(ConfigKey::MerchantId, StoreId::new(5)).as_deref(), Some("m0"));
        assert_eq!(cfg.configured_stores().collect::<Vec<_>>(), vec![StoreId::new(4)]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ScopedConfig::from_yaml_str("default:\n  merchant: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_replace_default_scope_only() {
        let mut cfg = ScopedConfig::from_yaml_str(DOC).unwrap();
        let env: HashMap<&str, &str> = [
            ("STOREGATE_MERCHANT_ID", "m_env"),
            ("STOREGATE_PUBLIC_KEY", ""),
        ]
        .into_iter()
        .collect();
        cfg.apply_overrides_with(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(cfg.value(ConfigKey::MerchantId, StoreId::new(9)).as_deref(), Some("m_env"));
        assert_eq!(cfg.value(ConfigKey::MerchantId, StoreId::new(2)).as_deref(), Some("m_store2"));
        assert_eq!(cfg.value(ConfigKey::PublicKey, StoreId::new(9)).as_deref(), Some("pk_default"));
    }

    #[test]
    fn debug_redacts_private_key() {
        let cfg = ScopedConfig::from_yaml_str(DOC).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk_default"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("m_default"));

        let unset = format!("{:?}", ScopeValues::default());
        assert!(unset.contains("private_key: None"));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.yaml");
        std::fs::write(&path, DOC).unwrap();
        let cfg = ScopedConfig::from_path(&path).unwrap();
        assert_eq!(cfg.configured_stores().count(), 2);
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let err = ScopedConfig::from_path(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }
}

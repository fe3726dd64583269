//! # Merchant Credentials
//!
//! The configuration value the gateway SDK receives with every call:
//! environment, merchant id, public key, private key. Resolved once per
//! adapter from store-scoped configuration and immutable afterwards.
//!
//! ## Environment rule
//!
//! The environment is sandbox unless the configured value is exactly the
//! string `"production"`. Unset, differently cased, padded, or malformed
//! values all select sandbox. This fail-safe is deliberate and must not be
//! tightened into an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use storegate_core::StoreId;
use zeroize::Zeroizing;

use crate::config::{ConfigKey, ScopedConfigProvider};

/// Configured value that selects the production environment.
pub const PRODUCTION_VALUE: &str = "production";

/// Gateway environment the SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test environment. The default.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl Environment {
    /// Select the environment from a raw configured value.
    pub fn from_config_value(value: Option<&str>) -> Self {
        match value {
            Some(PRODUCTION_VALUE) => Self::Production,
            _ => Self::Sandbox,
        }
    }

    /// The environment's configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant credentials for one store.
///
/// Custom `Debug` implementation redacts the private key, which is also
/// wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    environment: Environment,
    merchant_id: String,
    public_key: String,
    private_key: Zeroizing<String>,
}

impl Credentials {
    /// Build credentials from explicit values.
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: Zeroizing::new(private_key.into()),
        }
    }

    /// Read the credentials scoped to `store`.
    ///
    /// Values are taken verbatim, including values a store scope sets to
    /// `""`. Unset merchant id or keys resolve to the empty string; the SDK
    /// is configured with them regardless and rejects them on first use.
    pub fn resolve(provider: &dyn ScopedConfigProvider, store: StoreId) -> Self {
        let environment =
            Environment::from_config_value(provider.value(ConfigKey::Environment, store).as_deref());

        let read = |key: ConfigKey| {
            let value = provider.value(key, store).unwrap_or_default();
            if value.is_empty() {
                tracing::warn!(store_id = %store, path = %key.path(), "gateway credential not configured");
            }
            value
        };
        let merchant_id = read(ConfigKey::MerchantId);
        let public_key = read(ConfigKey::PublicKey);
        let private_key = Zeroizing::new(read(ConfigKey::PrivateKey));

        Self {
            environment,
            merchant_id,
            public_key,
            private_key,
        }
    }

    /// Gateway environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Merchant account identifier.
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// API public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// API private key. Never log this.
    pub fn private_key(&self) -> &str {
        self.private_key.as_str()
    }

    /// Credential keys that resolved to an empty value.
    pub fn missing_keys(&self) -> Vec<ConfigKey> {
        [
            (ConfigKey::MerchantId, self.merchant_id.as_str()),
            (ConfigKey::PublicKey, self.public_key.as_str()),
            (ConfigKey::PrivateKey, self.private_key.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

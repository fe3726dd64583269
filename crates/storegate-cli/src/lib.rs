//! # storegate-cli: Gateway Credential Inspection
//!
//! Provides the `storegate` command-line interface for operators who need
//! to see which merchant account a store will charge against before a
//! payment ever reaches the gateway.
//!
//! ## Subcommands
//!
//! - `storegate resolve`: Show the credentials one store resolves to.
//! - `storegate check`: Report stores with missing credentials.
//!
//! ```bash
//! storegate resolve --config gateway.yaml --store 2
//! storegate resolve --config gateway.yaml --store 2 --json
//! storegate check --config gateway.yaml
//! storegate check --config gateway.yaml --store 1 --store 2
//! ```
//!
//! Private keys are never printed; output shows `[REDACTED]` or `(unset)`.

pub mod check;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use storegate_braintree::ScopedConfig;

/// Placeholder printed instead of a configured private key.
pub const REDACTED: &str = "[REDACTED]";

/// Placeholder printed for a credential that resolved to nothing.
pub const UNSET: &str = "(unset)";

/// Load a scoped configuration file, overlaying `STOREGATE_*` environment
/// variables unless `skip_env` is set.
pub fn load_config(path: &Path, skip_env: bool) -> Result<ScopedConfig> {
    let mut config = ScopedConfig::from_path(path)
        .with_context(|| format!("loading gateway config {}", path.display()))?;
    if !skip_env {
        config.apply_env_overrides();
    }
    Ok(config)
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

//! # Check: find stores whose credentials are incomplete.
//!
//! A store with an unset merchant id or key still gets an adapter (the
//! gateway rejects it on first use), so this is the only place the gap
//! shows up before a customer hits it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use storegate_braintree::config::ScopeValues;
use storegate_braintree::{ConfigKey, Credentials, ScopedConfig, ScopedConfigProvider};
use storegate_core::StoreId;

use crate::load_config;

/// Arguments for `storegate check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Scoped gateway configuration file (YAML).
    #[arg(long)]
    pub config: PathBuf,

    /// Stores to check. Defaults to the default scope plus every store
    /// with its own scope in the file.
    #[arg(long = "store")]
    pub stores: Vec<StoreId>,

    /// Ignore `STOREGATE_*` environment overrides.
    #[arg(long)]
    pub no_env: bool,
}

/// Scope a check line reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedScope {
    Default,
    Store(StoreId),
}

/// Result of checking one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeReport {
    pub scope: CheckedScope,
    pub missing: Vec<ConfigKey>,
}

impl ScopeReport {
    /// One-line summary.
    pub fn line(&self) -> String {
        let label = match self.scope {
            CheckedScope::Default => "default".to_string(),
            CheckedScope::Store(id) => format!("store {id}"),
        };
        if self.missing.is_empty() {
            format!("{label}: ok")
        } else {
            let keys: Vec<&str> = self.missing.iter().map(|k| k.as_str()).collect();
            format!("{label}: missing {}", keys.join(", "))
        }
    }
}

/// Default scope only, ignoring every store scope.
struct DefaultScope<'a>(&'a ScopeValues);

impl ScopedConfigProvider for DefaultScope<'_> {
    fn value(&self, key: ConfigKey, _store: StoreId) -> Option<String> {
        self.0.get(key).map(str::to_string)
    }
}

/// Check the given stores, or every configured scope if `stores` is empty.
pub fn check_config(config: &ScopedConfig, stores: &[StoreId]) -> Vec<ScopeReport> {
    let mut reports = Vec::new();
    let targets: Vec<StoreId> = if stores.is_empty() {
        let defaults = Credentials::resolve(&DefaultScope(config.default_scope()), StoreId::new(0));
        reports.push(ScopeReport {
            scope: CheckedScope::Default,
            missing: defaults.missing_keys(),
        });
        config.configured_stores().collect()
    } else {
        stores.to_vec()
    };

    reports.extend(targets.into_iter().map(|store| ScopeReport {
        scope: CheckedScope::Store(store),
        missing: Credentials::resolve(config, store).missing_keys(),
    }));
    reports
}

/// Execute `storegate check`. Exits `1` if any scope is incomplete.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let config = load_config(&args.config, args.no_env)?;
    let reports = check_config(&config, &args.stores);

    let mut incomplete = 0usize;
    for report in &reports {
        println!("{}", report.line());
        if !report.missing.is_empty() {
            incomplete += 1;
        }
    }

    if incomplete > 0 {
        tracing::warn!(incomplete, checked = reports.len(), "incomplete gateway credentials");
        Ok(1)
    } else {
        Ok(0)
    }
}

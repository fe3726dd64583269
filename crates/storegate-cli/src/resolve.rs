//! # Resolve: show one store's effective credentials.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use storegate_braintree::{Credentials, Environment};
use storegate_core::StoreId;

use crate::{display_or_unset, load_config, REDACTED, UNSET};

/// Arguments for `storegate resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Scoped gateway configuration file (YAML).
    #[arg(long)]
    pub config: PathBuf,

    /// Store whose credentials to resolve.
    #[arg(long)]
    pub store: StoreId,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Ignore `STOREGATE_*` environment overrides.
    #[arg(long)]
    pub no_env: bool,
}

/// Printable view of resolved credentials. The private key is never
/// included, only whether one is set.
#[derive(Debug, Serialize)]
pub struct ResolvedView {
    pub store_id: StoreId,
    pub environment: Environment,
    pub merchant_id: String,
    pub public_key: String,
    pub private_key: &'static str,
    pub missing: Vec<String>,
}

impl ResolvedView {
    /// Build the view for `store`.
    pub fn new(store_id: StoreId, credentials: &Credentials) -> Self {
        Self {
            store_id,
            environment: credentials.environment(),
            merchant_id: credentials.merchant_id().to_string(),
            public_key: credentials.public_key().to_string(),
            private_key: if credentials.private_key().is_empty() {
                UNSET
            } else {
                REDACTED
            },
            missing: credentials
                .missing_keys()
                .into_iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }

    /// Plain-text rendering, one field per line.
    pub fn to_text(&self) -> String {
        format!(
            "store:       {}\nenvironment: {}\nmerchant_id: {}\npublic_key:  {}\nprivate_key: {}",
            self.store_id,
            self.environment,
            display_or_unset(&self.merchant_id),
            display_or_unset(&self.public_key),
            self.private_key,
        )
    }
}

/// Execute `storegate resolve`.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let config = load_config(&args.config, args.no_env)?;
    let credentials = Credentials::resolve(&config, args.store);
    let view = ResolvedView::new(args.store, &credentials);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.to_text());
    }
    Ok(0)
}

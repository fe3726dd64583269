//! # storegate-braintree: Store-Scoped Gateway Credentials
//!
//! Binds a payment gateway SDK client to the merchant credentials of the
//! store the current request acts for, and exposes the handful of SDK
//! operations the payment commands use.
//!
//! ## Architecture
//!
//! ```text
//! StoreResolver ──► StoreId ──► ScopedConfigProvider ──► Credentials
//!                                                            │
//!                          GatewayCredentialAdapter ◄────────┘
//!                                     │ (credentials on every call)
//!                                     ▼
//!                                GatewaySdk (real client or MockGatewaySdk)
//! ```
//!
//! - [`store`]: which store's settings to load.
//! - [`config`]: store-scoped settings, from YAML and the environment.
//! - [`credentials`]: the resolved environment, merchant id and keys.
//! - [`sdk`]: the SDK trait and its opaque result types.
//! - [`adapter`]: the facade.
//! - [`mock`]: an in-memory SDK for tests and local runs.
//!
//! ## Crate Policy
//!
//! - The SDK is never configured process-wide. Two adapters for two
//!   stores can live in one process and each call uses its own adapter's
//!   credentials.
//! - The private key never appears in `Debug` output or logs.
//! - No `.unwrap()` outside tests.

pub mod adapter;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mock;
pub mod outcome;
pub mod sdk;
pub mod store;

pub use adapter::GatewayCredentialAdapter;
pub use config::{ConfigError, ConfigKey, ScopedConfig, ScopedConfigProvider};
pub use credentials::{Credentials, Environment};
pub use error::AdapterError;
pub use mock::{MockGatewaySdk, RecordedCall};
pub use outcome::Outcome;
pub use sdk::{
    ClientToken, GatewayParams, GatewayResult, GatewaySdk, PaymentMethod, ResourceCollection,
    SdkError, SdkOperation, Transaction,
};
pub use store::{
    FixedStoreResolver, Order, OrderLookupError, OrderRepository, OrderStoreResolver,
    RequestParams, StoreDirectory, StoreResolutionError, StoreResolver,
};

//! # storegate-core: Foundational Types
//!
//! Domain-primitive newtypes shared by every storegate crate. Identifiers
//! that arrive as untrusted text (request parameters, config files, SDK
//! payloads) are validated once, at construction, so downstream code never
//! handles a bare string where a [`TransactionId`] is expected.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `storegate-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Money is never a float: see [`Amount`].

pub mod amount;
pub mod error;
pub mod identity;

pub use amount::Amount;
pub use error::ValidationError;
pub use identity::{OrderId, PaymentMethodToken, StoreId, TransactionId};

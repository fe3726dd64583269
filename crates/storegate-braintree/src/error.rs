//! Gateway adapter error types.

use crate::store::StoreResolutionError;

/// Errors constructing a [`GatewayCredentialAdapter`](crate::GatewayCredentialAdapter).
///
/// Facade calls never return this: they either hand back the SDK's own
/// [`SdkError`](crate::SdkError) or an opaque [`Outcome`](crate::Outcome).
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The acting store could not be determined.
    #[error("store resolution failed: {0}")]
    StoreResolution(#[from] StoreResolutionError),
}

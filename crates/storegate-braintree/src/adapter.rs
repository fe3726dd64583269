//! # Gateway Credential Adapter
//!
//! [`GatewayCredentialAdapter`] binds a gateway SDK client to one store's
//! merchant credentials and exposes the SDK operations the payment commands
//! need.
//!
//! ## Construction
//!
//! 1. Resolve the acting store through the injected [`StoreResolver`].
//! 2. Read that store's `environment`, `merchant_id`, `public_key`,
//!    `private_key` settings.
//! 3. Fix the SDK configuration: sandbox unless the environment is exactly
//!    `"production"`; merchant id and keys exactly as configured.
//!
//! The credentials belong to the adapter and travel with every SDK call, so
//! adapters for different stores never observe each other's configuration.
//!
//! ## Error contract
//!
//! [`generate_token`](GatewayCredentialAdapter::generate_token) and
//! [`find_payment_method`](GatewayCredentialAdapter::find_payment_method)
//! discard every SDK error and return [`Outcome::Failed`]. Every other
//! operation returns the SDK's [`SdkError`] unchanged. Callers depend on
//! this split; do not unify it.

use std::fmt;
use std::sync::Arc;

use storegate_core::{Amount, PaymentMethodToken, StoreId, TransactionId};

use crate::config::ScopedConfigProvider;
use crate::credentials::{Credentials, Environment};
use crate::error::AdapterError;
use crate::outcome::Outcome;
use crate::sdk::{
    ClientToken, GatewayParams, GatewayResult, GatewaySdk, PaymentMethod, ResourceCollection,
    SdkError, SdkOperation,
};
use crate::store::StoreResolver;

/// A gateway SDK client bound to one store's credentials.
pub struct GatewayCredentialAdapter<G: ?Sized = dyn GatewaySdk> {
    sdk: Arc<G>,
    store_id: StoreId,
    credentials: Credentials,
}

impl<G: GatewaySdk + ?Sized + 'static> GatewayCredentialAdapter<G> {
    /// Resolve the acting store and bind its credentials to `sdk`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StoreResolution`] if the store cannot be
    /// resolved (no `order_id` in the request, no default store, or the
    /// order backend failed).
    pub fn new(
        config: &dyn ScopedConfigProvider,
        resolver: &dyn StoreResolver,
        sdk: Arc<G>,
    ) -> Result<Self, AdapterError> {
        let store_id = resolver.resolve_store_id()?;
        Ok(Self::for_store(config, store_id, sdk))
    }

    /// Bind the credentials of an explicitly chosen store to `sdk`.
    pub fn for_store(config: &dyn ScopedConfigProvider, store_id: StoreId, sdk: Arc<G>) -> Self {
        let credentials = Credentials::resolve(config, store_id);
        tracing::info!(
            store_id = %store_id,
            environment = %credentials.environment(),
            merchant_id = credentials.merchant_id(),
            sdk = sdk.sdk_name(),
            "gateway credentials configured"
        );
        Self {
            sdk,
            store_id,
            credentials,
        }
    }

    /// Store whose credentials this adapter uses.
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// The SDK configuration every call is made with.
    pub fn configuration(&self) -> &Credentials {
        &self.credentials
    }

    /// Active gateway environment.
    pub fn environment(&self) -> Environment {
        self.credentials.environment()
    }

    /// Active merchant id.
    pub fn merchant_id(&self) -> &str {
        self.credentials.merchant_id()
    }

    /// Active public key.
    pub fn public_key(&self) -> &str {
        self.credentials.public_key()
    }

    /// Generate a client token. Any SDK failure yields [`Outcome::Failed`].
    pub fn generate_token(&self, params: Option<&GatewayParams>) -> Outcome<ClientToken> {
        let empty = GatewayParams::new();
        let params = params.unwrap_or(&empty);
        self.swallow(
            SdkOperation::GenerateClientToken,
            self.sdk.generate_client_token(&self.credentials, params),
        )
    }

    /// Look up a vaulted payment method. Any SDK failure yields [`Outcome::Failed`].
    pub fn find_payment_method(&self, token: &PaymentMethodToken) -> Outcome<PaymentMethod> {
        self.swallow(
            SdkOperation::FindCreditCard,
            self.sdk.find_credit_card(&self.credentials, token),
        )
    }

    /// Search transactions. Matching ids are fetched now; the transactions
    /// themselves load lazily as the collection is iterated.
    pub fn search_transactions(&self, filters: &GatewayParams) -> Result<ResourceCollection, SdkError> {
        self.trace(SdkOperation::SearchTransactionIds);
        let ids = self.sdk.search_transaction_ids(&self.credentials, filters)?;

        let sdk = Arc::clone(&self.sdk);
        let credentials = self.credentials.clone();
        Ok(ResourceCollection::new(ids, move |page| {
            sdk.fetch_transactions(&credentials, page)
        }))
    }

    /// Create a payment method nonce from a vaulted token.
    pub fn create_nonce(&self, token: &PaymentMethodToken) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::CreateNonce);
        self.sdk.create_nonce(&self.credentials, token)
    }

    /// Create a sale transaction.
    pub fn sale(&self, attributes: &GatewayParams) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::Sale);
        self.sdk.sale(&self.credentials, attributes)
    }

    /// Submit a transaction for settlement, optionally for a partial amount.
    pub fn submit_for_settlement(
        &self,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::SubmitForSettlement);
        self.sdk
            .submit_for_settlement(&self.credentials, transaction_id, amount)
    }

    /// Void a transaction.
    pub fn void(&self, transaction_id: &TransactionId) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::Void);
        self.sdk.void(&self.credentials, transaction_id)
    }

    /// Refund a transaction, optionally for a partial amount.
    pub fn refund(
        &self,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::Refund);
        self.sdk.refund(&self.credentials, transaction_id, amount)
    }

    /// Create a new transaction from an existing one.
    pub fn clone_transaction(
        &self,
        transaction_id: &TransactionId,
        attributes: &GatewayParams,
    ) -> Result<GatewayResult, SdkError> {
        self.trace(SdkOperation::CloneTransaction);
        self.sdk
            .clone_transaction(&self.credentials, transaction_id, attributes)
    }

    fn trace(&self, operation: SdkOperation) {
        tracing::debug!(store_id = %self.store_id, operation = %operation, "forwarding to gateway sdk");
    }

    fn swallow<T>(&self, operation: SdkOperation, result: Result<T, SdkError>) -> Outcome<T> {
        self.trace(operation);
        if let Err(e) = &result {
            tracing::warn!(
                store_id = %self.store_id,
                operation = %operation,
                error_kind = e.kind(),
                "gateway sdk call failed"
            );
        }
        result.into()
    }
}

impl<G: GatewaySdk + ?Sized> fmt::Debug for GatewayCredentialAdapter<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentialAdapter")
            .field("sdk", &self.sdk.sdk_name())
            .field("store_id", &self.store_id)
            .field("credentials", &self.credentials)
            .finish()
    }
}

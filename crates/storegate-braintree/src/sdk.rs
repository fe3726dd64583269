//! # Gateway SDK Boundary
//!
//! [`GatewaySdk`] abstracts over the third-party payment gateway client.
//! Its transport, signing, retries, and transaction lifecycle are opaque:
//! request parameters go in as JSON objects and results come back as JSON
//! values, and nothing on this side of the trait interprets them.
//!
//! Every method receives the [`Credentials`] to authenticate with. There is
//! no process-wide SDK configuration, so clients for different stores can
//! run side by side without overwriting each other's merchant account.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use storegate_core::{Amount, PaymentMethodToken, TransactionId};

use crate::credentials::Credentials;

/// Request parameters passed through to the SDK unchanged.
pub type GatewayParams = serde_json::Map<String, serde_json::Value>;

/// Number of transactions fetched per page while iterating a search.
pub const SEARCH_PAGE_SIZE: usize = 50;

/// An error raised by the gateway SDK.
///
/// The adapter never inspects or rewrites it: `kind` and `message` are
/// whatever the SDK reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SdkError {
    kind: String,
    message: String,
}

impl SdkError {
    /// Create an SDK error.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// The SDK's error class (e.g. `Authentication`, `NotFound`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The SDK's error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Opaque JSON newtypes: the SDK owns their shape.
macro_rules! opaque_value {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(serde_json::Value);

        impl $ty {
            /// Wrap a value returned by the SDK.
            pub fn new(value: serde_json::Value) -> Self {
                Self(value)
            }

            /// Borrow the underlying JSON.
            pub fn as_value(&self) -> &serde_json::Value {
                &self.0
            }

            /// Take the underlying JSON.
            pub fn into_value(self) -> serde_json::Value {
                self.0
            }
        }

        impl From<serde_json::Value> for $ty {
            fn from(value: serde_json::Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_value!(
    /// Result object of a transaction or nonce operation (successful or
    /// error result, as the SDK defines them).
    GatewayResult
);
opaque_value!(
    /// A vaulted payment method as returned by card lookup.
    PaymentMethod
);
opaque_value!(
    /// A transaction record yielded by a search.
    Transaction
);

/// A client token for the browser-side drop-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientToken(String);

impl ClientToken {
    /// Wrap a token issued by the SDK.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The encoded token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SDK operations, named for logging and for mock failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkOperation {
    /// Issue a client token.
    GenerateClientToken,
    /// Look up a vaulted credit card.
    FindCreditCard,
    /// Run a transaction search, returning matching ids.
    SearchTransactionIds,
    /// Load transactions by id (one search page).
    FetchTransactions,
    /// Create a payment method nonce from a vaulted token.
    CreateNonce,
    /// Create a sale transaction.
    Sale,
    /// Submit an authorized transaction for settlement.
    SubmitForSettlement,
    /// Void a transaction.
    Void,
    /// Refund a settled transaction.
    Refund,
    /// Clone a transaction with new attributes.
    CloneTransaction,
}

impl SdkOperation {
    /// Operation name as used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateClientToken => "generate_client_token",
            Self::FindCreditCard => "find_credit_card",
            Self::SearchTransactionIds => "search_transaction_ids",
            Self::FetchTransactions => "fetch_transactions",
            Self::CreateNonce => "create_nonce",
            Self::Sale => "sale",
            Self::SubmitForSettlement => "submit_for_settlement",
            Self::Void => "void",
            Self::Refund => "refund",
            Self::CloneTransaction => "clone_transaction",
        }
    }
}

impl fmt::Display for SdkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payment gateway SDK.
///
/// Implementations must be `Send + Sync` so one client can be shared via
/// `Arc` by every adapter in the process. The trait is object-safe.
pub trait GatewaySdk: Send + Sync {
    /// Issue a client token.
    fn generate_client_token(
        &self,
        credentials: &Credentials,
        params: &GatewayParams,
    ) -> Result<ClientToken, SdkError>;

    /// Look up a vaulted credit card by token.
    fn find_credit_card(
        &self,
        credentials: &Credentials,
        token: &PaymentMethodToken,
    ) -> Result<PaymentMethod, SdkError>;

    /// Run a transaction search and return the ids of every match.
    fn search_transaction_ids(
        &self,
        credentials: &Credentials,
        filters: &GatewayParams,
    ) -> Result<Vec<TransactionId>, SdkError>;

    /// Load the transactions with the given ids.
    fn fetch_transactions(
        &self,
        credentials: &Credentials,
        ids: &[TransactionId],
    ) -> Result<Vec<Transaction>, SdkError>;

    /// Create a single-use nonce for a vaulted payment method.
    fn create_nonce(
        &self,
        credentials: &Credentials,
        token: &PaymentMethodToken,
    ) -> Result<GatewayResult, SdkError>;

    /// Create a sale transaction.
    fn sale(
        &self,
        credentials: &Credentials,
        attributes: &GatewayParams,
    ) -> Result<GatewayResult, SdkError>;

    /// Submit a transaction for settlement, optionally for a partial amount.
    fn submit_for_settlement(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError>;

    /// Void a transaction.
    fn void(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
    ) -> Result<GatewayResult, SdkError>;

    /// Refund a transaction, optionally for a partial amount.
    fn refund(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError>;

    /// Create a new transaction from an existing one.
    fn clone_transaction(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        attributes: &GatewayParams,
    ) -> Result<GatewayResult, SdkError>;

    /// Human-readable name of the SDK implementation.
    fn sdk_name(&self) -> &str;
}

type PageFetcher = Box<dyn Fn(&[TransactionId]) -> Result<Vec<Transaction>, SdkError> + Send + Sync>;

/// The lazily loaded result of a transaction search.
///
/// Holds the matching ids up front; transactions are fetched in pages of
/// [`SEARCH_PAGE_SIZE`] only as the collection is iterated. A failed page
/// fetch is yielded once as `Err` and ends the iteration.
pub struct ResourceCollection {
    ids: Vec<TransactionId>,
    page_size: usize,
    fetch: PageFetcher,
}

impl ResourceCollection {
    /// Build a collection over `ids`, loading pages through `fetch`.
    pub fn new<F>(ids: Vec<TransactionId>, fetch: F) -> Self
    where
        F: Fn(&[TransactionId]) -> Result<Vec<Transaction>, SdkError> + Send + Sync + 'static,
    {
        Self {
            ids,
            page_size: SEARCH_PAGE_SIZE,
            fetch: Box::new(fetch),
        }
    }

    /// Override the page size. Values below one are treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Ids of every matching transaction, without fetching anything.
    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }

    /// Number of matching transactions.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the search matched nothing.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl fmt::Debug for ResourceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("ids", &self.ids)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl IntoIterator for ResourceCollection {
    type Item = Result<Transaction, SdkError>;
    type IntoIter = ResourceIter;

    fn into_iter(self) -> Self::IntoIter {
        ResourceIter {
            collection: self,
            next_offset: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

/// Iterator over a [`ResourceCollection`], fetching one page at a time.
pub struct ResourceIter {
    collection: ResourceCollection,
    next_offset: usize,
    buffer: VecDeque<Transaction>,
    done: bool,
}

impl Iterator for ResourceIter {
    type Item = Result<Transaction, SdkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tx) = self.buffer.pop_front() {
                return Some(Ok(tx));
            }
            if self.done || self.next_offset >= self.collection.ids.len() {
                return None;
            }

            let end = (self.next_offset + self.collection.page_size).min(self.collection.ids.len());
            let page = &self.collection.ids[self.next_offset..end];
            self.next_offset = end;

            match (self.collection.fetch)(page) {
                Ok(transactions) => self.buffer.extend(transactions),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for ResourceIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ids(n: usize) -> Vec<TransactionId> {
        (0..n)
            .map(|i| TransactionId::new(format!("tx{i}")).unwrap())
            .collect()
    }

    fn echo(page: &[TransactionId]) -> Result<Vec<Transaction>, SdkError> {
        Ok(page
            .iter()
            .map(|id| Transaction::new(json!({ "id": id.as_str() })))
            .collect())
    }

    #[test]
    fn sdk_error_display_and_accessors() {
        let err = SdkError::new("Authentication", "bad keys");
        assert_eq!(err.to_string(), "Authentication: bad keys");
        assert_eq!(err.kind(), "Authentication");
        assert_eq!(err.message(), "bad keys");
    }

    #[test]
    fn opaque_values_are_transparent() {
        let result = GatewayResult::new(json!({ "success": true }));
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "success": true }));
        assert_eq!(result.into_value()["success"], json!(true));
    }

    #[test]
    fn operation_names() {
        assert_eq!(SdkOperation::SubmitForSettlement.to_string(), "submit_for_settlement");
        assert_eq!(SdkOperation::GenerateClientToken.as_str(), "generate_client_token");
    }

    #[test]
    fn collection_reports_size_without_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let collection = ResourceCollection::new(ids(3), move |page| {
            counter.fetch_add(1, Ordering::SeqCst);
            echo(page)
        });
        assert_eq!(collection.len(), 3);
        assert!(!collection.is_empty());
        assert_eq!(collection.ids()[2].as_str(), "tx2");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn iteration_fetches_page_by_page() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let collection = ResourceCollection::new(ids(120), move |page| {
            counter.fetch_add(1, Ordering::SeqCst);
            echo(page)
        });

        let mut iter = collection.into_iter();
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let rest: Vec<_> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(rest.len(), 119);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(rest[118].as_value()["id"], json!("tx119"));
    }

    #[test]
    fn page_error_is_yielded_once_then_iteration_ends() {
        let collection = ResourceCollection::new(ids(5), |page| {
            if page[0].as_str() == "tx2" {
                Err(SdkError::new("Server", "boom"))
            } else {
                echo(page)
            }
        })
        .with_page_size(2);

        let items: Vec<_> = collection.into_iter().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert_eq!(items[2].as_ref().unwrap_err(), &SdkError::new("Server", "boom"));
    }

    #[test]
    fn empty_collection_never_fetches() {
        let collection = ResourceCollection::new(Vec::new(), |_| panic!("must not fetch"));
        assert!(collection.is_empty());
        assert_eq!(collection.into_iter().count(), 0);
    }

    #[test]
    fn trait_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn GatewaySdk>) {}
        assert_object_safe(None);
    }
}

//! # In-Memory Gateway SDK
//!
//! [`MockGatewaySdk`] stands in for the real gateway client in tests and
//! local development. It records every call together with the credentials
//! it was made with, can be told to fail any operation, and keeps just
//! enough bookkeeping (vaulted cards, sale transactions) for lookups,
//! settlement, voids, refunds, clones, and searches to answer sensibly.
//!
//! It is not a model of the gateway's transaction lifecycle: status
//! changes are recorded without checking whether the real gateway would
//! have allowed them.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use serde_json::{json, Value};
use storegate_core::{Amount, PaymentMethodToken, TransactionId};

use crate::credentials::Credentials;
use crate::sdk::{
    ClientToken, GatewayParams, GatewayResult, GatewaySdk, PaymentMethod, SdkError, SdkOperation,
    Transaction,
};

/// One call received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Operation invoked.
    pub operation: SdkOperation,
    /// Credentials the call was made with.
    pub credentials: Credentials,
    /// Arguments, as JSON.
    pub arguments: Value,
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    failing: HashMap<SdkOperation, SdkError>,
    fail_next: Option<SdkError>,
    cards: HashMap<String, Value>,
    transactions: BTreeMap<String, Value>,
    next_transaction: u64,
}

/// In-memory gateway SDK.
#[derive(Default)]
pub struct MockGatewaySdk {
    state: Mutex<MockState>,
}

impl MockGatewaySdk {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vault a credit card under `token`.
    pub fn add_credit_card(&self, token: &PaymentMethodToken, card: Value) {
        self.state
            .lock()
            .cards
            .insert(token.as_str().to_string(), card);
    }

    /// Make every call to `operation` fail with `error` until cleared.
    pub fn fail_operation(&self, operation: SdkOperation, error: SdkError) {
        self.state.lock().failing.insert(operation, error);
    }

    /// Make the next call, whatever it is, fail with `error`.
    pub fn fail_next(&self, error: SdkError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Clear all configured failures.
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing.clear();
        state.fail_next = None;
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.lock().calls.last().cloned()
    }

    /// Number of calls made to `operation`.
    pub fn call_count(&self, operation: SdkOperation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// The stored record of transaction `id`.
    pub fn transaction(&self, id: &TransactionId) -> Option<Value> {
        self.state.lock().transactions.get(id.as_str()).cloned()
    }

    /// Record the call, then apply any configured failure.
    fn enter(
        &self,
        state: &mut MockState,
        operation: SdkOperation,
        credentials: &Credentials,
        arguments: Value,
    ) -> Result<(), SdkError> {
        state.calls.push(RecordedCall {
            operation,
            credentials: credentials.clone(),
            arguments,
        });
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        match state.failing.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn insert_transaction(state: &mut MockState, mut record: Value) -> Value {
        state.next_transaction += 1;
        let id = format!("mocktx{:06}", state.next_transaction);
        record["id"] = json!(id.as_str());
        state.transactions.insert(id, record.clone());
        record
    }

    fn not_found(transaction_id: &TransactionId) -> SdkError {
        SdkError::new(
            "NotFound",
            format!("transaction with id {transaction_id} not found"),
        )
    }

    fn set_status(
        state: &mut MockState,
        transaction_id: &TransactionId,
        status: &str,
        amount: Option<&Amount>,
    ) -> Result<Value, SdkError> {
        let record = state
            .transactions
            .get_mut(transaction_id.as_str())
            .ok_or_else(|| Self::not_found(transaction_id))?;
        record["status"] = json!(status);
        if let Some(amount) = amount {
            record["amount"] = json!(amount.as_str());
        }
        Ok(record.clone())
    }
}

impl GatewaySdk for MockGatewaySdk {
    fn generate_client_token(
        &self,
        credentials: &Credentials,
        params: &GatewayParams,
    ) -> Result<ClientToken, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::GenerateClientToken,
            credentials,
            Value::Object(params.clone()),
        )?;
        Ok(ClientToken::new(format!(
            "mock_client_token_{}",
            uuid::Uuid::new_v4().simple()
        )))
    }

    fn find_credit_card(
        &self,
        credentials: &Credentials,
        token: &PaymentMethodToken,
    ) -> Result<PaymentMethod, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::FindCreditCard,
            credentials,
            json!({ "token": token.as_str() }),
        )?;
        state
            .cards
            .get(token.as_str())
            .cloned()
            .map(PaymentMethod::new)
            .ok_or_else(|| {
                SdkError::new(
                    "NotFound",
                    format!("payment method with token {token} not found"),
                )
            })
    }

    fn search_transaction_ids(
        &self,
        credentials: &Credentials,
        filters: &GatewayParams,
    ) -> Result<Vec<TransactionId>, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::SearchTransactionIds,
            credentials,
            Value::Object(filters.clone()),
        )?;
        state
            .transactions
            .iter()
            .filter(|(_, record)| {
                filters
                    .iter()
                    .all(|(field, expected)| record.get(field) == Some(expected))
            })
            .map(|(id, _)| {
                TransactionId::new(id.as_str())
                    .map_err(|e| SdkError::new("Unexpected", e.to_string()))
            })
            .collect()
    }

    fn fetch_transactions(
        &self,
        credentials: &Credentials,
        ids: &[TransactionId],
    ) -> Result<Vec<Transaction>, SdkError> {
        let mut state = self.state.lock();
        let requested: Vec<&str> = ids.iter().map(TransactionId::as_str).collect();
        self.enter(
            &mut state,
            SdkOperation::FetchTransactions,
            credentials,
            json!({ "ids": requested }),
        )?;
        ids.iter()
            .map(|id| {
                state
                    .transactions
                    .get(id.as_str())
                    .cloned()
                    .map(Transaction::new)
                    .ok_or_else(|| Self::not_found(id))
            })
            .collect()
    }

    fn create_nonce(
        &self,
        credentials: &Credentials,
        token: &PaymentMethodToken,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::CreateNonce,
            credentials,
            json!({ "token": token.as_str() }),
        )?;
        if !state.cards.contains_key(token.as_str()) {
            return Err(SdkError::new(
                "NotFound",
                format!("payment method with token {token} not found"),
            ));
        }
        Ok(GatewayResult::new(json!({
            "success": true,
            "paymentMethodNonce": {
                "nonce": format!("mock_nonce_{}", uuid::Uuid::new_v4().simple()),
                "token": token.as_str(),
            },
        })))
    }

    fn sale(
        &self,
        credentials: &Credentials,
        attributes: &GatewayParams,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::Sale,
            credentials,
            Value::Object(attributes.clone()),
        )?;
        let settle = attributes
            .get("options")
            .and_then(|o| o.get("submitForSettlement"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let status = if settle {
            "submitted_for_settlement"
        } else {
            "authorized"
        };
        let record = Self::insert_transaction(
            &mut state,
            json!({
                "type": "sale",
                "status": status,
                "amount": attributes.get("amount").cloned().unwrap_or(Value::Null),
                "merchantAccountId": credentials.merchant_id(),
            }),
        );
        Ok(GatewayResult::new(json!({ "success": true, "transaction": record })))
    }

    fn submit_for_settlement(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::SubmitForSettlement,
            credentials,
            json!({ "transactionId": transaction_id.as_str(), "amount": amount.map(Amount::as_str) }),
        )?;
        let record = Self::set_status(&mut state, transaction_id, "submitted_for_settlement", amount)?;
        Ok(GatewayResult::new(json!({ "success": true, "transaction": record })))
    }

    fn void(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::Void,
            credentials,
            json!({ "transactionId": transaction_id.as_str() }),
        )?;
        let record = Self::set_status(&mut state, transaction_id, "voided", None)?;
        Ok(GatewayResult::new(json!({ "success": true, "transaction": record })))
    }

    fn refund(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        amount: Option<&Amount>,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::Refund,
            credentials,
            json!({ "transactionId": transaction_id.as_str(), "amount": amount.map(Amount::as_str) }),
        )?;
        let original = state
            .transactions
            .get(transaction_id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(transaction_id))?;
        let refund_amount = match amount {
            Some(a) => json!(a.as_str()),
            None => original.get("amount").cloned().unwrap_or(Value::Null),
        };
        let record = Self::insert_transaction(
            &mut state,
            json!({
                "type": "credit",
                "status": "submitted_for_settlement",
                "amount": refund_amount,
                "refundedTransactionId": transaction_id.as_str(),
                "merchantAccountId": credentials.merchant_id(),
            }),
        );
        Ok(GatewayResult::new(json!({ "success": true, "transaction": record })))
    }

    fn clone_transaction(
        &self,
        credentials: &Credentials,
        transaction_id: &TransactionId,
        attributes: &GatewayParams,
    ) -> Result<GatewayResult, SdkError> {
        let mut state = self.state.lock();
        self.enter(
            &mut state,
            SdkOperation::CloneTransaction,
            credentials,
            json!({ "transactionId": transaction_id.as_str(), "attributes": attributes }),
        )?;
        let mut record = state
            .transactions
            .get(transaction_id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(transaction_id))?;
        record["status"] = json!("authorized");
        record["clonedFromTransactionId"] = json!(transaction_id.as_str());
        for (field, value) in attributes {
            record[field.as_str()] = value.clone();
        }
        let record = Self::insert_transaction(&mut state, record);
        Ok(GatewayResult::new(json!({ "success": true, "transaction": record })))
    }

    fn sdk_name(&self) -> &str {
        "MockGatewaySdk"
    }
}

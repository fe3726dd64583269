//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers that flow between the host
//! platform and the payment gateway. Each identifier is a distinct type;
//! you cannot pass an [`OrderId`] where a [`StoreId`] is expected.
//!
//! ## Validation
//!
//! Numeric identifiers ([`StoreId`], [`OrderId`]) parse from decimal text,
//! which is how they arrive in request parameters and config files.
//! Gateway-issued identifiers ([`TransactionId`], [`PaymentMethodToken`])
//! are opaque strings; they are only checked for shape (non-empty, no
//! whitespace, bounded length) and otherwise passed through untouched.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest gateway-issued identifier accepted.
const MAX_GATEWAY_ID_LEN: usize = 64;

/// Deserializes as a plain `String`, then routes through the type's `new()`
/// constructor so that invalid values are rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Accepts either a number or its decimal text. YAML map keys and request
/// parameters carry store ids in both forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

// ---------------------------------------------------------------------------
// Numeric identifiers
// ---------------------------------------------------------------------------

/// A store (store view) in the host platform.
///
/// Store `0` is the admin scope and is a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StoreId(u32);

impl StoreId {
    /// Create a store identifier from its numeric value.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parse a store identifier from decimal text (surrounding whitespace allowed).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidStoreId`] for empty, negative,
    /// non-numeric, or out-of-range input.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        value
            .trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidStoreId(value.to_string()))
    }

    /// The numeric value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for StoreId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StoreId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for StoreId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => u32::try_from(n)
                .map(Self)
                .map_err(|_| serde::de::Error::custom(ValidationError::InvalidStoreId(n.to_string()))),
            NumberOrText::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// A sales order entity identifier.
///
/// Always positive: `0` is what the platform reports for an order that was
/// never persisted, so it is not a usable lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Create an order identifier from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOrderId`] for `0`.
    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::InvalidOrderId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Parse an order identifier from request-parameter text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOrderId`] for empty, non-numeric,
    /// or zero input.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ValidationError::InvalidOrderId(value.to_string())),
        }
    }

    /// The numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Self::new(n).map_err(serde::de::Error::custom),
            NumberOrText::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway-issued identifiers
// ---------------------------------------------------------------------------

fn is_gateway_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_GATEWAY_ID_LEN
        && !value.chars().any(char::is_whitespace)
}

/// A transaction identifier issued by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl_validating_deserialize!(TransactionId);

impl TransactionId {
    /// Create a transaction identifier, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransactionId`] if the value is
    /// empty, longer than 64 characters, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_gateway_id(&s) {
            return Err(ValidationError::InvalidTransactionId(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier as issued by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vaulted payment method (credit card) token issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PaymentMethodToken(String);

impl_validating_deserialize!(PaymentMethodToken);

impl PaymentMethodToken {
    /// Create a payment method token, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPaymentMethodToken`] if the value
    /// is empty, longer than 64 characters, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_gateway_id(&s) {
            return Err(ValidationError::InvalidPaymentMethodToken(s));
        }
        Ok(Self(s))
    }

    /// Access the token as issued by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentMethodToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- StoreId --

    #[test]
    fn store_id_parses_decimal_text() {
        assert_eq!(StoreId::parse("2").unwrap(), StoreId::new(2));
        assert_eq!(StoreId::parse(" 7 ").unwrap().get(), 7);
        assert_eq!(StoreId::parse("0").unwrap(), StoreId::new(0));
    }

    #[test]
    fn store_id_rejects_invalid() {
        assert!(StoreId::parse("").is_err());
        assert!(StoreId::parse("-1").is_err());
        assert!(StoreId::parse("default").is_err());
        assert!(StoreId::parse("4294967296").is_err());
    }

    #[test]
    fn store_id_deserializes_from_number_or_text() {
        let a: StoreId = serde_json::from_str("3").unwrap();
        let b: StoreId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<StoreId>("\"x\"").is_err());
        assert!(serde_json::from_str::<StoreId>("99999999999").is_err());
    }

    #[test]
    fn store_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&StoreId::new(5)).unwrap(), "5");
    }

    // -- OrderId --

    #[test]
    fn order_id_parses_request_parameter() {
        assert_eq!(OrderId::parse("100000042").unwrap().get(), 100_000_042);
        assert_eq!(OrderId::parse(" 12").unwrap().get(), 12);
    }

    #[test]
    fn order_id_rejects_zero_and_garbage() {
        assert!(OrderId::new(0).is_err());
        assert!(OrderId::parse("0").is_err());
        assert!(OrderId::parse("").is_err());
        assert!(OrderId::parse("12a").is_err());
        assert!(serde_json::from_str::<OrderId>("0").is_err());
    }

    // -- TransactionId / PaymentMethodToken --

    #[test]
    fn transaction_id_accepts_gateway_shapes() {
        let id = TransactionId::new("k3t7h9sq").unwrap();
        assert_eq!(id.as_str(), "k3t7h9sq");
        assert_eq!(id.to_string(), "k3t7h9sq");
    }

    #[test]
    fn transaction_id_rejects_empty_whitespace_and_long() {
        assert!(TransactionId::new("").is_err());
        assert!(TransactionId::new("abc def").is_err());
        assert!(TransactionId::new("x".repeat(65)).is_err());
        assert!(TransactionId::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn payment_method_token_validates_on_deserialize() {
        let ok: PaymentMethodToken = serde_json::from_str("\"tok_1\"").unwrap();
        assert_eq!(ok.as_str(), "tok_1");
        assert!(serde_json::from_str::<PaymentMethodToken>("\"\"").is_err());
    }

    #[test]
    fn error_variant_matches_type() {
        assert!(matches!(
            PaymentMethodToken::new(" ").unwrap_err(),
            ValidationError::InvalidPaymentMethodToken(_)
        ));
        assert!(matches!(
            TransactionId::new(" ").unwrap_err(),
            ValidationError::InvalidTransactionId(_)
        ));
    }
}

//! # Error Types
//!
//! Validation failures for the domain-primitive newtypes. Each variant
//! carries the rejected input so the caller can report it verbatim.

use thiserror::Error;

/// A value failed format validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Store identifier is not a non-negative decimal integer.
    #[error("invalid store ID: \"{0}\" (expected a non-negative integer)")]
    InvalidStoreId(String),

    /// Order identifier is not a positive decimal integer.
    #[error("invalid order ID: \"{0}\" (expected a positive integer)")]
    InvalidOrderId(String),

    /// Transaction identifier is empty, too long, or contains whitespace.
    #[error("invalid transaction ID: \"{0}\" (expected 1-64 non-whitespace characters)")]
    InvalidTransactionId(String),

    /// Payment method token is empty, too long, or contains whitespace.
    #[error("invalid payment method token: \"{0}\" (expected 1-64 non-whitespace characters)")]
    InvalidPaymentMethodToken(String),

    /// Amount is not a non-negative decimal with at most two fractional digits.
    #[error("invalid amount: \"{0}\" (expected a decimal such as \"10\" or \"10.50\")")]
    InvalidAmount(String),
}

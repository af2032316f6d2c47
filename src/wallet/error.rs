//! Wallet Error Types
//!
//! `StorageError` is what the storage adapters return; it carries the driver
//! error and knows whether that error is a serialization conflict.
//! `WalletError` is the taxonomy seen by callers of the wallet.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::Currency;

/// SQLSTATE codes PostgreSQL reports when a unit of work lost a
/// serialization race and may be retried from scratch.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Storage adapter failure
#[derive(Error, Debug)]
pub enum StorageError {
    /// Transient: the engine aborted the unit of work to keep it serializable
    #[error("serialization conflict: {0}")]
    Conflict(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    /// True when the whole unit of work should be restarted
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        let conflict = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED);

        if conflict {
            StorageError::Conflict(e)
        } else {
            StorageError::Database(e)
        }
    }
}

/// Wallet error types
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("{0}: don't have enough balance")]
    InsufficientFunds(String),

    #[error("currencies for accounts are not equal: {from} != {to}")]
    CurrencyMismatch { from: Currency, to: Currency },

    #[error("invalid request: {0}")]
    Validation(String),

    /// Only produced when the retry policy is bounded
    #[error("transfer abandoned after {attempts} conflicting attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl WalletError {
    pub fn negative_amount(amount: Decimal) -> Self {
        WalletError::Validation(format!("amount must not be negative, got {}", amount))
    }

    /// True when the error is a storage conflict the coordinator should retry
    pub fn is_conflict(&self) -> bool {
        matches!(self, WalletError::Storage(e) if e.is_conflict())
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            WalletError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            WalletError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            WalletError::Validation(_) => "VALIDATION_ERROR",
            WalletError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED",
            WalletError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            WalletError::AccountNotFound(_) => 404,
            WalletError::InsufficientFunds(_) => 402,
            WalletError::Validation(_) => 400,
            WalletError::RetriesExhausted { .. } => 503,
            WalletError::CurrencyMismatch { .. } | WalletError::Storage(_) => 500,
        }
    }
}

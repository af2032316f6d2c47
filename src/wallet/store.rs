//! Storage seams
//!
//! The coordinator only talks to storage through these traits. Every
//! mutating call takes the open unit-of-work handle (`Tx`) so all reads and
//! writes of one transfer attempt commit or roll back together.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::error::StorageError;
use super::types::{Account, Ledger};

/// Transaction boundary over the backing store
///
/// `begin` must open the handle at an isolation level that detects
/// serialization anomalies (SERIALIZABLE or equivalent). Failures caused by a
/// lost serialization race must come back as [`StorageError::Conflict`].
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, StorageError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), StorageError>;

    async fn rollback(&self, tx: Self::Tx) -> Result<(), StorageError>;
}

/// Account table operations
#[async_trait]
pub trait AccountStore<Tx: Send>: Send + Sync {
    /// All accounts in storage order
    async fn list(&self) -> Result<Vec<Account>, StorageError>;

    /// Point lookup by account name; `None` when no row matches
    async fn get_by_name(&self, tx: &mut Tx, name: &str) -> Result<Option<Account>, StorageError>;

    /// `balance = balance + delta`, applied by the store itself
    async fn adjust_balance(
        &self,
        tx: &mut Tx,
        account: &Account,
        delta: Decimal,
    ) -> Result<(), StorageError>;

    /// Table-level lock that serializes transfers without blocking plain reads
    async fn lock(&self, tx: &mut Tx) -> Result<(), StorageError>;
}

/// Payment log operations
#[async_trait]
pub trait LedgerStore<Tx: Send>: Send + Sync {
    /// Every completed transfer, rebuilt from its payment pair
    async fn list(&self) -> Result<Vec<Ledger>, StorageError>;

    /// Record one transfer under a fresh correlation id
    ///
    /// Both legs (`-amount` on the source, `+amount` on the destination) go
    /// out in a single write.
    async fn add_pair(
        &self,
        tx: &mut Tx,
        source: &Account,
        destination: &Account,
        amount: Decimal,
    ) -> Result<Ledger, StorageError>;
}

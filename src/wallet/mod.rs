//! Wallet
//!
//! Double-entry account-to-account transfers.
//!
//! ```text
//! caller ─▶ Wallet (facade) ─▶ TransferCoordinator ─▶ AccountStore / LedgerStore ─▶ PostgreSQL
//! ```
//!
//! Every transfer debits the source and credits the destination by the same
//! amount, and writes one payment pair (`-amount`, `+amount`) sharing a
//! correlation id, all in a single SERIALIZABLE transaction. Conflicts are
//! retried by the coordinator according to [`RetryPolicy`].

pub mod coordinator;
pub mod error;
#[cfg(test)]
pub(crate) mod memory;
pub mod postgres;
pub mod retry;
pub mod service;
pub mod store;
pub mod types;

use std::sync::Arc;

use crate::db::Database;

pub use coordinator::TransferCoordinator;
pub use error::{StorageError, WalletError};
pub use postgres::{PgAccountStore, PgLedgerStore};
pub use retry::RetryPolicy;
pub use service::{Wallet, WalletService};
pub use store::{AccountStore, LedgerStore, UnitOfWork};
pub use types::{Account, Currency, Direction, Ledger, Payment};

pub type PgWalletService = WalletService<Database, PgAccountStore, PgLedgerStore>;

/// Wallet backed by the given PostgreSQL pool
pub fn postgres_wallet(db: Arc<Database>, retry: RetryPolicy) -> PgWalletService {
    let accounts = Arc::new(PgAccountStore::new(db.pool().clone()));
    let ledgers = Arc::new(PgLedgerStore::new(db.pool().clone()));
    WalletService::new(db, accounts, ledgers, retry)
}

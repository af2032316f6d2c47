//! Transfer Coordinator
//!
//! Runs one transfer as a single SERIALIZABLE unit of work and restarts it
//! from scratch whenever storage reports a serialization conflict.
//!
//! # Attempt
//!
//! ```text
//! begin → fetch source → check balance → fetch destination → check currency
//!       → lock accounts → debit source → credit destination → record pair → commit
//! ```
//!
//! The balance check runs before the destination is touched so a transfer
//! that can never succeed takes no lock. The table lock turns write skew
//! between two interleaved transfers into a conflict the engine detects;
//! debiting before crediting keeps the row acquisition order fixed.
//!
//! # Outcome
//!
//! - commit succeeded → return the ledger
//! - storage conflict anywhere in the attempt → roll back, back off, restart
//! - any other failure → roll back, return it unchanged

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::{StorageError, WalletError};
use super::retry::RetryPolicy;
use super::store::{AccountStore, LedgerStore, UnitOfWork};
use super::types::Ledger;

/// Result of one attempt
enum Attempt {
    Committed(Ledger),
    Conflict(StorageError),
    Failed(WalletError),
}

impl From<WalletError> for Attempt {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Storage(s) if s.is_conflict() => Attempt::Conflict(s),
            other => Attempt::Failed(other),
        }
    }
}

impl From<StorageError> for Attempt {
    fn from(e: StorageError) -> Self {
        Attempt::from(WalletError::Storage(e))
    }
}

pub struct TransferCoordinator<U, A, L> {
    uow: Arc<U>,
    accounts: Arc<A>,
    ledgers: Arc<L>,
    retry: RetryPolicy,
}

impl<U, A, L> TransferCoordinator<U, A, L>
where
    U: UnitOfWork,
    A: AccountStore<U::Tx>,
    L: LedgerStore<U::Tx>,
{
    pub fn new(uow: Arc<U>, accounts: Arc<A>, ledgers: Arc<L>, retry: RetryPolicy) -> Self {
        Self {
            uow,
            accounts,
            ledgers,
            retry,
        }
    }

    /// Move `amount` from `source` to `destination`
    pub async fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<Ledger, WalletError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(WalletError::negative_amount(amount));
        }

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            match self.attempt(source, destination, amount).await {
                Attempt::Committed(ledger) => {
                    info!(
                        source,
                        destination,
                        %amount,
                        correlation_id = %ledger.correlation_id,
                        attempts,
                        "Transfer committed"
                    );
                    return Ok(ledger);
                }
                Attempt::Failed(e) => return Err(e),
                Attempt::Conflict(e) => {
                    if !self.retry.allows_retry(attempts) {
                        warn!(
                            source,
                            destination,
                            attempts,
                            error = %e,
                            "Transfer abandoned: retry budget exhausted"
                        );
                        return Err(WalletError::RetriesExhausted { attempts, last: e });
                    }

                    let delay = self.retry.backoff(attempts);
                    debug!(
                        source,
                        destination,
                        attempts,
                        delay_us = delay.as_micros() as u64,
                        error = %e,
                        "Serialization conflict, restarting transfer"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    /// One attempt in a brand-new unit of work
    async fn attempt(&self, source: &str, destination: &str, amount: Decimal) -> Attempt {
        let mut tx = match self.uow.begin().await {
            Ok(tx) => tx,
            Err(e) => return e.into(),
        };

        match self.apply(&mut tx, source, destination, amount).await {
            Ok(ledger) => match self.uow.commit(tx).await {
                Ok(()) => Attempt::Committed(ledger),
                Err(e) => e.into(),
            },
            Err(e) => {
                if let Err(rollback_err) = self.uow.rollback(tx).await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                e.into()
            }
        }
    }

    async fn apply(
        &self,
        tx: &mut U::Tx,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<Ledger, WalletError> {
        let from = self
            .accounts
            .get_by_name(tx, source)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(source.to_string()))?;

        if from.balance < amount {
            return Err(WalletError::InsufficientFunds(from.name));
        }

        let to = self
            .accounts
            .get_by_name(tx, destination)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(destination.to_string()))?;

        if from.currency != to.currency {
            return Err(WalletError::CurrencyMismatch {
                from: from.currency,
                to: to.currency,
            });
        }

        self.accounts.lock(tx).await?;
        self.accounts.adjust_balance(tx, &from, -amount).await?;
        self.accounts.adjust_balance(tx, &to, amount).await?;

        Ok(self.ledgers.add_pair(tx, &from, &to, amount).await?)
    }
}

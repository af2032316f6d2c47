//! Wallet facade
//!
//! Single capability surface for callers outside the wallet: list accounts,
//! list ledgers, transfer. Pure delegation, no logic of its own.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::coordinator::TransferCoordinator;
use super::error::WalletError;
use super::retry::RetryPolicy;
use super::store::{AccountStore, LedgerStore, UnitOfWork};
use super::types::{Account, Ledger};

#[async_trait]
pub trait Wallet: Send + Sync {
    async fn accounts_list(&self) -> Result<Vec<Account>, WalletError>;

    async fn ledgers_list(&self) -> Result<Vec<Ledger>, WalletError>;

    async fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<Ledger, WalletError>;
}

pub struct WalletService<U, A, L> {
    accounts: Arc<A>,
    ledgers: Arc<L>,
    coordinator: TransferCoordinator<U, A, L>,
}

impl<U, A, L> WalletService<U, A, L>
where
    U: UnitOfWork,
    A: AccountStore<U::Tx>,
    L: LedgerStore<U::Tx>,
{
    pub fn new(uow: Arc<U>, accounts: Arc<A>, ledgers: Arc<L>, retry: RetryPolicy) -> Self {
        let coordinator =
            TransferCoordinator::new(uow, accounts.clone(), ledgers.clone(), retry);
        Self {
            accounts,
            ledgers,
            coordinator,
        }
    }
}

#[async_trait]
impl<U, A, L> Wallet for WalletService<U, A, L>
where
    U: UnitOfWork + 'static,
    A: AccountStore<U::Tx> + 'static,
    L: LedgerStore<U::Tx> + 'static,
{
    async fn accounts_list(&self) -> Result<Vec<Account>, WalletError> {
        Ok(self.accounts.list().await?)
    }

    async fn ledgers_list(&self) -> Result<Vec<Ledger>, WalletError> {
        Ok(self.ledgers.list().await?)
    }

    async fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<Ledger, WalletError> {
        self.coordinator.transfer(source, destination, amount).await
    }
}

//! In-memory store for coordinator tests
//!
//! Emulates a serializable engine with optimistic validation: every unit of
//! work remembers the version of each account it read and buffers its
//! writes. Commit fails with a conflict if any of those accounts was
//! written by another unit of work in the meantime.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Barrier;

use super::error::StorageError;
use super::store::{AccountStore, LedgerStore, UnitOfWork};
use super::types::{Account, AccountKey, Currency, Ledger, LedgerPair, PaymentLeg};

/// One-shot failures to inject into the next matching calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ConflictOnLock,
    ConflictOnCommit,
    DatabaseErrorOnAdjust,
}

#[derive(Debug, Clone)]
struct Row {
    name: String,
    balance: Decimal,
    currency: Currency,
    version: u64,
}

#[derive(Default)]
struct State {
    accounts: BTreeMap<AccountKey, Row>,
    legs: Vec<PaymentLeg>,
    next_key: AccountKey,
}

/// Open unit of work
pub struct MemoryTx {
    reads: HashMap<AccountKey, u64>,
    deltas: Vec<(AccountKey, Decimal)>,
    legs: Vec<PaymentLeg>,
}

impl MemoryTx {
    fn pending(&self, key: AccountKey) -> Decimal {
        self.deltas
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, d)| *d)
            .sum()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    faults: Mutex<HashMap<Fault, u32>>,
    lock_barrier: Mutex<Option<(Arc<Barrier>, u32)>>,
    begins: AtomicU32,
    commits: AtomicU32,
    rollbacks: AtomicU32,
    conflicts: AtomicU32,
    locks: AtomicU32,
    fetches: Mutex<HashMap<String, u32>>,
}

fn injected(msg: &str) -> sqlx::Error {
    sqlx::Error::Protocol(msg.to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, balance: Decimal, currency: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_key += 1;
        let key = state.next_key;
        state.accounts.insert(
            key,
            Row {
                name: name.to_string(),
                balance,
                currency: Currency::new(currency),
                version: 0,
            },
        );
    }

    /// Fail the next `times` calls matching `fault`
    pub fn inject(&self, fault: Fault, times: u32) {
        self.faults.lock().unwrap().insert(fault, times);
    }

    /// Make the first `n` calls to `lock` wait for each other
    pub fn hold_first_lockers(&self, n: u32) {
        *self.lock_barrier.lock().unwrap() = Some((Arc::new(Barrier::new(n as usize)), n));
    }

    pub fn balance(&self, name: &str) -> Option<Decimal> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .values()
            .find(|row| row.name == name)
            .map(|row| row.balance)
    }

    /// Committed payment legs in write order
    pub fn payment_legs(&self) -> Vec<PaymentLeg> {
        self.state.lock().unwrap().legs.clone()
    }

    pub fn begin_count(&self) -> u32 {
        self.begins.load(Ordering::SeqCst)
    }

    /// Successful commits only
    pub fn commit_count(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollback_count(&self) -> u32 {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn conflict_count(&self) -> u32 {
        self.conflicts.load(Ordering::SeqCst)
    }

    pub fn lock_count(&self) -> u32 {
        self.locks.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self, name: &str) -> u32 {
        self.fetches.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn take_fault(&self, fault: Fault) -> bool {
        let mut faults = self.faults.lock().unwrap();
        match faults.get_mut(&fault) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn conflict(&self, msg: &str) -> StorageError {
        self.conflicts.fetch_add(1, Ordering::SeqCst);
        StorageError::Conflict(injected(msg))
    }

    /// Barrier for this lock call, if it is one of the held ones
    fn lock_barrier(&self) -> Option<Arc<Barrier>> {
        let mut slot = self.lock_barrier.lock().unwrap();
        match slot.as_mut() {
            Some((barrier, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Some(barrier.clone())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StorageError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTx {
            reads: HashMap::new(),
            deltas: Vec::new(),
            legs: Vec::new(),
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), StorageError> {
        if self.take_fault(Fault::ConflictOnCommit) {
            return Err(self.conflict("injected conflict on commit"));
        }

        let mut state = self.state.lock().unwrap();

        let stale = tx
            .reads
            .iter()
            .any(|(key, seen)| state.accounts.get(key).map(|row| row.version) != Some(*seen));
        if stale {
            drop(state);
            return Err(self.conflict("could not serialize access due to concurrent update"));
        }

        for (key, _) in &tx.deltas {
            let balance = state.accounts.get(key).map(|row| row.balance).unwrap_or_default();
            if balance + tx.pending(*key) < Decimal::ZERO {
                return Err(StorageError::Database(injected(
                    "new row violates check constraint \"accounts_balance_check\"",
                )));
            }
        }

        for (key, delta) in &tx.deltas {
            if let Some(row) = state.accounts.get_mut(key) {
                row.balance += *delta;
                row.version += 1;
            }
        }
        state.legs.extend(tx.legs);

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self, _tx: MemoryTx) -> Result<(), StorageError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl AccountStore<MemoryTx> for MemoryStore {
    async fn list(&self) -> Result<Vec<Account>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .map(|(key, row)| Account::new(*key, &row.name, row.balance, row.currency.clone()))
            .collect())
    }

    async fn get_by_name(
        &self,
        tx: &mut MemoryTx,
        name: &str,
    ) -> Result<Option<Account>, StorageError> {
        *self.fetches.lock().unwrap().entry(name.to_string()).or_default() += 1;

        let state = self.state.lock().unwrap();
        let found = state.accounts.iter().find(|(_, row)| row.name == name);
        Ok(found.map(|(key, row)| {
            tx.reads.entry(*key).or_insert(row.version);
            Account::new(
                *key,
                &row.name,
                row.balance + tx.pending(*key),
                row.currency.clone(),
            )
        }))
    }

    async fn adjust_balance(
        &self,
        tx: &mut MemoryTx,
        account: &Account,
        delta: Decimal,
    ) -> Result<(), StorageError> {
        if self.take_fault(Fault::DatabaseErrorOnAdjust) {
            return Err(StorageError::Database(injected("injected storage fault")));
        }
        if !self.state.lock().unwrap().accounts.contains_key(&account.key()) {
            return Err(StorageError::Database(sqlx::Error::RowNotFound));
        }
        tx.deltas.push((account.key(), delta));
        Ok(())
    }

    async fn lock(&self, _tx: &mut MemoryTx) -> Result<(), StorageError> {
        self.locks.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = self.lock_barrier() {
            barrier.wait().await;
        }
        if self.take_fault(Fault::ConflictOnLock) {
            return Err(self.conflict("injected conflict on lock"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore<MemoryTx> for MemoryStore {
    async fn list(&self) -> Result<Vec<Ledger>, StorageError> {
        let state = self.state.lock().unwrap();
        let name = |key: AccountKey| {
            state
                .accounts
                .get(&key)
                .map(|row| row.name.clone())
                .unwrap_or_default()
        };

        Ok(state
            .legs
            .chunks(2)
            .filter_map(|pair| match pair {
                [source, destination] => Some(Ledger::new(
                    source.correlation_id,
                    &name(source.account),
                    &name(destination.account),
                    destination.amount,
                )),
                _ => None,
            })
            .collect())
    }

    async fn add_pair(
        &self,
        tx: &mut MemoryTx,
        source: &Account,
        destination: &Account,
        amount: Decimal,
    ) -> Result<Ledger, StorageError> {
        let pair = LedgerPair::between(source, destination, amount);
        let ledger = pair.to_ledger();
        tx.legs.push(pair.source);
        tx.legs.push(pair.destination);
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_stale_read_fails_commit() {
        let store = MemoryStore::new();
        store.seed("alice", dec!(100), "USD");

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        let a = store.get_by_name(&mut first, "alice").await.unwrap().unwrap();
        let b = store.get_by_name(&mut second, "alice").await.unwrap().unwrap();

        store.adjust_balance(&mut first, &a, dec!(-10)).await.unwrap();
        store.adjust_balance(&mut second, &b, dec!(-20)).await.unwrap();

        store.commit(first).await.unwrap();
        let err = store.commit(second).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.balance("alice"), Some(dec!(90)));
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = MemoryStore::new();
        store.seed("alice", dec!(100), "USD");

        let mut tx = store.begin().await.unwrap();
        let a = store.get_by_name(&mut tx, "alice").await.unwrap().unwrap();
        store.adjust_balance(&mut tx, &a, dec!(-10)).await.unwrap();
        store.rollback(tx).await.unwrap();

        assert_eq!(store.balance("alice"), Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_negative_balance_rejected_on_commit() {
        let store = MemoryStore::new();
        store.seed("alice", dec!(5), "USD");

        let mut tx = store.begin().await.unwrap();
        let a = store.get_by_name(&mut tx, "alice").await.unwrap().unwrap();
        store.adjust_balance(&mut tx, &a, dec!(-10)).await.unwrap();
        let err = store.commit(tx).await.unwrap_err();

        assert!(!err.is_conflict());
        assert_eq!(store.balance("alice"), Some(dec!(5)));
    }

    #[tokio::test]
    async fn test_ledger_list_rebuilds_pairs() {
        let store = MemoryStore::new();
        store.seed("alice", dec!(100), "USD");
        store.seed("bob", dec!(0), "USD");

        let mut tx = store.begin().await.unwrap();
        let a = store.get_by_name(&mut tx, "alice").await.unwrap().unwrap();
        let b = store.get_by_name(&mut tx, "bob").await.unwrap().unwrap();
        let written = store.add_pair(&mut tx, &a, &b, dec!(7)).await.unwrap();
        store.commit(tx).await.unwrap();

        let ledgers = LedgerStore::list(&store).await.unwrap();
        assert_eq!(ledgers, vec![written]);
    }
}

//! PostgreSQL adapters for the storage seams

mod accounts;
mod ledgers;

pub use accounts::PgAccountStore;
pub use ledgers::PgLedgerStore;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::error::StorageError;
use super::store::UnitOfWork;
use crate::db::Database;

pub type PgTx = Transaction<'static, Postgres>;

#[async_trait]
impl UnitOfWork for Database {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StorageError> {
        let mut tx = self.pool().begin().await?;
        // Must precede every other statement of the transaction
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), StorageError> {
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&self, tx: PgTx) -> Result<(), StorageError> {
        tx.rollback().await?;
        Ok(())
    }
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::PgTx;
use crate::wallet::error::StorageError;
use crate::wallet::store::AccountStore;
use crate::wallet::types::{Account, Currency};

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    user_name: String,
    balance: Decimal,
    currency: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::new(row.id, row.user_name, row.balance, Currency::new(row.currency))
    }
}

/// `accounts` table
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore<PgTx> for PgAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StorageError> {
        let rows: Vec<AccountRow> =
            sqlx::query_as("SELECT id, user_name, balance, currency FROM accounts ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn get_by_name(&self, tx: &mut PgTx, name: &str) -> Result<Option<Account>, StorageError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, user_name, balance, currency FROM accounts WHERE user_name = $1",
        )
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(Account::from))
    }

    async fn adjust_balance(
        &self,
        tx: &mut PgTx,
        account: &Account,
        delta: Decimal,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE accounts SET balance = balance + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(delta)
        .bind(account.key())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Database(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn lock(&self, tx: &mut PgTx) -> Result<(), StorageError> {
        // Self-conflicting, but plain SELECTs still go through
        sqlx::query("LOCK TABLE accounts IN SHARE UPDATE EXCLUSIVE MODE")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

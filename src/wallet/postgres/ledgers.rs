use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::PgTx;
use crate::wallet::error::StorageError;
use crate::wallet::store::LedgerStore;
use crate::wallet::types::{Account, Ledger, LedgerPair};

/// One transfer, joined from its two payment rows
#[derive(Debug, FromRow)]
struct LedgerRow {
    guid: Uuid,
    source: String,
    destination: String,
    amount: Decimal,
}

// The source leg is always inserted first, so it holds the lower id
const LIST_LEDGERS: &str = r#"
    SELECT o.guid, src.user_name AS source, dst.user_name AS destination, i.amount
    FROM payments o
    JOIN payments i ON i.guid = o.guid AND i.id > o.id
    JOIN accounts src ON src.id = o.account_id
    JOIN accounts dst ON dst.id = i.account_id
    ORDER BY o.id
"#;

/// `payments` table
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore<PgTx> for PgLedgerStore {
    async fn list(&self) -> Result<Vec<Ledger>, StorageError> {
        let rows: Vec<LedgerRow> = sqlx::query_as(LIST_LEDGERS).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| Ledger::new(row.guid, &row.source, &row.destination, row.amount))
            .collect())
    }

    async fn add_pair(
        &self,
        tx: &mut PgTx,
        source: &Account,
        destination: &Account,
        amount: Decimal,
    ) -> Result<Ledger, StorageError> {
        let pair = LedgerPair::between(source, destination, amount);

        sqlx::query(
            "INSERT INTO payments (guid, account_id, amount) VALUES ($1, $2, $3), ($1, $4, $5)",
        )
        .bind(pair.correlation_id)
        .bind(pair.source.account)
        .bind(pair.source.amount)
        .bind(pair.destination.account)
        .bind(pair.destination.amount)
        .execute(&mut **tx)
        .await?;

        Ok(pair.to_ledger())
    }
}

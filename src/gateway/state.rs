use std::sync::Arc;

use crate::db::Database;
use crate::wallet::Wallet;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<dyn Wallet>,
    /// Pinged by the health check; absent when running without PostgreSQL
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(wallet: Arc<dyn Wallet>, db: Option<Arc<Database>>) -> Self {
        Self { wallet, db }
    }
}

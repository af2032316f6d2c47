//! Wallet handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiResult, PayRequest, ok};
use crate::wallet::{Account, Ledger};

/// Transfer between two accounts
///
/// POST /wallet/pay/{sender}/{receiver}
#[utoipa::path(
    post,
    path = "/wallet/pay/{sender}/{receiver}",
    params(
        ("sender" = String, Path, description = "Source account name"),
        ("receiver" = String, Path, description = "Destination account name")
    ),
    request_body(content = PayRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Transfer committed", body = Ledger),
        (status = 400, description = "Malformed body or invalid amount"),
        (status = 402, description = "Sender balance too low"),
        (status = 404, description = "Unknown account"),
        (status = 500, description = "Currency mismatch or storage failure"),
        (status = 503, description = "Gave up after repeated serialization conflicts")
    ),
    tag = "Wallet"
)]
pub async fn pay(
    State(state): State<Arc<AppState>>,
    Path((sender, receiver)): Path<(String, String)>,
    body: Result<Json<PayRequest>, JsonRejection>,
) -> ApiResult<Ledger> {
    let Json(req) = body?;
    let ledger = state
        .wallet
        .transfer(&sender, &receiver, req.amount.inner())
        .await?;
    ok(ledger)
}

/// List every completed transfer
///
/// GET /wallet/ledgers
#[utoipa::path(
    get,
    path = "/wallet/ledgers",
    responses(
        (status = 200, description = "Ledger entries", body = [Ledger]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Wallet"
)]
pub async fn list_ledgers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Ledger>> {
    ok(state.wallet.ledgers_list().await?)
}

/// List every account
///
/// GET /wallet/accounts
#[utoipa::path(
    get,
    path = "/wallet/accounts",
    responses(
        (status = 200, description = "Accounts", body = [Account]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Wallet"
)]
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Account>> {
    ok(state.wallet.accounts_list().await?)
}

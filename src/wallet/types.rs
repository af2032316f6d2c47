//! Wallet domain types
//!
//! Accounts are addressed by name across the service boundary. The storage
//! surrogate key stays inside the crate and never reaches a serializer.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Storage surrogate key of an account row
pub(crate) type AccountKey = i64;

/// Currency code (e.g. "USD")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "USD")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet account
///
/// Serialized with the account name under `id`, which is the identifier
/// callers use in transfer paths.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Account {
    #[serde(skip)]
    key: AccountKey,
    /// Human-readable account identifier
    #[serde(rename = "id")]
    #[schema(example = "alice")]
    pub name: String,
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
    pub currency: Currency,
}

impl Account {
    pub(crate) fn new(
        key: AccountKey,
        name: impl Into<String>,
        balance: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            balance,
            currency,
        }
    }

    pub(crate) fn key(&self) -> AccountKey {
        self.key
    }
}

/// Side of a ledger entry, from the perspective of the owning account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One directional view of a transfer
///
/// `amount` is always the positive magnitude; the direction says which way it moved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Payment {
    /// Account owning this view
    pub account: String,
    #[schema(value_type = String, example = "30")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    pub direction: Direction,
}

/// Completed transfer, projected from its correlated payment pair
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Ledger {
    pub correlation_id: Uuid,
    /// Source account view (money leaving)
    pub outgoing: Payment,
    /// Destination account view (money arriving)
    pub incoming: Payment,
}

impl Ledger {
    pub fn new(correlation_id: Uuid, source: &str, destination: &str, amount: Decimal) -> Self {
        let magnitude = amount.abs();
        Self {
            correlation_id,
            outgoing: Payment {
                account: source.to_string(),
                amount: magnitude,
                to_account: Some(destination.to_string()),
                from_account: None,
                direction: Direction::Outgoing,
            },
            incoming: Payment {
                account: destination.to_string(),
                amount: magnitude,
                to_account: None,
                from_account: Some(source.to_string()),
                direction: Direction::Incoming,
            },
        }
    }
}

/// One persisted leg of a transfer
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PaymentLeg {
    pub correlation_id: Uuid,
    pub account: AccountKey,
    /// Signed: negative for the source leg, positive for the destination leg
    pub amount: Decimal,
}

/// The two legs of one transfer, written together in a single storage call
#[derive(Debug, Clone)]
pub(crate) struct LedgerPair {
    pub correlation_id: Uuid,
    pub source: PaymentLeg,
    pub destination: PaymentLeg,
    source_name: String,
    destination_name: String,
}

impl LedgerPair {
    /// Build a pair with a fresh correlation id
    pub fn between(source: &Account, destination: &Account, amount: Decimal) -> Self {
        let correlation_id = Uuid::new_v4();
        Self {
            correlation_id,
            source: PaymentLeg {
                correlation_id,
                account: source.key(),
                amount: -amount,
            },
            destination: PaymentLeg {
                correlation_id,
                account: destination.key(),
                amount,
            },
            source_name: source.name.clone(),
            destination_name: destination.name.clone(),
        }
    }

    pub fn to_ledger(&self) -> Ledger {
        Ledger::new(
            self.correlation_id,
            &self.source_name,
            &self.destination_name,
            self.destination.amount,
        )
    }
}

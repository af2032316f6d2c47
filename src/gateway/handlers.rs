mod health;
mod wallet;

pub use health::{HealthResponse, __path_health_check, health_check};
pub use wallet::{__path_list_accounts, __path_list_ledgers, __path_pay, list_accounts, list_ledgers, pay};

use super::types::ApiError;

/// Unknown route, still answered in the envelope
pub async fn not_found() -> ApiError {
    ApiError::not_found("route not found")
}

//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`PayRequest`]: Transfer request body
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified `{data, error}` envelope
//! - [`ApiError`]: Error rendered into the envelope with a status code

pub mod money;
pub mod response;

pub use money::StrictDecimal;
pub use response::{ApiError, ApiResponse, ApiResult, ok};

use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /wallet/pay/{sender}/{receiver}`
#[derive(Debug, Deserialize, ToSchema)]
pub struct PayRequest {
    /// Non-negative decimal, as a JSON string or number
    #[schema(value_type = String, example = "30.00")]
    pub amount: StrictDecimal,
}

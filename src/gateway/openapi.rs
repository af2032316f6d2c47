//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::PayRequest;
use crate::wallet::{Account, Currency, Direction, Ledger, Payment};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Service API",
        version = "1.0.0",
        description = "Account-to-account transfers with a double-entry payment ledger.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::pay,
        crate::gateway::handlers::list_ledgers,
        crate::gateway::handlers::list_accounts,
    ),
    components(
        schemas(
            HealthResponse,
            PayRequest,
            Account,
            Currency,
            Ledger,
            Payment,
            Direction,
        )
    ),
    tags(
        (name = "Wallet", description = "Accounts, ledgers and transfers"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Wallet Service API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json = ApiDoc::openapi().to_pretty_json().unwrap();
        assert!(json.contains("Wallet Service API"));
        assert!(json.contains("correlation_id"));
    }

    #[test]
    fn test_wallet_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        assert!(paths.paths.contains_key("/health"));
        assert!(paths.paths.contains_key("/wallet/pay/{sender}/{receiver}"));
        assert!(paths.paths.contains_key("/wallet/ledgers"));
        assert!(paths.paths.contains_key("/wallet/accounts"));
    }

    #[test]
    fn test_schemas_registered() {
        let components = ApiDoc::openapi().components.expect("should have components");
        for name in ["Account", "Ledger", "Payment", "PayRequest", "HealthResponse"] {
            assert!(components.schemas.contains_key(name), "missing {}", name);
        }
    }
}

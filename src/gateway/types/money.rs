//! Money types for API boundary enforcement

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// Accepts a JSON string or a JSON number. Numbers are read from their
/// literal text, never through f64, and follow the same rules:
/// - Rejects empty strings
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects scientific notation
/// - Rejects a `+` prefix
/// - Rejects negative numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("Amount cannot be empty".into());
        }
        if s.starts_with('.') {
            return Err("Invalid format: use 0.5 not .5".into());
        }
        if s.ends_with('.') {
            return Err("Invalid format: use 5.0 not 5.".into());
        }
        if s.contains('e') || s.contains('E') {
            return Err("Invalid format: scientific notation not allowed".into());
        }
        if s.starts_with('+') {
            return Err("Invalid format: + prefix not allowed".into());
        }

        let d = Decimal::from_str(s).map_err(|e| format!("Invalid decimal: {}", e))?;

        if d.is_sign_negative() {
            return Err("Amount cannot be negative".into());
        }

        Ok(StrictDecimal(d))
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        use serde_json::Value;

        // serde_json keeps the literal digits of a number, so both forms get the same checks
        let raw = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(D::Error::custom(format!(
                    "Amount must be a decimal string or number, got {}",
                    other
                )));
            }
        };

        StrictDecimal::parse(&raw).map_err(D::Error::custom)
    }
}

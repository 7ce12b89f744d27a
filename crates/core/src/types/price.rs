//! Decimal price as reported by the catalog backend.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product price in the backend's currency.
///
/// The backend reports `pvp_ecommerce` either as a JSON number or as a
/// numeric string; both decode to the same [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Number(n) => Self::parse_text(&n.to_string()),
            Value::String(s) => Self::parse_text(s),
            _ => None,
        };
        parsed.ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
    }
}

/// Deserialize an optional price, treating unparseable values as absent.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Price::deserialize(&value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number() {
        let price: Price = serde_json::from_str("1499.9").unwrap();
        assert_eq!(price.to_string(), "1499.90");
    }

    #[test]
    fn test_deserialize_string() {
        let price: Price = serde_json::from_str("\" 25 \"").unwrap();
        assert_eq!(price.amount(), Decimal::new(25, 0));
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Price>("\"n/a\"").is_err());
        assert!(serde_json::from_str::<Price>("true").is_err());
    }
}

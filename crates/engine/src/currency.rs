use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code attached to a group.
///
/// Divvy is effectively mono-currency per group (default `JPY`); the engine
/// never converts between currencies, it only records which one a group uses.
/// All monetary values are stored as an `i64` number of **minor units**
/// (yen for JPY, cents for USD/EUR, ...); rendering them with a decimal
/// point is the client's concern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Jpy,
    Usd,
    Eur,
    Gbp,
    Cny,
    Krw,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cny => "CNY",
            Currency::Krw => "KRW",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "CNY" => Ok(Currency::Cny),
            "KRW" => Ok(Currency::Krw),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::try_from("jpy").unwrap(), Currency::Jpy);
        assert_eq!(Currency::try_from(" EUR ").unwrap(), Currency::Eur);
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert!(Currency::try_from("BTC").is_err());
        assert!(Currency::try_from("").is_err());
    }
}

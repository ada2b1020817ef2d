use crate::error::TransactionError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything the aggregator can replay.  `Transaction` implements it, but a caller can hand in its
/// own record type instead of converting.
pub trait Trade {
    fn symbol(&self) -> &str;

    fn ttype(&self) -> TradeType;

    /// shares traded, always positive
    fn quantity(&self) -> u64;

    /// price per share in the account's home currency
    fn price(&self) -> f64;

    fn date(&self) -> NaiveDate;

    /// quantity * price
    fn value(&self) -> f64 {
        self.quantity() as f64 * self.price()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl std::str::FromStr for TradeType {
    type Err = TransactionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" | "long" => Ok(TradeType::Buy),
            "sell" | "s" | "short" => Ok(TradeType::Sell),
            _ => Err(TransactionError::InvalidType(s.trim().to_owned())),
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => write!(f, "BUY"),
            TradeType::Sell => write!(f, "SELL"),
        }
    }
}

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a store record or text line cannot become a `Transaction`.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("stock symbol is required")]
    EmptySymbol,

    #[error("'{0}' is not a valid value for TradeType")]
    InvalidType(String),

    #[error("quantity must be a whole number greater than 0, got: {0}")]
    InvalidQuantity(String),

    #[error("price must be greater than 0, got: {0}")]
    InvalidPrice(String),

    #[error("unrecognised transaction date: {0}")]
    InvalidDate(String),

    #[error("malformed transaction record: {0}")]
    MalformedRecord(String),

    #[error("deserializing JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conditions that stop an aggregation run outright.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error(
        "oversold position: transaction {index} sells {requested} {symbol} on {date} \
        but only {tracked} are held"
    )]
    Oversold {
        index: usize,
        symbol: String,
        date: NaiveDate,
        tracked: i64,
        requested: u64,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("'{0}' is not a valid oversold policy")]
    UnknownPolicy(String),

    #[error("deserializing JSON config error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversold_message_names_the_trade() {
        let err = PortfolioError::Oversold {
            index: 3,
            symbol: "TCS".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            tracked: 2,
            requested: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("transaction 3"));
        assert!(msg.contains("sells 5 TCS on 2024-02-01"));
        assert!(msg.contains("only 2 are held"));
    }

    #[test]
    fn json_errors_convert() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: TransactionError = json_err.into();
        assert!(matches!(err, TransactionError::Json(_)));

        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}

use crate::error::TransactionError;
use crate::inventory::{Trade, TradeType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest quantity a single trade may carry; positions are tracked as `i64`.
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

/// Transaction
/// date, symbol, trade type, quantity, price
///
/// Only built through validation, so a `Transaction` always has an uppercase non-empty symbol,
/// a positive whole quantity and a finite positive price.
///
/// Implements `Trade` to be replayed by the `Aggregator`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction", into = "RawTransaction")]
pub struct Transaction {
    id: Option<u64>,
    symbol: String,
    name: Option<String>,
    ttype: TradeType,
    quantity: u64,
    price: f64,
    date: NaiveDate,
}

impl Transaction {
    pub fn new(
        symbol: &str,
        ttype: TradeType,
        quantity: u64,
        price: f64,
        date: NaiveDate,
    ) -> Result<Self, TransactionError> {
        let symbol = normalize_symbol(symbol)?;
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(TransactionError::InvalidQuantity(quantity.to_string()));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(TransactionError::InvalidPrice(price.to_string()));
        }
        Ok(Transaction {
            id: None,
            symbol,
            name: None,
            ttype,
            quantity,
            price,
            date,
        })
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.name = if name.is_empty() { None } else { Some(name.to_owned()) };
        self
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Trade for Transaction {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn ttype(&self) -> TradeType {
        self.ttype
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Compact text form: `date,symbol,type,quantity,price`, e.g. `2024-01-05,INFY,buy,10,1500.5`
impl FromStr for Transaction {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field: Vec<&str> = s.split(',').map(str::trim).collect();
        if field.len() != 5 {
            return Err(TransactionError::MalformedRecord(s.to_owned()));
        }
        let date = parse_date(field[0])?;
        let ttype = TradeType::from_str(field[2])?;
        let quantity = field[3]
            .parse::<u64>()
            .map_err(|_| TransactionError::InvalidQuantity(field[3].to_owned()))?;
        let price = field[4]
            .parse::<f64>()
            .map_err(|_| TransactionError::InvalidPrice(field[4].to_owned()))?;
        Transaction::new(field[1], ttype, quantity, price, date)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} x {} @ {:.2}",
            self.date, self.ttype, self.quantity, self.symbol, self.price
        )
    }
}

/// A number the store may hand over either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseNumber::Number(n) => write!(f, "{}", n),
            LooseNumber::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Row shape of the transactions table, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub stock_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_name: Option<String>,
    pub transaction_type: String,
    pub quantity: LooseNumber,
    pub price: LooseNumber,
    pub transaction_date: String,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = TransactionError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let ttype = TradeType::from_str(&raw.transaction_type)?;
        let quantity = raw
            .quantity
            .as_f64()
            .filter(|q| q.is_finite() && *q >= 1.0 && q.fract() == 0.0 && *q < MAX_QUANTITY as f64)
            .map(|q| q as u64)
            .ok_or_else(|| TransactionError::InvalidQuantity(raw.quantity.to_string()))?;
        let price = raw
            .price
            .as_f64()
            .ok_or_else(|| TransactionError::InvalidPrice(raw.price.to_string()))?;
        let date = parse_date(&raw.transaction_date)?;

        let mut transaction = Transaction::new(&raw.stock_symbol, ttype, quantity, price, date)?;
        if let Some(name) = raw.stock_name.as_deref() {
            transaction = transaction.with_name(name);
        }
        transaction.id = raw.id;
        Ok(transaction)
    }
}

impl From<Transaction> for RawTransaction {
    fn from(t: Transaction) -> Self {
        RawTransaction {
            id: t.id,
            stock_name: t.name,
            transaction_type: t.ttype.to_string(),
            quantity: LooseNumber::Number(t.quantity as f64),
            price: LooseNumber::Number(t.price),
            transaction_date: t.date.format("%Y-%m-%d").to_string(),
            stock_symbol: t.symbol,
        }
    }
}

fn normalize_symbol(symbol: &str) -> Result<String, TransactionError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(TransactionError::EmptySymbol);
    }
    Ok(symbol.to_uppercase())
}

/// ISO `YYYY-MM-DD`, or `DD/MM/YYYY` as printed on contract notes
pub fn parse_date(s: &str) -> Result<NaiveDate, TransactionError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| TransactionError::InvalidDate(s.to_owned()))
}

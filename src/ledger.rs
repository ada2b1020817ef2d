//! In-memory transaction store feeding the aggregator.
//!
//! The ledger hands out snapshots ordered by date, ties broken by id, which is the order the
//! aggregator expects.  Everything it holds has already been validated into a `Transaction`.

use crate::aggregator::{Aggregator, Portfolio};
use crate::error::{PortfolioError, TransactionError};
use crate::inventory::{Trade, TradeType};
use crate::transaction::{RawTransaction, Transaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    last_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON array of store rows.  One invalid row rejects the whole batch.
    pub fn from_json(s: &str) -> Result<Self, TransactionError> {
        let rows: Vec<RawTransaction> = serde_json::from_str(s)?;
        let mut ledger = Ledger::new();
        for row in rows {
            let transaction = Transaction::try_from(row)?;
            ledger.restore(transaction);
        }
        debug!(transactions = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    /// Stores a new transaction under a fresh id and returns the id.
    pub fn insert(&mut self, transaction: Transaction) -> u64 {
        self.last_id += 1;
        let id = self.last_id;
        debug!(id, %transaction, "transaction recorded");
        self.transactions.push(transaction.with_id(id));
        id
    }

    pub fn insert_all<I>(&mut self, transactions: I) -> Vec<u64>
    where
        I: IntoIterator<Item = Transaction>,
    {
        transactions.into_iter().map(|t| self.insert(t)).collect()
    }

    // keeps an id that came from the store unless it is already taken
    fn restore(&mut self, transaction: Transaction) {
        match transaction.id() {
            Some(id) if self.get(id).is_none() => {
                self.last_id = self.last_id.max(id);
                self.transactions.push(transaction);
            }
            _ => {
                self.insert(transaction);
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == Some(id))
    }

    /// Replaces the transaction stored under `id`, returning the previous one.
    pub fn update(&mut self, id: u64, transaction: Transaction) -> Option<Transaction> {
        let slot = self.transactions.iter_mut().find(|t| t.id() == Some(id))?;
        debug!(id, %transaction, "transaction updated");
        Some(std::mem::replace(slot, transaction.with_id(id)))
    }

    pub fn remove(&mut self, id: u64) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id() == Some(id))?;
        debug!(id, "transaction removed");
        Some(self.transactions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Snapshot sorted by date ascending, ties by id
    pub fn ordered(&self) -> Vec<Transaction> {
        let mut snapshot = self.transactions.clone();
        snapshot.sort_by_key(|t| (t.date(), t.id()));
        snapshot
    }

    /// Ordered snapshot restricted to `filter`
    pub fn filter(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.ordered()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    pub fn summary(&self, filter: &TransactionFilter) -> TradeSummary {
        TradeSummary::from_trades(&self.filter(filter))
    }

    /// Replays the ordered snapshot.
    pub fn portfolio(&self, aggregator: &Aggregator) -> Result<Portfolio, PortfolioError> {
        aggregator.aggregate(&self.ordered())
    }
}

/// Narrows a transaction list.  Unset fields match everything.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    /// inclusive
    pub start_date: Option<NaiveDate>,
    /// inclusive
    pub end_date: Option<NaiveDate>,
    /// case-insensitive substring of the symbol
    pub symbol: Option<String>,
    pub ttype: Option<TradeType>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_owned());
        self
    }

    pub fn ttype(mut self, ttype: TradeType) -> Self {
        self.ttype = Some(ttype);
        self
    }

    pub fn matches<T: Trade>(&self, trade: &T) -> bool {
        let date = trade.date();
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
            && self.symbol.as_deref().map_or(true, |s| {
                trade.symbol().to_lowercase().contains(&s.trim().to_lowercase())
            })
            && self.ttype.map_or(true, |ttype| trade.ttype() == ttype)
    }
}

/// Count and gross value of a list of trades, split by side.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub count: usize,
    pub total_buy_value: f64,
    pub total_sell_value: f64,
}

impl TradeSummary {
    pub fn from_trades<T: Trade>(trades: &[T]) -> Self {
        trades.iter().fold(TradeSummary::default(), |mut summary, t| {
            summary.count += 1;
            match t.ttype() {
                TradeType::Buy => summary.total_buy_value += t.value(),
                TradeType::Sell => summary.total_sell_value += t.value(),
            }
            summary
        })
    }
}

/// True when no trade is dated before the one preceding it.
///
/// The aggregator trusts its input order; callers assembling histories by hand can check with
/// this first.
pub fn is_date_ordered<T: Trade>(trades: &[T]) -> bool {
    trades.windows(2).all(|w| w[0].date() <= w[1].date())
}

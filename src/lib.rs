//! Portfolio cost basis replays a stock transaction history into current holdings and realized
//! profit / loss, using weighted-average cost.  Open positions can then be valued against current
//! prices for unrealized profit / loss.
//!
//! - `Aggregator` / `aggregate` - replays an ordered history into a `Portfolio`: open holdings,
//!     one `RealizedEvent` per sale, the realized total and any data-quality `Warning`s
//!
//! - `Position` - running quantity, invested capital and average cost of one symbol
//! - `RealizedEvent` - a sale matched against the average cost at that moment, captures gain/loss
//! - `Transaction` - a validated BUY or SELL.  Can be replaced by a user defined struct that
//!     implements the `Trade` trait
//! - `Ledger` - in-memory store that serves transactions in date order
//! - `PortfolioValuation` - holdings priced through a `PriceSource`
//!
//! All open shares of a symbol share one blended cost; there is no FIFO/LIFO lot matching.  The
//! history is taken in the order given.
//!
//! Example
//! ```
//! use portfolio_costbasis::aggregator::aggregate;
//! use portfolio_costbasis::realized::RealizedEvent;
//! use portfolio_costbasis::transaction::Transaction;
//!
//! let transactions: Vec<Transaction> = [
//!     "2024-01-01,INFY,buy,10,100.0",
//!     "2024-02-01,INFY,sell,4,150.0",
//! ]
//! .iter()
//! .map(|line| line.parse().unwrap())
//! .collect();
//!
//! let portfolio = aggregate(&transactions);
//!
//! // remaining position
//! let infy = portfolio.holding("INFY").unwrap();
//! assert_eq!(infy.quantity(), 6);
//! assert_eq!(infy.invested_capital(), 600.0);
//! assert_eq!(infy.average_cost(), 100.0);
//!
//! // symbol, sale date, quantity sold, sell price, average cost at sale
//! let sale = RealizedEvent::new("INFY", "2024-02-01".parse().unwrap(), 4, 150.0, 100.0);
//! assert_eq!(portfolio.realized(), [sale]);
//! assert_eq!(portfolio.total_realized(), 200.0);
//! ```
//!
//! Look also at `demos/portfolio_summary.rs`.

/// replays transactions into a `Portfolio`
pub mod aggregator;
/// `AggregatorConfig` and the oversold policy
pub mod config;
/// error types
pub mod error;
/// running per-symbol `Position`
pub mod holding;
/// the `Trade` trait to use with the aggregator if user defined struct instead of using `Transaction`
pub mod inventory;
/// in-memory transaction store, filters and summaries
pub mod ledger;
/// struct and functions related to `RealizedEvent` - realized gains/losses
pub mod realized;
/// defined `Transaction` struct and store row parsing
pub mod transaction;
/// valuing holdings at current prices - unrealized gains/losses
pub mod unrealized;

pub use aggregator::{aggregate, Aggregator, Portfolio, Warning, WarningKind};
pub use config::{AggregatorConfig, OversoldPolicy};
pub use error::{ConfigError, PortfolioError, TransactionError};
pub use holding::Position;
pub use inventory::{Trade, TradeType};
pub use ledger::{Ledger, TradeSummary, TransactionFilter};
pub use realized::RealizedEvent;
pub use transaction::Transaction;
pub use unrealized::{PortfolioValuation, PriceSource, StaticPrices, Valuation};

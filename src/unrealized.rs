use crate::aggregator::Portfolio;
use crate::holding::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Somewhere to look up the current market price of a symbol.
///
/// `None` means the price is unavailable.  Quotes that are zero, negative or not finite are
/// treated the same way by the valuation code.
pub trait PriceSource {
    fn price(&self, symbol: &str) -> Option<f64>;
}

/// Fixed price table, e.g. filled from the last close
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPrices(HashMap<String, f64>);

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, price: f64) {
        self.0.insert(symbol.trim().to_uppercase(), price);
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for StaticPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut prices = StaticPrices::new();
        for (symbol, price) in iter {
            prices.insert(symbol.as_ref(), price);
        }
        prices
    }
}

impl PriceSource for StaticPrices {
    fn price(&self, symbol: &str) -> Option<f64> {
        self.0.get(symbol).copied()
    }
}

impl<F> PriceSource for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn price(&self, symbol: &str) -> Option<f64> {
        self(symbol)
    }
}

/// A holding valued at its current market price.
///
/// Price dependent figures are `None` when no usable price was found; the percentage is also
/// `None` when nothing is invested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub symbol: String,
    pub quantity: i64,
    pub average_cost: f64,
    pub invested_capital: f64,
    pub current_price: Option<f64>,
    pub market_value: Option<f64>,
    pub unrealized: Option<f64>,
    pub unrealized_percent: Option<f64>,
    /// set when the aggregation raised a warning for this symbol
    pub flagged: bool,
}

impl Valuation {
    pub fn new<P: PriceSource + ?Sized>(position: &Position, prices: &P, flagged: bool) -> Self {
        let current_price = prices
            .price(position.symbol())
            .filter(|p| p.is_finite() && *p > 0.0);
        let quantity = position.quantity() as f64;
        let unrealized = current_price.map(|p| quantity * (p - position.average_cost()));
        let unrealized_percent = unrealized
            .filter(|_| position.invested_capital() != 0.0)
            .map(|u| u / position.invested_capital() * 100.0);

        Valuation {
            symbol: position.symbol().to_owned(),
            quantity: position.quantity(),
            average_cost: position.average_cost(),
            invested_capital: position.invested_capital(),
            current_price,
            market_value: current_price.map(|p| quantity * p),
            unrealized,
            unrealized_percent,
            flagged,
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} quantity:{}, avg_cost:{:.2}, invested:{:.2}",
            self.symbol,
            if self.flagged { " (!)" } else { "" },
            self.quantity,
            self.average_cost,
            self.invested_capital
        )?;
        match (self.current_price, self.unrealized) {
            (Some(price), Some(unrealized)) => {
                write!(f, ", price:{:.2}, unrealized:{:.2}", price, unrealized)?;
                if let Some(pct) = self.unrealized_percent {
                    write!(f, " ({:.2}%)", pct)?;
                }
                Ok(())
            }
            _ => write!(f, ", price: unavailable"),
        }
    }
}

/// Every holding of a `Portfolio` valued, plus portfolio-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<Valuation>,
    pub total_invested: f64,
    /// holdings without a price count at their cost
    pub total_current_value: f64,
    /// over priced holdings only
    pub total_unrealized: f64,
    pub total_realized: f64,
}

impl PortfolioValuation {
    pub fn new<P: PriceSource + ?Sized>(portfolio: &Portfolio, prices: &P) -> Self {
        let holdings: Vec<Valuation> = portfolio
            .holdings()
            .values()
            .map(|position| Valuation::new(position, prices, portfolio.is_flagged(position.symbol())))
            .collect();

        let total_invested = holdings.iter().map(|v| v.invested_capital).sum();
        let total_current_value = holdings
            .iter()
            .map(|v| v.market_value.unwrap_or(v.quantity as f64 * v.average_cost))
            .sum();
        let total_unrealized = holdings.iter().filter_map(|v| v.unrealized).sum();

        PortfolioValuation {
            holdings,
            total_invested,
            total_current_value,
            total_unrealized,
            total_realized: portfolio.total_realized(),
        }
    }

    /// Holdings that still need a price
    pub fn unpriced(&self) -> impl Iterator<Item = &str> {
        self.holdings
            .iter()
            .filter(|v| v.current_price.is_none())
            .map(|v| v.symbol.as_str())
    }
}

use crate::config::OversoldPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position holds the running weighted-average-cost state of one symbol.
///
/// buy -> add shares and their cost to the basis
/// sell -> remove shares at the pre-sale average cost and report what was realized
///
/// All open shares share one blended cost, there are no lots.  `average_cost` is recomputed after
/// every change and is zero whenever the position is not long.  A flat position carries no
/// invested capital.  Quantities saturate at the `i64` bounds instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    symbol: String,
    quantity: i64,
    invested_capital: f64,
    average_cost: f64,
}

/// Result of applying one sale to a `Position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sale {
    /// shares actually taken out of the position
    pub quantity: u64,
    pub average_cost: f64,
    /// open quantity before the sale
    pub tracked: i64,
}

impl Sale {
    /// the average cost could not be derived from the position and was replaced by the sale price
    pub fn is_zero_quantity(&self) -> bool {
        self.tracked <= 0
    }
}

impl Position {
    pub fn new(symbol: &str) -> Self {
        Position {
            symbol: symbol.to_owned(),
            quantity: 0,
            invested_capital: 0.0,
            average_cost: 0.0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn invested_capital(&self) -> f64 {
        self.invested_capital
    }

    pub fn average_cost(&self) -> f64 {
        self.average_cost
    }

    /// A holding: still long after all transactions
    pub fn is_open(&self) -> bool {
        self.quantity > 0
    }

    /// Whether a sale of `quantity` is fully backed by open shares
    pub fn covers(&self, quantity: u64) -> bool {
        self.quantity > 0 && self.quantity as u64 >= quantity
    }

    pub(crate) fn buy(&mut self, quantity: u64, price: f64) {
        self.quantity = self.quantity.saturating_add(signed(quantity));
        self.invested_capital += quantity as f64 * price;
        self.refresh_average();
    }

    // Average cost comes from the position before the sale.  A flat or short position has no
    // cost to divide out, so the sale price stands in and the sale realizes exactly zero.
    pub(crate) fn sell(&mut self, quantity: u64, price: f64, policy: OversoldPolicy) -> Sale {
        let tracked = self.quantity;
        let average_cost = if tracked > 0 {
            self.invested_capital / tracked as f64
        } else {
            price
        };

        let quantity = match policy {
            OversoldPolicy::Clamp => quantity.min(tracked.max(0) as u64),
            OversoldPolicy::Permissive | OversoldPolicy::Reject => quantity,
        };

        self.quantity = self.quantity.saturating_sub(signed(quantity));
        self.invested_capital -= quantity as f64 * average_cost;
        self.refresh_average();

        Sale {
            quantity,
            average_cost,
            tracked,
        }
    }

    // A flat position carries no capital, whichever side it was reached from.
    fn refresh_average(&mut self) {
        if self.quantity == 0 {
            self.invested_capital = 0.0;
        }
        self.average_cost = if self.quantity > 0 {
            self.invested_capital / self.quantity as f64
        } else {
            0.0
        };
    }
}

fn signed(quantity: u64) -> i64 {
    i64::try_from(quantity).unwrap_or(i64::MAX)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position {}; quantity:{}, average_cost:{:.4}, invested:{:.4}",
            self.symbol, self.quantity, self.average_cost, self.invested_capital
        )
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Holds the gain or loss locked in by one sale, measured against the average cost of the
/// position at the moment of the sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedEvent {
    symbol: String,
    date: NaiveDate,
    quantity_sold: u64,
    sell_price: f64,
    average_cost_at_sale: f64,
    realized_profit: f64,
}

impl RealizedEvent {
    pub fn new(
        symbol: &str,
        date: NaiveDate,
        quantity_sold: u64,
        sell_price: f64,
        average_cost_at_sale: f64,
    ) -> Self {
        let quantity = quantity_sold as f64;
        RealizedEvent {
            symbol: symbol.to_owned(),
            date,
            quantity_sold,
            sell_price,
            average_cost_at_sale,
            realized_profit: quantity * sell_price - quantity * average_cost_at_sale,
        }
    }

    // getters
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
    pub fn date(&self) -> NaiveDate {
        self.date
    }
    pub fn quantity_sold(&self) -> u64 {
        self.quantity_sold
    }
    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }
    pub fn average_cost_at_sale(&self) -> f64 {
        self.average_cost_at_sale
    }
    pub fn realized_profit(&self) -> f64 {
        self.realized_profit
    }
    /// quantity_sold * sell_price
    pub fn proceeds(&self) -> f64 {
        self.quantity_sold as f64 * self.sell_price
    }
    /// quantity_sold * average_cost_at_sale
    pub fn cost(&self) -> f64 {
        self.quantity_sold as f64 * self.average_cost_at_sale
    }
}

impl fmt::Display for RealizedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} quantity:{}, sell_price:{:.2}, avg_cost:{:.2}, gain_loss:{:.2}",
            self.date,
            self.symbol,
            self.quantity_sold,
            self.sell_price,
            self.average_cost_at_sale,
            self.realized_profit
        )
    }
}

/// A compact form of realized that folds every sale of one day together, across symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedCompact {
    pub date: NaiveDate,
    pub quantity: u64,
    pub proceeds: f64,
    pub cost: f64,
    pub profit: f64,
}

impl RealizedCompact {
    fn start(r: &RealizedEvent) -> Self {
        Self {
            date: r.date,
            quantity: r.quantity_sold,
            proceeds: r.proceeds(),
            cost: r.cost(),
            profit: r.realized_profit,
        }
    }

    fn absorb(&mut self, r: &RealizedEvent) {
        self.quantity += r.quantity_sold;
        self.proceeds += r.proceeds();
        self.cost += r.cost();
        self.profit += r.realized_profit;
    }
}

impl fmt::Display for RealizedCompact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "close_date: {} quantity:{}, proceeds:{:.2}, cost_basis:{:.2}, gain_loss:{:.2}",
            self.date, self.quantity, self.proceeds, self.cost, self.profit
        )
    }
}

/// Group consecutive events that share a date.  Assumes the slice is in date order, as the
/// aggregator emits it for ordered input.
pub fn realized_by_date(realized: &[RealizedEvent]) -> Vec<RealizedCompact> {
    let mut grouped: Vec<RealizedCompact> = Vec::new();
    for r in realized {
        match grouped.last_mut() {
            Some(day) if day.date == r.date => day.absorb(r),
            _ => grouped.push(RealizedCompact::start(r)),
        }
    }
    grouped
}

/// Realized profit / loss summed per symbol
pub fn realized_by_symbol(realized: &[RealizedEvent]) -> BTreeMap<String, f64> {
    let mut by_symbol: BTreeMap<String, f64> = BTreeMap::new();
    for r in realized {
        *by_symbol.entry(r.symbol.clone()).or_insert(0.0) += r.realized_profit;
    }
    by_symbol
}

/// Total realized is the sum of all profit / loss in the slice of `RealizedEvent`, in slice order
pub fn total_realized(r: &[RealizedEvent]) -> f64 {
    r.iter().map(|r| r.realized_profit).sum()
}

use crate::config::{AggregatorConfig, OversoldPolicy};
use crate::error::PortfolioError;
use crate::holding::Position;
use crate::inventory::{Trade, TradeType};
use crate::realized::{total_realized, RealizedEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use tracing::{debug, warn};

/// Data-quality conditions met while replaying a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WarningKind {
    /// The sale asked for more shares than the position held.
    OversoldPosition { tracked: i64, requested: u64 },
    /// The position was flat or short, so there was no average cost to sell against; the sale
    /// price was used and nothing was realized.
    ZeroQuantityDivision { tracked: i64 },
}

/// A `WarningKind` tied to the transaction and realized event it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// position of the transaction in the input slice
    pub index: usize,
    /// position of the resulting event in `Portfolio::realized`
    pub event: usize,
    pub symbol: String,
    pub date: NaiveDate,
    pub kind: WarningKind,
}

/// Everything derived from one replay of a transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: BTreeMap<String, Position>,
    realized: Vec<RealizedEvent>,
    total_realized: f64,
    warnings: Vec<Warning>,
}

impl Portfolio {
    /// Open positions (quantity > 0) keyed by symbol
    pub fn holdings(&self) -> &BTreeMap<String, Position> {
        &self.holdings
    }

    pub fn holding(&self, symbol: &str) -> Option<&Position> {
        self.holdings.get(symbol)
    }

    /// One event per sale, in input order
    pub fn realized(&self) -> &[RealizedEvent] {
        &self.realized
    }

    pub fn total_realized(&self) -> f64 {
        self.total_realized
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn warnings_for<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Warning> + 'a {
        self.warnings.iter().filter(move |w| w.symbol == symbol)
    }

    /// Numbers for a flagged symbol rest on at least one inconsistent sale and should not be shown
    /// as-is.
    pub fn is_flagged(&self, symbol: &str) -> bool {
        self.warnings_for(symbol).next().is_some()
    }
}

/// Replays transaction histories into a `Portfolio` using weighted-average cost.
///
/// Transactions are taken in slice order.  Nothing is sorted: a caller handing over an unsorted
/// history gets the accounting for that order, which can move realized profit between sales.
/// Each call starts from empty positions, so the result is a pure function of the slice.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Aggregator { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns `PortfolioError::Oversold` for the first sale larger than its tracked position when
    /// the configured policy is `OversoldPolicy::Reject`.  Other policies never fail.
    pub fn aggregate<T: Trade>(&self, trades: &[T]) -> Result<Portfolio, PortfolioError> {
        let policy = self.config.oversold;
        replay(trades, policy, |index, trade, tracked| match policy {
            OversoldPolicy::Reject => Err(PortfolioError::Oversold {
                index,
                symbol: trade.symbol().to_owned(),
                date: trade.date(),
                tracked,
                requested: trade.quantity(),
            }),
            OversoldPolicy::Permissive | OversoldPolicy::Clamp => Ok(()),
        })
    }
}

/// Replay with the default permissive policy, which cannot fail.
pub fn aggregate<T: Trade>(trades: &[T]) -> Portfolio {
    let result: Result<Portfolio, Infallible> =
        replay(trades, OversoldPolicy::Permissive, |_, _, _| Ok(()));
    match result {
        Ok(portfolio) => portfolio,
        Err(never) => match never {},
    }
}

fn replay<T, E, F>(trades: &[T], policy: OversoldPolicy, mut on_oversold: F) -> Result<Portfolio, E>
where
    T: Trade,
    F: FnMut(usize, &T, i64) -> Result<(), E>,
{
    debug!(transactions = trades.len(), %policy, "replaying transactions");

    let mut positions: BTreeMap<String, Position> = BTreeMap::new();
    let mut realized: Vec<RealizedEvent> = Vec::new();
    let mut warnings: Vec<Warning> = Vec::new();

    for (index, trade) in trades.iter().enumerate() {
        let position = positions
            .entry(trade.symbol().to_owned())
            .or_insert_with(|| Position::new(trade.symbol()));

        match trade.ttype() {
            TradeType::Buy => position.buy(trade.quantity(), trade.price()),
            TradeType::Sell => {
                let covered = position.covers(trade.quantity());
                let tracked = position.quantity();
                if !covered {
                    on_oversold(index, trade, tracked)?;
                }

                let sale = position.sell(trade.quantity(), trade.price(), policy);
                let event = realized.len();
                realized.push(RealizedEvent::new(
                    trade.symbol(),
                    trade.date(),
                    sale.quantity,
                    trade.price(),
                    sale.average_cost,
                ));

                if !covered {
                    warn!(
                        index,
                        symbol = trade.symbol(),
                        date = %trade.date(),
                        tracked,
                        requested = trade.quantity(),
                        "sale exceeds tracked position"
                    );
                    warnings.push(Warning {
                        index,
                        event,
                        symbol: trade.symbol().to_owned(),
                        date: trade.date(),
                        kind: WarningKind::OversoldPosition {
                            tracked,
                            requested: trade.quantity(),
                        },
                    });
                }
                if sale.is_zero_quantity() {
                    warn!(
                        index,
                        symbol = trade.symbol(),
                        date = %trade.date(),
                        tracked,
                        "no open quantity to take an average cost from"
                    );
                    warnings.push(Warning {
                        index,
                        event,
                        symbol: trade.symbol().to_owned(),
                        date: trade.date(),
                        kind: WarningKind::ZeroQuantityDivision { tracked },
                    });
                }
            }
        }
    }

    let holdings: BTreeMap<String, Position> = positions
        .into_iter()
        .filter(|(_, position)| position.is_open())
        .collect();
    let total_realized = total_realized(&realized);

    debug!(
        holdings = holdings.len(),
        realized = realized.len(),
        warnings = warnings.len(),
        total_realized,
        "replay complete"
    );

    Ok(Portfolio {
        holdings,
        realized,
        total_realized,
        warnings,
    })
}

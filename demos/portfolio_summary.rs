/// Example taking stock buys and sells to determine holdings, realized gains and unrealized gains
use portfolio_costbasis::aggregator::Aggregator;
use portfolio_costbasis::config::AggregatorConfig;
use portfolio_costbasis::ledger::{Ledger, TransactionFilter};
use portfolio_costbasis::realized::{realized_by_date, realized_by_symbol};
use portfolio_costbasis::transaction::Transaction;
use portfolio_costbasis::unrealized::{PortfolioValuation, StaticPrices};
use std::error::Error;
use std::fs::File;
use std::io;
use std::io::BufRead;

fn main() -> Result<(), Box<dyn Error>> {
    let f = File::open("./demos/TRANSACTIONS.csv")?;

    // load csv file in format: date, symbol, type, quantity, price
    let ledger = get_transactions(f)?;
    let summary = ledger.summary(&TransactionFilter::new());

    println!("TRANSACTIONS LOADED: {}", summary.count);
    println!(
        "BOUGHT: {:.2}  SOLD: {:.2}",
        summary.total_buy_value, summary.total_sell_value
    );

    let config = match std::env::args().nth(1) {
        Some(policy) => AggregatorConfig::new(policy.parse()?),
        None => AggregatorConfig::default(),
    };
    let portfolio = ledger.portfolio(&Aggregator::new(config))?;

    println!("HOLDINGS CALCULATED");
    println!("-------------------------------------------------------------");

    let prices: StaticPrices = [("INFY", 1690.0), ("TCS", 4010.5)].into_iter().collect();
    let valuation = PortfolioValuation::new(&portfolio, &prices);
    for holding in valuation.holdings.iter() {
        println!("{}", holding);
    }
    println!(
        "INVESTED: {:.2}  CURRENT VALUE: {:.2}  UNREALIZED: {:.2}",
        valuation.total_invested, valuation.total_current_value, valuation.total_unrealized
    );
    println!("-------------------------------------------------------------");

    println!("REALIZED RETURNS: {:.2}", portfolio.total_realized());
    for (symbol, profit) in realized_by_symbol(portfolio.realized()) {
        println!("{}: {:.2}", symbol, profit);
    }
    for r in realized_by_date(portfolio.realized()) {
        println!("{}", r);
    }
    println!("-------------------------------------------------------------");

    for warning in portfolio.warnings() {
        println!(
            "WARNING {} on {} (transaction {}): {:?}",
            warning.symbol, warning.date, warning.index, warning.kind
        );
    }

    Ok(())
}

fn get_transactions(f: File) -> Result<Ledger, Box<dyn Error>> {
    let mut ledger = Ledger::new();

    let lines = io::BufReader::new(f).lines();

    for l in lines.skip(1) {
        let line_data = l?;
        if line_data.trim().is_empty() {
            continue;
        }
        ledger.insert(line_data.parse::<Transaction>()?);
    }
    Ok(ledger)
}

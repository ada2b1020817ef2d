use portfolio_costbasis::aggregator::{aggregate, Aggregator, WarningKind};
use portfolio_costbasis::config::{AggregatorConfig, OversoldPolicy};
use portfolio_costbasis::realized::RealizedEvent;
use portfolio_costbasis::transaction::Transaction;
use portfolio_costbasis::Trade;

fn transactions(lines: &[&str]) -> Vec<Transaction> {
    lines.iter().map(|l| l.parse().unwrap()).collect()
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

#[test]
fn buy_only_builds_holding() {
    let transactions = transactions(&[
        "2020-01-01,INFY,buy,100,25.0",
        "2020-02-01,INFY,buy,100,35.0",
        "2020-03-01,INFY,buy,100,30.0",
    ]);
    let portfolio = aggregate(&transactions);
    assert!(portfolio.realized().is_empty());
    assert_eq!(portfolio.total_realized(), 0.0);

    let infy = portfolio.holding("INFY").unwrap();
    assert_eq!(infy.quantity(), 300);
    assert_eq!(infy.invested_capital(), 9000.0);
    assert_eq!(infy.average_cost(), 30.0);
}

#[test]
fn buy_sell_realized_and_holding_left() {
    let transactions = transactions(&["2020-01-01,INFY,buy,10,100", "2020-02-01,INFY,sell,4,150"]);
    let portfolio = aggregate(&transactions);

    let event = &portfolio.realized()[0];
    assert_eq!(event.quantity_sold(), 4);
    assert_eq!(event.sell_price(), 150.0);
    assert_eq!(event.average_cost_at_sale(), 100.0);
    assert_eq!(event.realized_profit(), 200.0);
    assert_eq!(event.date(), date("2020-02-01"));

    let infy = portfolio.holding("INFY").unwrap();
    assert_eq!(infy.quantity(), 6);
    assert_eq!(infy.invested_capital(), 600.0);
    assert_eq!(infy.average_cost(), 100.0);
    assert!(portfolio.warnings().is_empty());
}

#[test]
fn buy_sell_full_liquidation() {
    let transactions = transactions(&["2020-01-01,TCS,buy,5,20", "2020-02-01,TCS,sell,5,30"]);
    let portfolio = aggregate(&transactions);
    assert!(portfolio.holding("TCS").is_none());
    assert!(portfolio.holdings().is_empty());
    assert_eq!(portfolio.realized()[0].realized_profit(), 50.0);
    assert_eq!(portfolio.total_realized(), 50.0);
}

#[test]
fn sale_uses_blended_cost_of_all_buys() {
    let transactions = transactions(&[
        "2020-01-01,INFY,buy,100,25.0",
        "2020-02-01,INFY,buy,100,35.0",
        "2020-03-01,INFY,sell,150,40.0",
        "2020-04-01,INFY,buy,50,20.0",
        "2020-05-01,INFY,sell,50,30.0",
    ]);
    let portfolio = aggregate(&transactions);
    let results_r = [
        RealizedEvent::new("INFY", date("2020-03-01"), 150, 40.0, 30.0),
        RealizedEvent::new("INFY", date("2020-05-01"), 50, 30.0, 25.0),
    ];
    assert_eq!(portfolio.realized(), results_r);
    assert_eq!(portfolio.total_realized(), 1500.0 + 250.0);

    let infy = portfolio.holding("INFY").unwrap();
    assert_eq!(infy.quantity(), 50);
    assert_eq!(infy.invested_capital(), 1250.0);
    assert_eq!(infy.average_cost(), 25.0);
}

#[test]
fn losses_are_negative_realized() {
    let transactions = transactions(&["2020-01-01,WIPRO,buy,10,400", "2020-02-01,WIPRO,sell,10,350"]);
    let portfolio = aggregate(&transactions);
    assert_eq!(portfolio.total_realized(), -500.0);
}

#[test]
fn open_close_more_than_once() {
    let transactions = transactions(&[
        "2020-01-01,INFY,buy,100,25.0",
        "2020-04-01,INFY,sell,100,35.0",
        "2020-05-01,INFY,buy,100,30.0",
        "2020-06-01,INFY,sell,100,35.0",
    ]);
    let portfolio = aggregate(&transactions);
    assert!(portfolio.holdings().is_empty());
    assert_eq!(portfolio.realized().len(), 2);
    // second round starts from a fresh cost, not the first round's
    assert_eq!(portfolio.realized()[1].average_cost_at_sale(), 30.0);
    assert_eq!(portfolio.total_realized(), 1000.0 + 500.0);
}

#[test]
fn symbols_are_isolated() {
    let interleaved = transactions(&[
        "2020-01-01,AAA,buy,10,100",
        "2020-01-02,BBB,buy,5,10",
        "2020-01-03,AAA,sell,5,120",
        "2020-01-04,BBB,buy,5,20",
        "2020-01-05,BBB,sell,4,30",
        "2020-01-06,AAA,buy,5,80",
    ]);
    let portfolio = aggregate(&interleaved);

    let only_a: Vec<Transaction> = interleaved.iter().filter(|t| t.symbol() == "AAA").cloned().collect();
    let only_b: Vec<Transaction> = interleaved.iter().filter(|t| t.symbol() == "BBB").cloned().collect();
    let portfolio_a = aggregate(&only_a);
    let portfolio_b = aggregate(&only_b);

    assert_eq!(portfolio.holding("AAA"), portfolio_a.holding("AAA"));
    assert_eq!(portfolio.holding("BBB"), portfolio_b.holding("BBB"));

    let realized_a: Vec<&RealizedEvent> =
        portfolio.realized().iter().filter(|r| r.symbol() == "AAA").collect();
    let realized_b: Vec<&RealizedEvent> =
        portfolio.realized().iter().filter(|r| r.symbol() == "BBB").collect();
    assert_eq!(realized_a, portfolio_a.realized().iter().collect::<Vec<_>>());
    assert_eq!(realized_b, portfolio_b.realized().iter().collect::<Vec<_>>());
}

#[test]
fn oversold_sale_is_flagged_with_finite_cost() {
    let transactions = transactions(&["2020-01-01,TCS,buy,2,10", "2020-02-01,TCS,sell,5,12"]);
    let portfolio = aggregate(&transactions);

    let event = &portfolio.realized()[0];
    assert!(event.average_cost_at_sale().is_finite());
    assert!(event.realized_profit().is_finite());
    assert_eq!(event.average_cost_at_sale(), 10.0);

    assert_eq!(portfolio.warnings().len(), 1);
    let warning = &portfolio.warnings()[0];
    assert_eq!(warning.symbol, "TCS");
    assert_eq!(warning.event, 0);
    assert_eq!(
        warning.kind,
        WarningKind::OversoldPosition {
            tracked: 2,
            requested: 5
        }
    );
    // negative position is not a holding
    assert!(portfolio.holding("TCS").is_none());
}

#[test]
fn sale_after_oversold_does_not_divide_by_zero() {
    let transactions = transactions(&[
        "2020-01-01,TCS,buy,2,10",
        "2020-02-01,TCS,sell,5,12",
        "2020-03-01,TCS,sell,1,14",
    ]);
    let portfolio = aggregate(&transactions);
    let last = &portfolio.realized()[1];
    assert_eq!(last.average_cost_at_sale(), 14.0);
    assert_eq!(last.realized_profit(), 0.0);
    assert!(portfolio
        .warnings_for("TCS")
        .any(|w| w.kind == WarningKind::ZeroQuantityDivision { tracked: -3 }));
}

#[test]
fn reject_policy_stops_on_oversold() {
    let transactions = transactions(&["2020-01-01,TCS,buy,2,10", "2020-02-01,TCS,sell,5,12"]);
    let aggregator = Aggregator::new(AggregatorConfig::new(OversoldPolicy::Reject));
    let err = aggregator.aggregate(&transactions).unwrap_err();
    assert!(err.to_string().contains("sells 5 TCS"));
}

#[test]
fn aggregation_is_deterministic() {
    let transactions = transactions(&[
        "2020-01-01,INFY,buy,3,10.1",
        "2020-01-02,INFY,buy,7,10.3",
        "2020-01-03,INFY,sell,4,11.7",
        "2020-01-04,TCS,buy,9,3.3",
        "2020-01-05,TCS,sell,2,2.9",
    ]);
    let first = aggregate(&transactions);
    let second = aggregate(&transactions);
    assert_eq!(first, second);
    assert_eq!(first.total_realized().to_bits(), second.total_realized().to_bits());
}

// No lot matching and no sorting: the order the history is handed over decides which average
// cost a sale is measured against.  A different realized figure for a reordered history is the
// documented behaviour.
#[test]
fn input_order_changes_realized_profit() {
    let chronological = transactions(&[
        "2020-01-01,INFY,buy,10,100",
        "2020-02-01,INFY,sell,5,150",
        "2020-03-01,INFY,buy,10,200",
    ]);
    let reordered = vec![
        chronological[0].clone(),
        chronological[2].clone(),
        chronological[1].clone(),
    ];

    let in_order = aggregate(&chronological);
    let out_of_order = aggregate(&reordered);

    assert_eq!(in_order.total_realized(), 250.0);
    // both buys blend to 150 before the sale
    assert_eq!(out_of_order.total_realized(), 0.0);
    assert_ne!(in_order.total_realized(), out_of_order.total_realized());
}

use chrono::{Days, NaiveDate};
use portfolio_costbasis::aggregator::aggregate;
use portfolio_costbasis::inventory::TradeType;
use portfolio_costbasis::transaction::Transaction;
use proptest::prelude::*;

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset as u64)
}

fn build(symbol: &str, legs: &[(bool, u64, u32)]) -> Vec<Transaction> {
    legs.iter()
        .enumerate()
        .map(|(i, &(buy, quantity, cents))| {
            let ttype = if buy { TradeType::Buy } else { TradeType::Sell };
            Transaction::new(symbol, ttype, quantity, cents as f64 / 100.0, day(i)).unwrap()
        })
        .collect()
}

fn leg() -> impl Strategy<Value = (bool, u64, u32)> {
    (any::<bool>(), 1u64..500, 1u32..1_000_000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_same_input_same_output(legs in proptest::collection::vec(leg(), 0..40)) {
        let trades = build("INFY", &legs);
        let first = aggregate(&trades);
        let second = aggregate(&trades);
        prop_assert_eq!(first.total_realized().to_bits(), second.total_realized().to_bits());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_buy_only_conserves_quantity_and_capital(
        buys in proptest::collection::vec((1u64..500, 1u32..1_000_000), 1..30)
    ) {
        let legs: Vec<(bool, u64, u32)> = buys.iter().map(|&(q, c)| (true, q, c)).collect();
        let trades = build("TCS", &legs);
        let portfolio = aggregate(&trades);
        let tcs = portfolio.holding("TCS").unwrap();

        let quantity: u64 = buys.iter().map(|&(q, _)| q).sum();
        let mut capital = 0.0;
        for &(q, c) in &buys {
            capital += q as f64 * (c as f64 / 100.0);
        }
        prop_assert_eq!(tcs.quantity(), quantity as i64);
        prop_assert_eq!(tcs.invested_capital(), capital);

        let identity = tcs.invested_capital() / tcs.quantity() as f64;
        prop_assert!((tcs.average_cost() - identity).abs() <= 1e-9 * identity.abs());
        prop_assert!(portfolio.realized().is_empty());
    }

    #[test]
    fn prop_one_event_per_sale_and_no_degenerate_numbers(
        legs in proptest::collection::vec(leg(), 0..40)
    ) {
        let trades = build("WIPRO", &legs);
        let portfolio = aggregate(&trades);
        let sales = legs.iter().filter(|&&(buy, _, _)| !buy).count();
        prop_assert_eq!(portfolio.realized().len(), sales);

        for event in portfolio.realized() {
            prop_assert!(event.average_cost_at_sale().is_finite());
            prop_assert!(event.realized_profit().is_finite());
        }
        prop_assert!(portfolio.total_realized().is_finite());

        for position in portfolio.holdings().values() {
            prop_assert!(position.quantity() > 0);
            let expected = position.invested_capital() / position.quantity() as f64;
            prop_assert!((position.average_cost() - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn prop_symbols_do_not_interact(
        a in proptest::collection::vec(leg(), 0..20),
        b in proptest::collection::vec(leg(), 0..20),
    ) {
        let trades_a = build("AAA", &a);
        let trades_b = build("BBB", &b);
        let mut merged: Vec<Transaction> = trades_a.iter().chain(trades_b.iter()).cloned().collect();
        merged.sort_by_key(|t| portfolio_costbasis::Trade::date(t));

        let together = aggregate(&merged);
        let alone_a = aggregate(&trades_a);
        let alone_b = aggregate(&trades_b);

        prop_assert_eq!(together.holding("AAA"), alone_a.holding("AAA"));
        prop_assert_eq!(together.holding("BBB"), alone_b.holding("BBB"));
        prop_assert_eq!(
            together.warnings_for("AAA").count(),
            alone_a.warnings().len()
        );
    }
}

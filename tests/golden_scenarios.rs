//! Cenários de referência da curva (valores exatos ou com tolerância de 1e-9).
use launch_curve_core::amm::ref_golden::{golden_trade, tolerance};
use launch_curve_core::{Amount, BondingCurve, BondingCurveConfig, TradeSide, VirtualPool};

fn a(s: &str) -> Amount {
    s.parse().expect("amount")
}

fn pool(x: &str, y: &str, s: &str) -> VirtualPool {
    VirtualPool::new(&a(x), &a(y), &a(s))
}

fn assert_close(name: &str, got: &Amount, want: &str, tol: &str) {
    let delta = (got.clone() - a(want)).abs();
    assert!(delta <= a(tol), "{name}: got={got} want≈{want} (tol={tol})");
}

#[test]
fn scenario_buy_default_fee() {
    let curve = BondingCurve::with_defaults();
    let r = curve.buy(&pool("1000", "800000", "200000"), a("100")).expect("buy ok");
    assert_eq!(r.amount_out, a("72000"));
    assert_eq!(r.new_cnpy_reserve, a("1100"));
    assert_close("price", &r.price, "0.0013888888889", "0.0000000000001");
    assert_close("impact", &r.price_impact_percent, "11.1111111", "0.0000001");
}

#[test]
fn scenario_buy_two_percent_fee() {
    let cfg = BondingCurveConfig::new(200, a("0.01")).expect("cfg");
    assert_eq!(cfg.calculate_fee(&a("50")), a("1"));
    assert_eq!(cfg.apply_fee(&a("50")), a("49"));

    let curve = BondingCurve::new(cfg);
    let p = pool("1050", "800000", "200000");
    let r = curve.buy(&p, a("50")).expect("buy ok");
    assert_close("amount_out", &r.amount_out, "35636.36364", "0.00001");
    assert_close("price", &r.price, "0.0014030612245", "0.0000000000001");
    // a reserva recebe o input inteiro
    assert_eq!(r.new_cnpy_reserve, a("1100"));
}

#[test]
fn scenario_sell_default_fee() {
    let curve = BondingCurve::with_defaults();
    let r = curve.sell(&pool("1200", "750000", "250000"), a("5000")).expect("sell ok");
    assert_close("amount_out", &r.amount_out, "7.867549669", "0.000000001");
    assert_eq!(r.new_total_supply, a("245000"));
}

#[test]
fn scenario_bootstrap_buy() {
    let curve = BondingCurve::new(BondingCurveConfig::new(100, a("0.05")).expect("cfg"));
    let r = curve.buy(&VirtualPool::bootstrap(), a("100")).expect("buy ok");
    assert_eq!(r.amount_out, a("1980"));
    assert_eq!(r.new_cnpy_reserve, a("100"));
    assert_eq!(r.new_total_supply, a("1980"));
}

#[test]
fn scenario_optimal_size_is_tight() {
    let curve = BondingCurve::with_defaults();
    let p = pool("1000", "800000", "200000");
    let max = a("10");
    let size = curve.get_optimal_trade_size(&p, &max, TradeSide::Buy);
    assert!(size.is_positive());

    let at = curve.simulate_buy(&p, &size).expect("sim ok");
    assert!(at.price_impact_percent <= max);

    let step = p.cnpy_reserve().clone() * Amount::from_ratio(1, 1000).expect("ratio");
    let next = curve.simulate_buy(&p, size + step).expect("sim ok");
    assert!(next.price_impact_percent > max);
}

#[test]
fn core_matches_closed_form() {
    let curve = BondingCurve::with_defaults();
    let cases = [
        (pool("1000", "800000", "200000"), "100", TradeSide::Buy),
        (pool("1000", "800000", "200000"), "0.000001", TradeSide::Buy),
        (pool("1200", "750000", "250000"), "5000", TradeSide::Sell),
        (pool("1200", "750000", "250000"), "250000", TradeSide::Sell),
        (VirtualPool::bootstrap(), "3.3", TradeSide::Buy),
    ];
    for (p, amount, side) in cases {
        let g = golden_trade(&curve, &p, &a(amount), side).expect("golden ok");
        assert!(g.rel_error <= tolerance(30), "{side} {amount}: rel={}", g.rel_error);
    }
}

use std::time::Duration;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use launch_curve_core::{Amount, BondingCurve, BondingCurveConfig, TradeSide, VirtualPool};

fn a(s: &str) -> Amount {
    s.parse().expect("amount")
}

fn bench_trade(c: &mut Criterion) {
    let mut g = c.benchmark_group("trade");
    g.warm_up_time(Duration::from_secs(2));
    g.measurement_time(Duration::from_secs(5));
    g.sample_size(200);
    g.throughput(Throughput::Elements(1));

    // rótulo único + taxa
    let cases: [(&str, VirtualPool, Amount, TradeSide, u32); 6] = [
        ("buy_small", VirtualPool::new(&a("1000"), &a("800000"), &a("200000")), a("100"), TradeSide::Buy, 100),
        ("buy_large", VirtualPool::new(&a("5000000000"), &a("5000000000"), &a("5000000000")), a("1000000"), TradeSide::Buy, 100),
        ("buy_frac", VirtualPool::new(&a("1000.123456"), &a("800000.5"), &a("200000")), a("7/3"), TradeSide::Buy, 30),
        ("buy_bootstrap", VirtualPool::bootstrap(), a("100"), TradeSide::Buy, 100),
        ("sell_small", VirtualPool::new(&a("1200"), &a("750000"), &a("250000")), a("5000"), TradeSide::Sell, 100),
        ("sell_all", VirtualPool::new(&a("1200"), &a("750000"), &a("250000")), a("250000"), TradeSide::Sell, 0),
    ];

    for (label, pool, amount, side, fee) in cases {
        let curve = BondingCurve::new(BondingCurveConfig::new(fee, a("0.01")).expect("cfg"));
        let name = format!("{}_f{}", label, fee);
        g.bench_function(name, |b| {
            b.iter(|| {
                let r = curve.trade(black_box(&pool), black_box(&amount), side).expect("trade ok");
                black_box(r);
            });
        });
    }
    g.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut g = c.benchmark_group("trade_chain");
    g.sample_size(50);
    let curve = BondingCurve::with_defaults();
    let start = VirtualPool::new(&a("5"), &a("40000"), &a("10000"));
    let step = Amount::from_ratio(7, 3).expect("ratio");
    // o denominador racional cresce a cada passo aplicado
    for n in [10usize, 50, 100] {
        g.bench_function(format!("buy_x{n}"), |b| {
            b.iter(|| {
                let mut pool = start.clone();
                for _ in 0..n {
                    let r = curve.buy(&pool, &step).expect("buy ok");
                    pool = pool.apply(&r);
                }
                black_box(pool);
            });
        });
    }
    g.finish();
}

criterion_group!(benches, bench_trade, bench_chain);
criterion_main!(benches);

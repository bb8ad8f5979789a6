//! Reexecuta um script JSON de trades sobre um pool e imprime o pool final.
//!
//! ```text
//! curve_replay script.json
//! {
//!   "config": { "fee_rate_basis_points": 100, "initial_price": "0.01" },
//!   "pool":   { "cnpy_reserve": "1000", "token_reserve": "800000", "total_supply": "200000" },
//!   "trades": [ { "side": "buy", "amount": "100" }, { "side": "sell", "amount": "500" } ]
//! }
//! ```
//! Trades que falham são registrados em `warn!` e pulados.
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use launch_curve_core::amm::errors::disposition;
use launch_curve_core::telemetry::make_trade_span;
use launch_curve_core::{Amount, BondingCurve, BondingCurveConfig, PoolSnapshot, TradeSide, VirtualPool};

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: Option<BondingCurveConfig>,
    pool: PoolSnapshot,
    #[serde(default)]
    trades: Vec<ScriptTrade>,
}

#[derive(Debug, Deserialize)]
struct ScriptTrade {
    side: TradeSide,
    #[serde(default)]
    amount: Option<Amount>,
}

fn main() -> Result<()> {
    #[cfg(feature = "otel")]
    let tel = launch_curve_core::telemetry::init("curve-replay")?;
    #[cfg(not(feature = "otel"))]
    launch_curve_core::telemetry::init_tracing()?;

    let Some(path) = std::env::args().nth(1) else {
        bail!("uso: curve_replay <script.json>");
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("lendo {path}"))?;
    let script: Script = serde_json::from_str(&raw).with_context(|| format!("parse de {path}"))?;

    let config = match script.config {
        Some(cfg) => cfg,
        None => BondingCurveConfig::from_env()?,
    };
    let curve = BondingCurve::new(config);
    let mut pool = VirtualPool::from_snapshot(&script.pool)?;

    let (mut applied, mut skipped) = (0usize, 0usize);
    for (op_id, trade) in script.trades.into_iter().enumerate() {
        let span = make_trade_span(trade.side, op_id as u64);
        let _guard = span.enter();

        let t0 = Instant::now();
        match curve.trade(&pool, trade.amount, trade.side) {
            Ok(result) => {
                #[cfg(feature = "otel")]
                tel.record_trade(trade.side, &result, t0.elapsed());
                info!(
                    op_id,
                    side = %trade.side,
                    amount_out = %result.amount_out,
                    price = %result.price,
                    elapsed_us = t0.elapsed().as_micros() as u64,
                    "trade applied"
                );
                pool = pool.apply(&result);
                applied += 1;
            }
            Err(err) => {
                warn!(
                    op_id,
                    side = %trade.side,
                    disposition = ?disposition(err.code),
                    error = %err.to_log_json(),
                    "trade skipped"
                );
                skipped += 1;
            }
        }
    }

    info!(applied, skipped, price = %pool.current_price(), "replay finished");
    println!("{}", serde_json::to_string_pretty(&pool)?);

    #[cfg(feature = "otel")]
    tel.shutdown();
    Ok(())
}

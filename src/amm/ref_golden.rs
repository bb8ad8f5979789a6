//! Referência independente ("goldens") em **BigRational** para a curva de
//! reservas virtuais com taxa sobre a **saída**.
//!
//! Objetivos desta referência:
//! 1. Fórmula fechada de `amount_out` para compra/venda, escrita direto sobre
//!    `BigRational`, sem passar por `Amount`/`BondingCurve`, como oráculo do core.
//! 2. Medir o **drift** de uma sequência encadeada de trades quando o estado é
//!    quantizado a cada passo (como acontece ao persistir strings decimais)
//!    versus o estado exato.
//!
//! Esta referência não entra no caminho de produção — serve para testes,
//! benches e para o `curve_replay`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::curve::{BondingCurve, TradeResult};
use super::decimal::Amount;
use super::error_catalog::CurveErrorCode;
use super::errors::Result;
use super::pool::VirtualPool;
use super::types::{TradeSide, BPS_DIVISOR};
use crate::curve_err;

#[inline]
fn q_int(v: u32) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}

#[inline]
fn keep_rate(fee_bps: u32) -> BigRational {
    (q_int(BPS_DIVISOR) - q_int(fee_bps)) / q_int(BPS_DIVISOR)
}

fn ref_div(n: BigRational, d: BigRational, what: &str) -> Result<BigRational> {
    if d.is_zero() {
        return Err(curve_err!(CurveErrorCode::InsufficientReserve, { "zero_denominator" => what }));
    }
    Ok(n / d)
}

// -------------------------
// Fórmula fechada
// -------------------------
/// amountOut da compra: `a·y·(1−f) / (x+a)`; bootstrap: `a·(1−f) / p0`.
pub fn closed_form_buy_out(
    pool: &VirtualPool,
    amount_in: &Amount,
    fee_bps: u32,
    initial_price: &Amount,
) -> Result<BigRational> {
    let a = amount_in.as_rational().clone();
    if !a.is_positive() {
        return Err(curve_err!(CurveErrorCode::ZeroAmount, amount_in => amount_in));
    }
    let x = pool.cnpy_reserve().as_rational().clone();
    let y = pool.token_reserve().as_rational().clone();
    if x.is_zero() && y.is_zero() {
        let p0 = initial_price.as_rational().clone();
        return ref_div(a * keep_rate(fee_bps), p0, "initial_price");
    }
    ref_div(&a * y * keep_rate(fee_bps), x + a, "x + a")
}

/// amountOut da venda (CNPY pago): `t·x·(1−f) / (y+t)`.
pub fn closed_form_sell_out(pool: &VirtualPool, token_amount_in: &Amount, fee_bps: u32) -> Result<BigRational> {
    let t = token_amount_in.as_rational().clone();
    if !t.is_positive() {
        return Err(curve_err!(CurveErrorCode::ZeroAmount, token_amount_in => token_amount_in));
    }
    let x = pool.cnpy_reserve().as_rational().clone();
    let y = pool.token_reserve().as_rational().clone();
    ref_div(&t * x * keep_rate(fee_bps), y + t, "y + t")
}

// -------------------------
// Estruturas de comparação (goldens)
// -------------------------
#[derive(Debug, Clone)]
pub struct RefTrade {
    pub out_core: Amount,
    pub out_ref: BigRational,
    /// `|out_core − out_ref| / out_ref` (0 quando `out_ref == 0`).
    pub rel_error: BigRational,
}

/// Compara o **core** com a fórmula fechada.
pub fn golden_trade(
    curve: &BondingCurve,
    pool: &VirtualPool,
    amount_in: &Amount,
    side: TradeSide,
) -> Result<RefTrade> {
    let out_core = curve.get_amount_out(pool, amount_in, side)?;
    let cfg = curve.config();
    let out_ref = match side {
        TradeSide::Buy => closed_form_buy_out(pool, amount_in, cfg.fee_rate_basis_points(), cfg.initial_price())?,
        TradeSide::Sell => closed_form_sell_out(pool, amount_in, cfg.fee_rate_basis_points())?,
    };
    let rel_error = relative_error(out_core.as_rational(), &out_ref);
    Ok(RefTrade { out_core, out_ref, rel_error })
}

fn relative_error(value: &BigRational, reference: &BigRational) -> BigRational {
    if reference.is_zero() {
        return BigRational::zero();
    }
    ((value - reference) / reference).abs()
}

// -------------------------
// Drift em cadeia
// -------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub side: TradeSide,
    pub amount: Amount,
}

impl ChainStep {
    pub fn buy(amount: Amount) -> Self {
        Self { side: TradeSide::Buy, amount }
    }

    pub fn sell(amount: Amount) -> Self {
        Self { side: TradeSide::Sell, amount }
    }
}

#[derive(Debug, Clone)]
pub struct ChainReport {
    pub exact: VirtualPool,
    pub quantized: VirtualPool,
    pub applied: usize,
    pub skipped: usize,
    /// Maior `|Δ|/exato` observado nas reservas ao longo da cadeia.
    pub max_rel_drift: BigRational,
}

fn quantize(result: &TradeResult, scale: u32) -> VirtualPool {
    VirtualPool::new(
        &result.new_cnpy_reserve.round_to_scale(scale),
        &result.new_token_reserve.round_to_scale(scale),
        &result.new_total_supply.round_to_scale(scale),
    )
}

fn pool_drift(exact: &VirtualPool, quantized: &VirtualPool) -> BigRational {
    let cnpy = relative_error(quantized.cnpy_reserve().as_rational(), exact.cnpy_reserve().as_rational());
    let token = relative_error(quantized.token_reserve().as_rational(), exact.token_reserve().as_rational());
    if cnpy > token { cnpy } else { token }
}

/// Aplica `steps` duas vezes: exato e quantizado em `scale` casas a cada passo.
/// Passos que falham no exato são pulados nas duas cadeias; se só a cadeia
/// quantizada falhar, o erro é devolvido (divergência de estado).
pub fn replay_chain(
    curve: &BondingCurve,
    start: &VirtualPool,
    steps: &[ChainStep],
    scale: u32,
) -> Result<ChainReport> {
    let mut exact = start.copy();
    let mut quantized = start.copy();
    let mut report = ChainReport {
        exact: start.copy(),
        quantized: start.copy(),
        applied: 0,
        skipped: 0,
        max_rel_drift: BigRational::zero(),
    };

    for step in steps {
        let exact_result = match curve.trade(&exact, &step.amount, step.side) {
            Ok(r) => r,
            Err(_) => {
                report.skipped += 1;
                continue;
            }
        };
        let quantized_result = curve.trade(&quantized, &step.amount, step.side)?;
        exact = VirtualPool::from(&exact_result);
        quantized = quantize(&quantized_result, scale);
        let drift = pool_drift(&exact, &quantized);
        if drift > report.max_rel_drift {
            report.max_rel_drift = drift;
        }
        report.applied += 1;
    }

    report.exact = exact;
    report.quantized = quantized;
    Ok(report)
}

/// `1 / 10^digits`, útil como tolerância nos testes.
pub fn tolerance(digits: u32) -> BigRational {
    BigRational::new(BigInt::one(), num_traits::pow(BigInt::from(10u8), digits as usize))
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::config::BondingCurveConfig;

    fn a(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn pool(x: &str, y: &str, s: &str) -> VirtualPool {
        VirtualPool::new(&a(x), &a(y), &a(s))
    }

    #[test]
    fn t_closed_form_matches_core_buy() {
        let curve = BondingCurve::with_defaults();
        let g = golden_trade(&curve, &pool("1000", "800000", "200000"), &a("100"), TradeSide::Buy).unwrap();
        assert_eq!(g.out_core.as_rational(), &g.out_ref);
        assert!(g.rel_error.is_zero());
    }

    #[test]
    fn t_closed_form_matches_core_sell() {
        let curve = BondingCurve::with_defaults();
        let g = golden_trade(&curve, &pool("1200", "750000", "250000"), &a("5000"), TradeSide::Sell).unwrap();
        assert_eq!(g.out_core.as_rational(), &g.out_ref);
    }

    #[test]
    fn t_closed_form_bootstrap() {
        let curve = BondingCurve::new(BondingCurveConfig::new(100, a("0.05")).unwrap());
        let g = golden_trade(&curve, &VirtualPool::bootstrap(), &a("100"), TradeSide::Buy).unwrap();
        assert_eq!(g.out_ref, BigRational::from_integer(BigInt::from(1980)));
        assert_eq!(g.out_core, a("1980"));
    }

    #[test]
    fn t_closed_form_rejects_zero() {
        let p = pool("1000", "800000", "200000");
        assert_eq!(
            closed_form_sell_out(&p, &a("0"), 100).unwrap_err().code,
            CurveErrorCode::ZeroAmount
        );
    }

    fn mixed_steps(n: usize) -> Vec<ChainStep> {
        (0..n)
            .map(|i| {
                if i % 3 == 2 {
                    ChainStep::sell(a("1234.5"))
                } else {
                    ChainStep::buy(Amount::from_ratio(7 + i as i64, 3).unwrap())
                }
            })
            .collect()
    }

    #[test]
    fn t_chain_drift_tiny_at_serial_scale() {
        let curve = BondingCurve::with_defaults();
        let steps = mixed_steps(60);
        let report = replay_chain(&curve, &pool("5", "40000", "10000"), &steps, 40).unwrap();
        assert_eq!(report.applied + report.skipped, steps.len());
        assert!(report.applied > 0);
        assert!(report.max_rel_drift < tolerance(30), "drift={}", report.max_rel_drift);
    }

    #[test]
    fn t_chain_drift_grows_with_coarse_scale() {
        let curve = BondingCurve::with_defaults();
        let steps = mixed_steps(30);
        let start = pool("5", "40000", "10000");
        let fine = replay_chain(&curve, &start, &steps, 40).unwrap();
        let coarse = replay_chain(&curve, &start, &steps, 2).unwrap();
        assert!(coarse.max_rel_drift > fine.max_rel_drift);
    }

    #[test]
    fn t_chain_skips_failures() {
        let curve = BondingCurve::with_defaults();
        let steps = vec![ChainStep::sell(a("999999")), ChainStep::buy(a("10"))];
        let report = replay_chain(&curve, &pool("1000", "800000", "200000"), &steps, 40).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.applied, 1);
    }
}

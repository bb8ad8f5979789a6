//! Utilitários para UI/roteadores: cotação, slippage, preço pós-trade e tamanho ótimo.
//! Todos rodam sobre simulações de `curve.rs`; o pool do chamador nunca muda.

use tracing::{debug, trace};

use super::curve::BondingCurve;
use super::decimal::Amount;
use super::errors::Result;
use super::guardrails::checked_div;
use super::pool::VirtualPool;
use super::types::{TradeSide, BPS_DIVISOR};

/// Limite de passos da busca linear (100× o bound a 0.1% por passo).
pub const OPTIMAL_SEARCH_MAX_STEPS: u32 = 100_000;

impl BondingCurve {
    /// Só o `amount_out` de uma operação simulada.
    pub fn get_amount_out(
        &self,
        pool: &VirtualPool,
        amount_in: &Amount,
        side: TradeSide,
    ) -> Result<Amount> {
        Ok(self.simulate(pool, amount_in, side)?.amount_out)
    }

    /// `(expected − actual) / expected × 100`; exatamente 0 quando `expected == 0`.
    pub fn calculate_slippage(
        &self,
        pool: &VirtualPool,
        amount_in: &Amount,
        expected_out: &Amount,
        side: TradeSide,
    ) -> Result<Amount> {
        if expected_out.is_zero() {
            return Ok(Amount::zero());
        }
        let actual = self.get_amount_out(pool, amount_in, side)?;
        let shortfall = expected_out.clone() - actual;
        Ok(checked_div(&shortfall, expected_out, "expected_out")? * Amount::from_integer(100))
    }

    /// Preço à vista do pool que resultaria da operação.
    pub fn estimate_price_after_trade(
        &self,
        pool: &VirtualPool,
        amount_in: &Amount,
        side: TradeSide,
    ) -> Result<Amount> {
        let result = self.simulate(pool, amount_in, side)?;
        Ok(VirtualPool::from(&result).current_price())
    }

    /// **min_out** aceito pela UI: `out × (10000 − tol) / 10000`, com `tol` limitado a 10000.
    pub fn min_out_with_tolerance(
        &self,
        pool: &VirtualPool,
        amount_in: &Amount,
        side: TradeSide,
        slippage_tolerance_bps: u32,
    ) -> Result<Amount> {
        let out = self.get_amount_out(pool, amount_in, side)?;
        let tol = slippage_tolerance_bps.min(BPS_DIVISOR);
        let keep = Amount::from_integer(i64::from(BPS_DIVISOR - tol));
        let divisor = Amount::from_integer(i64::from(BPS_DIVISOR));
        checked_div(&(out * keep), &divisor, "bps_divisor")
    }

    /// Maior tamanho cujo `price_impact_percent` simulado fica ≤ `max_slippage_percent`.
    ///
    /// Busca linear: começa em 1% do bound (`cnpy_reserve` na compra, `total_supply` na
    /// venda) e avança 0.1% do bound por passo. Para no primeiro tamanho que excede o
    /// limite ou que falha na simulação e devolve o último tamanho aprovado (0 se nenhum).
    /// Depois de `OPTIMAL_SEARCH_MAX_STEPS` aprovações a busca para e devolve
    /// `start + (OPTIMAL_SEARCH_MAX_STEPS − 1) × step`, mesmo que o próximo passo ainda caiba.
    pub fn get_optimal_trade_size(
        &self,
        pool: &VirtualPool,
        max_slippage_percent: &Amount,
        side: TradeSide,
    ) -> Amount {
        self.optimal_trade_size_capped(pool, max_slippage_percent, side, OPTIMAL_SEARCH_MAX_STEPS)
    }

    fn optimal_trade_size_capped(
        &self,
        pool: &VirtualPool,
        max_slippage_percent: &Amount,
        side: TradeSide,
        max_steps: u32,
    ) -> Amount {
        let bound = match side {
            TradeSide::Buy => pool.cnpy_reserve(),
            TradeSide::Sell => pool.total_supply(),
        };
        let start = bound.clone() * Amount::from_ratio(1, 100).unwrap_or_default();
        let step = bound.clone() * Amount::from_ratio(1, 1000).unwrap_or_default();

        let mut best = Amount::zero();
        let mut candidate = start;
        let mut steps = 0u32;
        while steps < max_steps {
            match self.simulate(pool, &candidate, side) {
                Ok(result) if &result.price_impact_percent <= max_slippage_percent => {
                    trace!(
                        target: "launch_curve::pricing",
                        size = %candidate,
                        price_impact_percent = %result.price_impact_percent,
                        "size accepted"
                    );
                    best = candidate.clone();
                    candidate = candidate + &step;
                }
                _ => break,
            }
            steps += 1;
        }
        debug!(
            target: "launch_curve::pricing",
            side = %side,
            max_slippage_percent = %max_slippage_percent,
            steps,
            capped = steps == max_steps,
            optimal = %best,
            "optimal trade size"
        );
        best
    }
}

//! Motor da curva de reservas virtuais: compra/venda puras + simulação.
//! - buy: CNPY entra, taxa sai dos tokens entregues
//! - sell: tokens entram, taxa sai do CNPY pago; o CNPY **antes** da taxa deixa a reserva
//! - nenhuma operação muta o pool recebido; o chamador aplica o `TradeResult`

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::BondingCurveConfig;
use super::decimal::Amount;
use super::error_catalog::CurveErrorCode;
use super::errors::Result;
use super::guardrails::{checked_div, ensure_non_negative, ensure_positive, ensure_within_supply};
use super::pool::VirtualPool;
use super::types::{TradeAmount, TradeSide};
use crate::curve_bail;

/// Resultado imutável de uma operação.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResult {
    pub amount_out: Amount,
    pub new_cnpy_reserve: Amount,
    pub new_token_reserve: Amount,
    pub new_total_supply: Amount,
    /// Preço efetivo da operação (CNPY por token).
    pub price: Amount,
    pub price_impact_percent: Amount,
}

/// Motor sem estado; a configuração é compartilhada entre clones.
#[derive(Clone, Debug, Default)]
pub struct BondingCurve {
    config: Arc<BondingCurveConfig>,
}

/// `|effective − before| / before × 100`
fn price_impact(effective: &Amount, before: &Amount) -> Result<Amount> {
    let delta = (effective.clone() - before).abs();
    Ok(checked_div(&delta, before, "price_before")? * Amount::from_integer(100))
}

impl BondingCurve {
    pub fn new(config: BondingCurveConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_shared(config: Arc<BondingCurveConfig>) -> Self {
        Self { config }
    }

    /// Motor com a configuração padrão (100 bps, preço inicial 0.01).
    pub fn with_defaults() -> Self {
        Self::new(BondingCurveConfig::default())
    }

    pub fn config(&self) -> &BondingCurveConfig {
        &self.config
    }

    /// Compra: `amount_in` CNPY → tokens.
    ///
    /// ```text
    /// tokens_before_fee = amount_in × y / (x + amount_in)     (bootstrap: amount_in / initial_price)
    /// tokens_out        = apply_fee(tokens_before_fee)
    /// ```
    pub fn buy(&self, pool: &VirtualPool, amount_in: impl Into<TradeAmount>) -> Result<TradeResult> {
        pool.validate()?;
        let amount_in: TradeAmount = amount_in.into();
        let amount_in = ensure_positive(&amount_in, "amount_in")?;

        let x = pool.cnpy_reserve();
        let y = pool.token_reserve();
        let bootstrap = pool.is_bootstrap();

        let (tokens_before_fee, price_before) = if bootstrap {
            let initial_price = self.config.initial_price();
            (
                checked_div(amount_in, initial_price, "initial_price")?,
                initial_price.clone(),
            )
        } else {
            let denom = x.clone() + amount_in;
            if denom.is_zero() {
                curve_bail!(CurveErrorCode::InsufficientReserve, cnpy_reserve => x, amount_in => amount_in);
            }
            let numer = amount_in.clone() * y;
            (
                checked_div(&numer, &denom, "cnpy_reserve + amount_in")?,
                pool.current_price(),
            )
        };

        let tokens_out = self.config.apply_fee(&tokens_before_fee);
        let price = checked_div(amount_in, &tokens_out, "tokens_out")?;
        let price_impact_percent = price_impact(&price, &price_before)?;

        let result = TradeResult {
            new_cnpy_reserve: x.clone() + amount_in,
            new_token_reserve: y.clone() - &tokens_out,
            new_total_supply: pool.total_supply().clone() + &tokens_out,
            amount_out: tokens_out,
            price,
            price_impact_percent,
        };
        debug!(
            target: "launch_curve::curve",
            side = "buy",
            bootstrap,
            amount_in = %amount_in,
            amount_out = %result.amount_out,
            price_impact_percent = %result.price_impact_percent,
            "trade computed"
        );
        Ok(result)
    }

    /// Venda: `token_amount_in` tokens → CNPY.
    ///
    /// ```text
    /// cnpy_out           = token_amount_in × x / (y + token_amount_in)
    /// cnpy_out_after_fee = apply_fee(cnpy_out)
    /// new_cnpy_reserve   = x − cnpy_out
    /// ```
    pub fn sell(
        &self,
        pool: &VirtualPool,
        token_amount_in: impl Into<TradeAmount>,
    ) -> Result<TradeResult> {
        pool.validate()?;
        let token_amount_in: TradeAmount = token_amount_in.into();
        let token_amount_in = ensure_positive(&token_amount_in, "token_amount_in")?;
        ensure_within_supply(token_amount_in, pool.total_supply())?;

        let x = pool.cnpy_reserve();
        let y = pool.token_reserve();

        let denom = y.clone() + token_amount_in;
        let numer = token_amount_in.clone() * x;
        let cnpy_out = checked_div(&numer, &denom, "token_reserve + token_amount_in")?;
        let cnpy_out_after_fee = self.config.apply_fee(&cnpy_out);
        if &cnpy_out_after_fee > x {
            curve_bail!(
                CurveErrorCode::InsufficientReserve,
                cnpy_reserve => x,
                cnpy_out => &cnpy_out_after_fee,
            );
        }

        // a diferença da taxa não volta para a reserva
        let new_cnpy_reserve = x.clone() - &cnpy_out;
        let new_token_reserve = y.clone() + token_amount_in;
        let new_total_supply = pool.total_supply().clone() - token_amount_in;
        ensure_non_negative(&new_cnpy_reserve, "new_cnpy_reserve")?;
        ensure_non_negative(&new_token_reserve, "new_token_reserve")?;
        ensure_non_negative(&new_total_supply, "new_total_supply")?;

        let price = checked_div(&cnpy_out_after_fee, token_amount_in, "token_amount_in")?;
        let price_impact_percent = price_impact(&price, &pool.current_price())?;

        let result = TradeResult {
            amount_out: cnpy_out_after_fee,
            new_cnpy_reserve,
            new_token_reserve,
            new_total_supply,
            price,
            price_impact_percent,
        };
        debug!(
            target: "launch_curve::curve",
            side = "sell",
            token_amount_in = %token_amount_in,
            amount_out = %result.amount_out,
            price_impact_percent = %result.price_impact_percent,
            "trade computed"
        );
        Ok(result)
    }

    pub fn trade(
        &self,
        pool: &VirtualPool,
        amount_in: impl Into<TradeAmount>,
        side: TradeSide,
    ) -> Result<TradeResult> {
        match side {
            TradeSide::Buy => self.buy(pool, amount_in),
            TradeSide::Sell => self.sell(pool, amount_in),
        }
    }

    /// `buy` sobre uma cópia; o pool do chamador fica intacto.
    pub fn simulate_buy(
        &self,
        pool: &VirtualPool,
        amount_in: impl Into<TradeAmount>,
    ) -> Result<TradeResult> {
        let scratch = pool.copy();
        self.buy(&scratch, amount_in)
    }

    /// `sell` sobre uma cópia; o pool do chamador fica intacto.
    pub fn simulate_sell(
        &self,
        pool: &VirtualPool,
        token_amount_in: impl Into<TradeAmount>,
    ) -> Result<TradeResult> {
        let scratch = pool.copy();
        self.sell(&scratch, token_amount_in)
    }

    pub fn simulate(
        &self,
        pool: &VirtualPool,
        amount_in: impl Into<TradeAmount>,
        side: TradeSide,
    ) -> Result<TradeResult> {
        match side {
            TradeSide::Buy => self.simulate_buy(pool, amount_in),
            TradeSide::Sell => self.simulate_sell(pool, amount_in),
        }
    }
}

//! Configuração imutável da curva: taxa (bps) e preço de bootstrap.
//! A taxa sempre sai da perna de SAÍDA da operação.

use serde::{Deserialize, Serialize};

use super::decimal::Amount;
use super::error_catalog::CurveErrorCode;
use super::errors::{CurveError, Result};
use super::guardrails::{ensure_fee_bps, ensure_initial_price};
use super::types::{BPS_DIVISOR, DEFAULT_FEE_BPS, DEFAULT_INITIAL_PRICE};
use crate::curve_err;

pub const ENV_FEE_BPS: &str = "CURVE_FEE_BPS";
pub const ENV_INITIAL_PRICE: &str = "CURVE_INITIAL_PRICE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct BondingCurveConfig {
    fee_rate_basis_points: u32,
    initial_price: Amount,
}

/// Forma serializada, ainda sem validação.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default = "default_fee_bps")]
    fee_rate_basis_points: u32,
    #[serde(default = "default_initial_price")]
    initial_price: Amount,
}

fn default_fee_bps() -> u32 {
    DEFAULT_FEE_BPS
}

fn default_initial_price() -> Amount {
    let (n, d) = DEFAULT_INITIAL_PRICE;
    Amount::from_ratio(n, d).unwrap_or_else(|_| Amount::zero())
}

impl TryFrom<RawConfig> for BondingCurveConfig {
    type Error = CurveError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Self::new(raw.fee_rate_basis_points, raw.initial_price)
    }
}

impl From<BondingCurveConfig> for RawConfig {
    fn from(cfg: BondingCurveConfig) -> Self {
        Self {
            fee_rate_basis_points: cfg.fee_rate_basis_points,
            initial_price: cfg.initial_price,
        }
    }
}

impl Default for BondingCurveConfig {
    /// 100 bps (1%) e preço inicial 0.01.
    fn default() -> Self {
        Self {
            fee_rate_basis_points: DEFAULT_FEE_BPS,
            initial_price: default_initial_price(),
        }
    }
}

impl BondingCurveConfig {
    /// Valida `fee_bps ∈ [0, 10000]` e `initial_price > 0`.
    pub fn new(fee_rate_basis_points: u32, initial_price: Amount) -> Result<Self> {
        ensure_fee_bps(fee_rate_basis_points)?;
        ensure_initial_price(&initial_price)?;
        Ok(Self {
            fee_rate_basis_points,
            initial_price,
        })
    }

    /// Lê `CURVE_FEE_BPS` / `CURVE_INITIAL_PRICE`; ausentes usam o padrão.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fee = match lookup(ENV_FEE_BPS) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                curve_err!(CurveErrorCode::InvalidConfig, { ENV_FEE_BPS => raw })
            })?,
            None => DEFAULT_FEE_BPS,
        };
        let price = match lookup(ENV_INITIAL_PRICE) {
            Some(raw) => raw.parse::<Amount>().map_err(|_| {
                curve_err!(CurveErrorCode::InvalidConfig, { ENV_INITIAL_PRICE => raw })
            })?,
            None => default_initial_price(),
        };
        Self::new(fee, price)
    }

    pub fn fee_rate_basis_points(&self) -> u32 {
        self.fee_rate_basis_points
    }

    pub fn initial_price(&self) -> &Amount {
        &self.initial_price
    }

    /// `a × (10000 − fee) / 10000`
    pub fn apply_fee(&self, amount: &Amount) -> Amount {
        let keep = BPS_DIVISOR - self.fee_rate_basis_points;
        amount.clone() * bps_fraction(keep)
    }

    /// `a × fee / 10000`
    pub fn calculate_fee(&self, amount: &Amount) -> Amount {
        amount.clone() * bps_fraction(self.fee_rate_basis_points)
    }
}

#[inline]
fn bps_fraction(bps: u32) -> Amount {
    // BPS_DIVISOR != 0
    Amount::from_ratio(i64::from(bps), i64::from(BPS_DIVISOR)).unwrap_or_else(|_| Amount::zero())
}

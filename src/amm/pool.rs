//! Pool virtual: reservas CNPY/token + supply emitido.
//! Invariante: reservas ambas exatamente zero (bootstrap) ou ambas > 0; supply >= 0.

use serde::{Deserialize, Serialize};

use super::curve::TradeResult;
use super::decimal::Amount;
use super::error_catalog::CurveErrorCode;
use super::errors::{CurveError, Result};
use crate::{curve_bail, curve_err};

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VirtualPool {
    cnpy_reserve: Amount,
    token_reserve: Amount,
    total_supply: Amount,
}

/// Forma bruta entregue pela persistência; campos podem faltar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub cnpy_reserve: Option<Amount>,
    pub token_reserve: Option<Amount>,
    pub total_supply: Option<Amount>,
}

impl VirtualPool {
    /// Copia os três valores; o pool nunca compartilha estado com o chamador.
    pub fn new(cnpy_reserve: &Amount, token_reserve: &Amount, total_supply: &Amount) -> Self {
        Self {
            cnpy_reserve: cnpy_reserve.clone(),
            token_reserve: token_reserve.clone(),
            total_supply: total_supply.clone(),
        }
    }

    /// Pool de lançamento: (0, 0, 0).
    pub fn bootstrap() -> Self {
        Self::default()
    }

    /// Converte um snapshot; qualquer campo ausente é `PoolNotInitialized`.
    pub fn from_snapshot(snapshot: &PoolSnapshot) -> Result<Self> {
        let field = |value: &Option<Amount>, name: &str| -> Result<Amount> {
            value
                .clone()
                .ok_or_else(|| curve_err!(CurveErrorCode::PoolNotInitialized, { "missing" => name }))
        };
        Ok(Self {
            cnpy_reserve: field(&snapshot.cnpy_reserve, "cnpy_reserve")?,
            token_reserve: field(&snapshot.token_reserve, "token_reserve")?,
            total_supply: field(&snapshot.total_supply, "total_supply")?,
        })
    }

    pub fn to_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            cnpy_reserve: Some(self.cnpy_reserve.clone()),
            token_reserve: Some(self.token_reserve.clone()),
            total_supply: Some(self.total_supply.clone()),
        }
    }

    /// Clone independente.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn cnpy_reserve(&self) -> &Amount {
        &self.cnpy_reserve
    }

    pub fn token_reserve(&self) -> &Amount {
        &self.token_reserve
    }

    pub fn total_supply(&self) -> &Amount {
        &self.total_supply
    }

    pub fn is_bootstrap(&self) -> bool {
        self.cnpy_reserve.is_zero() && self.token_reserve.is_zero()
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_supply.is_negative() {
            curve_bail!(CurveErrorCode::PoolNotInitialized, total_supply => &self.total_supply);
        }
        if self.is_bootstrap() {
            return Ok(());
        }
        if !self.cnpy_reserve.is_positive() || !self.token_reserve.is_positive() {
            curve_bail!(
                CurveErrorCode::InsufficientReserve,
                cnpy_reserve => &self.cnpy_reserve,
                token_reserve => &self.token_reserve,
            );
        }
        Ok(())
    }

    /// `cnpy_reserve / token_reserve`; 0 quando não há reserva de tokens.
    pub fn current_price(&self) -> Amount {
        self.cnpy_reserve
            .checked_div(&self.token_reserve)
            .unwrap_or_else(Amount::zero)
    }

    /// `current_price × total_supply`.
    pub fn market_cap(&self) -> Amount {
        self.current_price() * &self.total_supply
    }

    /// Pool resultante de aplicar um `TradeResult`; `self` fica intacto.
    pub fn apply(&self, result: &TradeResult) -> Self {
        Self::from(result)
    }
}

impl From<&TradeResult> for VirtualPool {
    fn from(result: &TradeResult) -> Self {
        Self::new(
            &result.new_cnpy_reserve,
            &result.new_token_reserve,
            &result.new_total_supply,
        )
    }
}

impl TryFrom<PoolSnapshot> for VirtualPool {
    type Error = CurveError;

    fn try_from(snapshot: PoolSnapshot) -> Result<Self> {
        Self::from_snapshot(&snapshot)
    }
}

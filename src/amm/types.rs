//! Tipos básicos da curva + constantes de contrato.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::decimal::Amount;

/// Divisor de basis points (10000 bps = 100%).
pub const BPS_DIVISOR: u32 = 10_000;
/// Taxa padrão: 100 bps = 1%.
pub const DEFAULT_FEE_BPS: u32 = 100;
/// Preço de bootstrap padrão (CNPY por token), como fração `1/100`.
pub const DEFAULT_INITIAL_PRICE: (i64, i64) = (1, 100);

/// Direção da operação.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// CNPY entra, tokens saem.
    Buy,
    /// Tokens entram, CNPY sai.
    Sell,
}

impl TradeSide {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Montante de entrada de uma operação; `Absent` cai no mesmo caminho de `ZeroAmount`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TradeAmount {
    #[default]
    Absent,
    Value(Amount),
}

impl TradeAmount {
    pub fn as_value(&self) -> Option<&Amount> {
        match self {
            Self::Absent => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl From<Amount> for TradeAmount {
    fn from(value: Amount) -> Self {
        Self::Value(value)
    }
}

impl From<&Amount> for TradeAmount {
    fn from(value: &Amount) -> Self {
        Self::Value(value.clone())
    }
}

impl From<Option<Amount>> for TradeAmount {
    fn from(value: Option<Amount>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl fmt::Display for TradeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Value(v) => fmt::Display::fmt(v, f),
        }
    }
}

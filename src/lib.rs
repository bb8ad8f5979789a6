//! Motor de precificação por curva de reservas virtuais para lançamento de tokens.
//!
//! O motor é puro: recebe um [`VirtualPool`], devolve um [`TradeResult`] e nunca
//! muta o pool do chamador. Persistir o resultado é responsabilidade de quem chama.

pub mod amm;
pub mod telemetry;

pub use amm::{
    Amount, BondingCurve, BondingCurveConfig, CurveError, CurveErrorCode, PoolSnapshot, TradeAmount,
    TradeResult, TradeSide, VirtualPool,
};

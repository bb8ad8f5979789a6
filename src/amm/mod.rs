pub mod types;
pub mod decimal;
pub mod errors;        // reexports da API de erros
pub mod guardrails;
pub mod pool;
pub mod config;
pub mod curve;
pub mod pricing;
pub mod ref_golden;

pub mod error_catalog;
pub mod error;
pub mod error_map;

pub use config::BondingCurveConfig;
pub use curve::{BondingCurve, TradeResult};
pub use decimal::Amount;
pub use errors::{CurveError, CurveErrorCode, Result};
pub use pool::{PoolSnapshot, VirtualPool};
pub use types::{TradeAmount, TradeSide};

//! Reexporta a API de erros unificada.

pub use super::error::{CurveError, Result};
pub use super::error_catalog::{default_locale_message, CurveErrorCode};
pub use super::error_map::{disposition, from_trade_inputs, to_error, Disposition};

//! Validações e helpers numéricos seguros para a curva.
//! Objetivo: entradas seguras e divisões sem denominador zero.

use super::decimal::Amount;
use super::error_catalog::CurveErrorCode;
use super::errors::Result;
use super::types::{TradeAmount, BPS_DIVISOR};
use crate::{curve_bail, curve_err};

/// Exige montante presente e estritamente positivo.
#[inline]
pub fn ensure_positive<'a>(amount: &'a TradeAmount, field: &str) -> Result<&'a Amount> {
    match amount.as_value() {
        Some(v) if v.is_positive() => Ok(v),
        _ => Err(curve_err!(CurveErrorCode::ZeroAmount, { field => amount })),
    }
}

/// Venda não pode exceder o supply em circulação (igualdade é permitida).
#[inline]
pub fn ensure_within_supply(amount: &Amount, total_supply: &Amount) -> Result<()> {
    if amount > total_supply {
        curve_bail!(
            CurveErrorCode::InsufficientTokens,
            token_amount_in => amount,
            total_supply => total_supply,
        );
    }
    Ok(())
}

/// Resultado de reserva/supply nunca pode ficar negativo.
#[inline]
pub fn ensure_non_negative(value: &Amount, field: &str) -> Result<()> {
    if value.is_negative() {
        curve_bail!(CurveErrorCode::InsufficientReserve, { field => value });
    }
    Ok(())
}

/// `n / d`; denominador zero vira `InsufficientReserve`.
#[inline]
pub fn checked_div(n: &Amount, d: &Amount, what: &str) -> Result<Amount> {
    n.checked_div(d)
        .ok_or_else(|| curve_err!(CurveErrorCode::InsufficientReserve, { "zero_denominator" => what }))
}

#[inline]
pub fn ensure_fee_bps(fee_bps: u32) -> Result<()> {
    if fee_bps > BPS_DIVISOR {
        curve_bail!(CurveErrorCode::InvalidConfig, fee_rate_bps => fee_bps);
    }
    Ok(())
}

#[inline]
pub fn ensure_initial_price(price: &Amount) -> Result<()> {
    if !price.is_positive() {
        curve_bail!(CurveErrorCode::InvalidConfig, initial_price => price);
    }
    Ok(())
}

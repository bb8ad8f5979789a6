//! Mapeamento entre condições de domínio e códigos de erro da curva.
use crate::amm::error::CurveError;
use crate::amm::error_catalog::CurveErrorCode;
use crate::amm::pool::VirtualPool;
use crate::amm::types::{TradeAmount, TradeSide};

/// O que o chamador deve fazer com uma operação que falhou.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Estado ou configuração corrompidos; não adianta repetir.
    CallerBug,
    /// O pool não comporta a operação agora; pode passar depois.
    RetryLater,
    /// Entrada inválida; corrigir e reenviar.
    FixInput,
}

/// Checagens de entrada pré-operação: pool, montante e supply, na ordem de `buy`/`sell`.
///
/// Não roda a fórmula: falhas que só aparecem no cálculo (denominador zero,
/// reserva drenada pela venda) devolvem `None` aqui e erro em `simulate`.
pub fn from_trade_inputs(
    pool: &VirtualPool,
    amount: &TradeAmount,
    side: TradeSide,
) -> Option<CurveErrorCode> {
    if let Err(err) = pool.validate() {
        return Some(err.code);
    }
    let value = match amount.as_value() {
        Some(v) if v.is_positive() => v,
        _ => return Some(CurveErrorCode::ZeroAmount),
    };
    if side == TradeSide::Sell && value > pool.total_supply() {
        return Some(CurveErrorCode::InsufficientTokens);
    }
    None
}

/// Classifica o código para a política de tratamento do chamador.
pub const fn disposition(code: CurveErrorCode) -> Disposition {
    match code {
        CurveErrorCode::PoolNotInitialized | CurveErrorCode::InvalidConfig => {
            Disposition::CallerBug
        }
        CurveErrorCode::InsufficientReserve | CurveErrorCode::InsufficientTokens => {
            Disposition::RetryLater
        }
        CurveErrorCode::ZeroAmount | CurveErrorCode::InvalidNumber => Disposition::FixInput,
    }
}

/// Constrói um [`CurveError`] diretamente de um código.
pub fn to_error(code: CurveErrorCode) -> CurveError {
    CurveError::new(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::decimal::Amount;

    fn a(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn pool(x: &str, y: &str, s: &str) -> VirtualPool {
        VirtualPool::new(&a(x), &a(y), &a(s))
    }

    #[test]
    fn detects_zero_amount() {
        let p = pool("1000", "800000", "200000");
        for amount in [TradeAmount::Absent, a("0").into(), a("-1").into()] {
            assert_eq!(
                from_trade_inputs(&p, &amount, TradeSide::Buy),
                Some(CurveErrorCode::ZeroAmount)
            );
        }
    }

    #[test]
    fn detects_invalid_pool_first() {
        let p = pool("0", "5", "0");
        assert_eq!(
            from_trade_inputs(&p, &TradeAmount::Absent, TradeSide::Buy),
            Some(CurveErrorCode::InsufficientReserve)
        );
        let p = pool("1", "1", "-1");
        assert_eq!(
            from_trade_inputs(&p, &a("1").into(), TradeSide::Sell),
            Some(CurveErrorCode::PoolNotInitialized)
        );
    }

    #[test]
    fn detects_oversell() {
        let p = pool("1000", "800000", "200000");
        assert_eq!(
            from_trade_inputs(&p, &a("200001").into(), TradeSide::Sell),
            Some(CurveErrorCode::InsufficientTokens)
        );
        assert_eq!(from_trade_inputs(&p, &a("200000").into(), TradeSide::Sell), None);
        // compra não olha o supply
        assert_eq!(from_trade_inputs(&p, &a("200001").into(), TradeSide::Buy), None);
    }

    #[test]
    fn formula_failures_are_out_of_scope() {
        // bootstrap com supply: entradas ok, mas o preço anterior é zero
        let p = pool("0", "0", "10");
        let amount: TradeAmount = a("1").into();
        assert_eq!(from_trade_inputs(&p, &amount, TradeSide::Sell), None);
        let curve = crate::amm::curve::BondingCurve::with_defaults();
        let err = curve.simulate(&p, amount.clone(), TradeSide::Sell).unwrap_err();
        assert_eq!(err.code, CurveErrorCode::InsufficientReserve);
    }

    #[test]
    fn dispositions() {
        assert_eq!(disposition(CurveErrorCode::PoolNotInitialized), Disposition::CallerBug);
        assert_eq!(disposition(CurveErrorCode::InsufficientReserve), Disposition::RetryLater);
        assert_eq!(disposition(CurveErrorCode::InsufficientTokens), Disposition::RetryLater);
        assert_eq!(disposition(CurveErrorCode::ZeroAmount), Disposition::FixInput);
    }

    #[test]
    fn to_error_has_no_context() {
        let err = to_error(CurveErrorCode::ZeroAmount);
        assert!(err.context.is_empty());
    }
}

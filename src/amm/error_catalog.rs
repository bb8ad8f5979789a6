//! Catálogo imutável de erros da curva.
use core::fmt;

/// Código de erro da curva.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum CurveErrorCode {
    /// Montante de entrada zero, negativo ou ausente.
    ZeroAmount,
    /// Pool com campos ausentes ou supply negativo.
    PoolNotInitialized,
    /// Reservas inválidas ou insuficientes para a operação.
    InsufficientReserve,
    /// Venda acima do supply em circulação.
    InsufficientTokens,
    /// Configuração fora dos limites.
    InvalidConfig,
    /// Texto numérico inválido.
    InvalidNumber,
}

impl CurveErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "CRV-0001",
            Self::PoolNotInitialized => "CRV-0002",
            Self::InsufficientReserve => "CRV-0003",
            Self::InsufficientTokens => "CRV-0004",
            Self::InvalidConfig => "CRV-0005",
            Self::InvalidNumber => "CRV-0006",
        }
    }

    /// Título curto em português.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "Quantidade inválida",
            Self::PoolNotInitialized => "Pool não inicializado",
            Self::InsufficientReserve => "Reserva insuficiente",
            Self::InsufficientTokens => "Tokens insuficientes",
            Self::InvalidConfig => "Configuração inválida",
            Self::InvalidNumber => "Número inválido",
        }
    }

    /// Mensagem base em português (aceita placeholders `{chave}`).
    pub const fn message_pt(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "amount deve ser > 0",
            Self::PoolNotInitialized => "pool sem reservas/supply válidos",
            Self::InsufficientReserve => "reserva insuficiente para a operação",
            Self::InsufficientTokens => "quantidade excede o supply em circulação",
            Self::InvalidConfig => "configuração da curva fora dos limites",
            Self::InvalidNumber => "valor numérico inválido: {input}",
        }
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [CurveErrorCode] {
        const ALL: &[CurveErrorCode] = &[
            CurveErrorCode::ZeroAmount,
            CurveErrorCode::PoolNotInitialized,
            CurveErrorCode::InsufficientReserve,
            CurveErrorCode::InsufficientTokens,
            CurveErrorCode::InvalidConfig,
            CurveErrorCode::InvalidNumber,
        ];
        ALL
    }
}

impl fmt::Display for CurveErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (pt-BR).
pub fn default_locale_message(code: CurveErrorCode) -> &'static str {
    code.message_pt()
}

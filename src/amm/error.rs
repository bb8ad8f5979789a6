//! Tipo de erro unificado da curva com formatação estável.
use core::fmt;
use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::amm::error_catalog::{default_locale_message, CurveErrorCode};

const CONTEXT_VALUE_MAX: usize = 256;

fn sanitize_value(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            _ => ch,
        })
        .collect();
    if cleaned.chars().count() > CONTEXT_VALUE_MAX {
        let mut truncated = cleaned
            .chars()
            .take(CONTEXT_VALUE_MAX - 1)
            .collect::<String>();
        truncated.push('…');
        truncated
    } else {
        cleaned
    }
}

fn render_template(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            rendered.push(ch);
            continue;
        }
        let mut key = String::new();
        for next in chars.by_ref() {
            if next == '}' {
                break;
            }
            key.push(next);
        }
        match context.get(&key) {
            Some(value) if !key.is_empty() => rendered.push_str(value),
            _ => {
                rendered.push('{');
                rendered.push_str(&key);
                rendered.push('}');
            }
        }
    }
    rendered
}

/// Erro da curva com contexto estruturado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveError {
    pub code: CurveErrorCode,
    pub context: BTreeMap<String, String>,
}

impl CurveError {
    /// Cria um novo erro sem contexto adicional.
    pub fn new(code: CurveErrorCode) -> Self {
        Self {
            code,
            context: BTreeMap::new(),
        }
    }

    /// Adiciona um par chave/valor ao contexto.
    pub fn with_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key_string = key.into();
        if !key_string.is_empty() {
            let sanitized = sanitize_value(&value.to_string());
            self.context.insert(key_string, sanitized);
        }
        self
    }

    fn resolved_message(&self) -> String {
        render_template(default_locale_message(self.code), &self.context)
    }

    /// Mensagem curta para UI.
    pub fn to_user_string(&self) -> String {
        format!("[{}] {}", self.code.code(), self.resolved_message())
    }

    /// Renderiza um template arbitrário usando o contexto atual.
    pub fn render_with_template(&self, template: &str) -> String {
        render_template(template, &self.context)
    }

    /// Serialização estável em JSON para logs (chaves do contexto ordenadas).
    pub fn to_log_json(&self) -> String {
        let context: Map<String, Value> = self
            .context
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        json!({
            "code": self.code.code(),
            "title": self.code.title(),
            "message": self.resolved_message(),
            "context": context,
        })
        .to_string()
    }
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_string())
    }
}

impl std::error::Error for CurveError {}

/// Resultado padrão para operações da curva.
pub type Result<T> = std::result::Result<T, CurveError>;

#[macro_export]
macro_rules! curve_err {
  ($code:expr) => {{
    $crate::amm::error::CurveError::new($code)
  }};
  ($code:expr, $($key:ident => $value:expr),+ $(,)?) => {{
    let mut err = $crate::amm::error::CurveError::new($code);
    $(
      err = err.with_context(stringify!($key), $value);
    )+
    err
  }};
  ($code:expr, { $($key:expr => $value:expr),+ $(,)? }) => {{
    let mut err = $crate::amm::error::CurveError::new($code);
    $(
      err = err.with_context($key, $value);
    )+
    err
  }};
}

#[macro_export]
macro_rules! curve_bail {
  ($($tt:tt)*) => {
    return Err($crate::curve_err!($($tt)*))
  };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_string_basic() {
        let err = CurveError::new(CurveErrorCode::ZeroAmount);
        assert_eq!(err.to_user_string(), "[CRV-0001] amount deve ser > 0");
    }

    #[test]
    fn placeholder_subst() {
        let err = CurveError::new(CurveErrorCode::InvalidNumber).with_context("input", "abc");
        assert_eq!(err.to_user_string(), "[CRV-0006] valor numérico inválido: abc");
        assert_eq!(err.render_with_template("falha {input}"), "falha abc");
    }

    #[test]
    fn log_json_shape() {
        let err = CurveError::new(CurveErrorCode::InsufficientReserve).with_context("cnpy_reserve", "0");
        let parsed: Value = serde_json::from_str(&err.to_log_json()).unwrap();
        assert_eq!(parsed["code"], "CRV-0003");
        assert_eq!(parsed["title"], "Reserva insuficiente");
        assert_eq!(parsed["context"]["cnpy_reserve"], "0");
        assert!(parsed["message"].is_string());
    }

    #[test]
    fn macros_variants() {
        let err = curve_err!(CurveErrorCode::ZeroAmount, amount => 0);
        assert_eq!(err.code, CurveErrorCode::ZeroAmount);
        assert_eq!(err.context.get("amount").unwrap(), "0");

        let err_block = curve_err!(CurveErrorCode::InsufficientTokens, { "total_supply" => 10 });
        assert_eq!(err_block.code, CurveErrorCode::InsufficientTokens);
        assert_eq!(err_block.context.get("total_supply").unwrap(), "10");
    }

    #[test]
    fn bail_returns_err() {
        fn f(flag: bool) -> Result<u8> {
            if flag {
                curve_bail!(CurveErrorCode::InvalidConfig, fee_bps => 20_000);
            }
            Ok(1)
        }
        assert_eq!(f(true).unwrap_err().code, CurveErrorCode::InvalidConfig);
        assert_eq!(f(false).unwrap(), 1);
    }
}

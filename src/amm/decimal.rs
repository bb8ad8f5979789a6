//! `Amount`: decimal de precisão arbitrária (racional exato sobre BigInt).
//! Política:
//! - soma/subtração/multiplicação: exatas, sem arredondamento
//! - divisão: só via `checked_div` (divisor zero não entra em pânico)
//! - fronteira de serialização: string decimal, nunca float binário

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use core::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::error_catalog::CurveErrorCode;
use super::errors::CurveError;
use crate::curve_err;

/// Casas decimais usadas quando a expansão não termina (≈133 bits de fração).
pub const SERIAL_SCALE: u32 = 40;

/// Maior `|expoente − casas|` aceito no parse; acima disso o texto é `InvalidNumber`.
pub const MAX_DECIMAL_EXPONENT: u32 = 4096;

#[inline]
fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Divide `n/d` (d > 0) com **nearest (ties-to-even)**.
fn div_nearest_even_big(n: &BigInt, d: &BigInt) -> BigInt {
    let (q, r) = n.div_mod_floor(d);
    let two_r: BigInt = &r << 1;
    if two_r < *d {
        return q;
    }
    if two_r > *d {
        return q + BigInt::one();
    }
    if q.is_odd() {
        q + BigInt::one()
    } else {
        q
    }
}

/// Se a expansão decimal de `1/d` termina, retorna o número de casas necessárias.
fn terminating_scale(denom: &BigInt) -> Option<u32> {
    let two = BigInt::from(2u8);
    let five = BigInt::from(5u8);
    let mut d = denom.clone();
    let (mut twos, mut fives) = (0u32, 0u32);
    while d.is_even() {
        d /= &two;
        twos += 1;
    }
    while (&d % &five).is_zero() {
        d /= &five;
        fives += 1;
    }
    if d.is_one() {
        Some(twos.max(fives))
    } else {
        None
    }
}

/// Quantidade monetária exata.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigRational);

impl Amount {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// `numer/denom`; falha com `InvalidNumber` se `denom == 0`.
    pub fn from_ratio(numer: i64, denom: i64) -> Result<Self, CurveError> {
        if denom == 0 {
            return Err(curve_err!(CurveErrorCode::InvalidNumber, input => format!("{numer}/0")));
        }
        Ok(Self(BigRational::new(BigInt::from(numer), BigInt::from(denom))))
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// `self / rhs`, ou `None` quando `rhs == 0`.
    pub fn checked_div(&self, rhs: &Amount) -> Option<Amount> {
        if rhs.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &rhs.0))
        }
    }

    /// `round(self × 10^scale)` com nearest (ties-to-even).
    fn scaled_integer(&self, scale: u32) -> BigInt {
        let n = self.0.numer() * pow10(scale);
        div_nearest_even_big(&n, self.0.denom())
    }

    /// Arredonda para `scale` casas decimais (nearest, ties-to-even).
    pub fn round_to_scale(&self, scale: u32) -> Amount {
        Self(BigRational::new(self.scaled_integer(scale), pow10(scale)))
    }

    /// String decimal arredondada em `scale` casas, sem zeros à direita.
    pub fn to_decimal_string(&self, scale: u32) -> String {
        let q = self.scaled_integer(scale);
        let negative = q.is_negative();
        let digits = q.abs().to_string();
        let scale = scale as usize;
        let (int_part, frac_part) = if digits.len() > scale {
            let split = digits.len() - scale;
            (digits[..split].to_string(), digits[split..].to_string())
        } else {
            ("0".to_string(), format!("{}{}", "0".repeat(scale - digits.len()), digits))
        };
        let frac_trimmed = frac_part.trim_end_matches('0');
        let mut out = String::with_capacity(int_part.len() + frac_trimmed.len() + 2);
        if negative {
            out.push('-');
        }
        out.push_str(&int_part);
        if !frac_trimmed.is_empty() {
            out.push('.');
            out.push_str(frac_trimmed);
        }
        out
    }

    /// Forma canônica: exata quando a expansão termina, senão `SERIAL_SCALE` casas.
    pub fn to_canonical_string(&self) -> String {
        let scale = terminating_scale(self.0.denom()).unwrap_or(SERIAL_SCALE);
        self.to_decimal_string(scale)
    }

    /// Aproximação em `f64` só para métricas e logs.
    pub fn to_f64_lossy(&self) -> f64 {
        self.to_decimal_string(18).parse::<f64>().unwrap_or(f64::NAN)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }
}

impl From<BigRational> for Amount {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

fn parse_decimal(input: &str) -> Option<BigRational> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some((n, d)) = s.split_once('/') {
        let numer = BigInt::from_str(n.trim()).ok()?;
        let denom = BigInt::from_str(d.trim()).ok()?;
        if denom.is_zero() {
            return None;
        }
        return Some(BigRational::new(numer, denom));
    }

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&s[..idx], s[idx + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };
    let (negative, unsigned) = match mantissa.as_bytes().first()? {
        b'-' => (true, &mantissa[1..]),
        b'+' => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (int_digits, frac_digits) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    if !int_digits.bytes().chain(frac_digits.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let all_digits = format!("{int_digits}{frac_digits}");
    let mut numer = BigInt::from_str(&all_digits).ok()?;
    if negative {
        numer = -numer;
    }
    let frac_len = i64::try_from(frac_digits.len()).ok()?;
    let shift = i64::from(exponent).checked_sub(frac_len)?;
    if shift.unsigned_abs() > u64::from(MAX_DECIMAL_EXPONENT) {
        return None;
    }
    let magnitude = u32::try_from(shift.unsigned_abs()).ok()?;
    let value = if shift >= 0 {
        BigRational::from_integer(numer * pow10(magnitude))
    } else {
        BigRational::new(numer, pow10(magnitude))
    };
    Some(value)
}

impl FromStr for Amount {
    type Err = CurveError;

    /// Aceita `123`, `-0.5`, `1.25e-3` e frações `7/3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s)
            .map(Self)
            .ok_or_else(|| curve_err!(CurveErrorCode::InvalidNumber, input => s))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

macro_rules! impl_amount_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Amount> for &Amount {
            type Output = Amount;
            fn $method(self, rhs: &Amount) -> Amount {
                Amount((&self.0).$method(&rhs.0))
            }
        }
        impl $trait<Amount> for Amount {
            type Output = Amount;
            fn $method(self, rhs: Amount) -> Amount {
                Amount(self.0.$method(rhs.0))
            }
        }
        impl $trait<&Amount> for Amount {
            type Output = Amount;
            fn $method(self, rhs: &Amount) -> Amount {
                Amount(self.0.$method(&rhs.0))
            }
        }
    };
}

impl_amount_binop!(Add, add);
impl_amount_binop!(Sub, sub);
impl_amount_binop!(Mul, mul);

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

struct AmountVisitor;

impl<'de> de::Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::invalid_type(de::Unexpected::Float(v), &self))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

//! Numeric operands
//!
//! JSON numbers keep their kind through arithmetic: integers stay
//! integers under addition, subtraction and multiplication, floats stay
//! floats, and division is always real division. Integers are carried
//! as `i128` so every JSON integer (`i64` or `u64`) is exact.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while interpreting or combining operands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// Operand is not a JSON number
    #[error("unsupported operand type {0}, expected a number")]
    NotANumber(&'static str),

    /// Integer result is out of range
    #[error("integer overflow computing {0}")]
    Overflow(String),

    /// Result has no JSON representation (NaN or infinite)
    #[error("result {0} is not representable as a JSON number")]
    NotRepresentable(String),
}

/// An integer or floating point operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i128),
    Float(f64),
}

/// JSON type name used in error messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Number {
    /// Interpret a JSON value as an operand
    pub fn from_value(value: &Value) -> Result<Self, NumberError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Number::Int(i128::from(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(Number::Int(i128::from(u)))
                } else {
                    n.as_f64()
                        .map(Number::Float)
                        .ok_or(NumberError::NotANumber("number"))
                }
            }
            other => Err(NumberError::NotANumber(type_name(other))),
        }
    }

    /// `self + rhs`
    pub fn add(self, rhs: i64) -> Result<Self, NumberError> {
        match self {
            Number::Int(n) => n
                .checked_add(i128::from(rhs))
                .map(Number::Int)
                .ok_or_else(|| NumberError::Overflow(format!("{} + {}", n, rhs))),
            Number::Float(f) => Ok(Number::Float(f + rhs as f64)),
        }
    }

    /// `self - rhs`
    pub fn sub(self, rhs: i64) -> Result<Self, NumberError> {
        match self {
            Number::Int(n) => n
                .checked_sub(i128::from(rhs))
                .map(Number::Int)
                .ok_or_else(|| NumberError::Overflow(format!("{} - {}", n, rhs))),
            Number::Float(f) => Ok(Number::Float(f - rhs as f64)),
        }
    }

    /// `self * rhs`
    pub fn mul(self, rhs: i64) -> Result<Self, NumberError> {
        match self {
            Number::Int(n) => n
                .checked_mul(i128::from(rhs))
                .map(Number::Int)
                .ok_or_else(|| NumberError::Overflow(format!("{} * {}", n, rhs))),
            Number::Float(f) => Ok(Number::Float(f * rhs as f64)),
        }
    }

    /// `self / rhs`, always real division
    pub fn div(self, rhs: i64) -> Self {
        Number::Float(self.as_f64() / rhs as f64)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// Convert back to a JSON number
    ///
    /// Integers outside the `i64`/`u64` range JSON numbers can hold are
    /// reported as overflow.
    pub fn to_value(self) -> Result<Value, NumberError> {
        match self {
            Number::Int(n) => {
                if let Ok(i) = i64::try_from(n) {
                    Ok(Value::from(i))
                } else if let Ok(u) = u64::try_from(n) {
                    Ok(Value::from(u))
                } else {
                    Err(NumberError::Overflow(format!("{} exceeds the JSON integer range", n)))
                }
            }
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| NumberError::NotRepresentable(self.to_string())),
        }
    }
}

/// Shortest round-trip float rendering with a signed, two-digit exponent
fn format_float(x: f64) -> String {
    let repr = format!("{:?}", x);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

// Floats always carry a fractional part ("2.0", not "2").
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) if x.is_nan() => write!(f, "nan"),
            Number::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "inf" } else { "-inf" })
            }
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

//! Fixed-point decimals: an unscaled integer plus the column's scale.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Largest scale any decimal width supports (Decimal128).
pub const MAX_SCALE: u32 = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub value: i128,
    pub scale: u32,
}

pub fn decimal32(scale: u32, value: i32) -> Decimal {
    Decimal {
        value: i128::from(value),
        scale,
    }
}

pub fn decimal64(scale: u32, value: i64) -> Decimal {
    Decimal {
        value: i128::from(value),
        scale,
    }
}

pub fn decimal128(scale: u32, value: i128) -> Decimal {
    Decimal { value, scale }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.value.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if self.value < 0 {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{digits:0>scale$}")
        }
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalParseError {
    Empty,
    InvalidDigit(char),
    ScaleTooLarge(usize),
    Overflow,
}

impl fmt::Display for DecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalParseError::Empty => f.write_str("empty decimal literal"),
            DecimalParseError::InvalidDigit(c) => write!(f, "invalid character {c:?} in decimal"),
            DecimalParseError::ScaleTooLarge(n) => {
                write!(f, "decimal has {n} fraction digits (max {MAX_SCALE})")
            }
            DecimalParseError::Overflow => f.write_str("decimal does not fit in 128 bits"),
        }
    }
}

impl std::error::Error for DecimalParseError {}

/// Parses `[-]digits[.digits]`; the scale is the number of fraction digits.
impl FromStr for Decimal {
    type Err = DecimalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalParseError::Empty);
        }
        if frac_part.len() > MAX_SCALE as usize {
            return Err(DecimalParseError::ScaleTooLarge(frac_part.len()));
        }

        let mut value: i128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let Some(d) = c.to_digit(10) else {
                return Err(DecimalParseError::InvalidDigit(c));
            };
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(d)))
                .ok_or(DecimalParseError::Overflow)?;
        }
        if negative {
            value = -value;
        }
        Ok(Decimal {
            value,
            scale: frac_part.len() as u32,
        })
    }
}

//! Exact decimals in arrow's `Decimal128` layout: a scaled `i128` plus the
//! number of fractional digits. Every `decimal(p, s)` with `p <= 38` fits.

use std::fmt;
use std::str::FromStr;

use arrow::datatypes::DECIMAL128_MAX_PRECISION;

use crate::error::{ErrorCode, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    value: i128,
    scale: u8,
}

impl DecimalValue {
    /// Builds a decimal from its scaled integer, checking the digit count and
    /// the scale against `Decimal128` limits.
    pub fn new(value: i128, scale: u8) -> Result<Self> {
        if scale > DECIMAL128_MAX_PRECISION {
            return Err(ErrorCode::UnsupportedType(format!(
                "decimal scale {} outside 0..={}",
                scale, DECIMAL128_MAX_PRECISION
            )));
        }
        let decimal = Self { value, scale };
        if decimal.precision() > DECIMAL128_MAX_PRECISION {
            return Err(ErrorCode::ParseError(format!(
                "{} has more than {} digits",
                decimal, DECIMAL128_MAX_PRECISION
            )));
        }
        Ok(decimal)
    }

    /// The scaled integer backing this decimal.
    pub fn raw_value(self) -> i128 {
        self.value
    }

    pub fn scale(self) -> u8 {
        self.scale
    }

    /// Total number of digits, at least one.
    pub fn precision(self) -> u8 {
        digit_count(self.value.unsigned_abs())
    }

    /// Digits left of the decimal point, zero for `0.x`.
    pub fn integer_digits(self) -> u8 {
        if self.value == 0 {
            return 0;
        }
        self.precision().saturating_sub(self.scale)
    }

    /// Parses `text` and rounds it half away from zero to `scale` fractional
    /// digits. Only plain `[+-]digits[.digits]` literals are read.
    pub fn parse_with_scale(text: &str, scale: u8) -> Result<Self> {
        let invalid = || ErrorCode::ParseError(format!("'{}' is not a valid decimal", text));
        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let overflow = || ErrorCode::ParseError(format!("'{}' does not fit a decimal", text));
        let kept = frac_part.len().min(scale as usize);
        let mut value: i128 = 0;
        for digit in int_part.bytes().chain(frac_part[..kept].bytes()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((digit - b'0') as i128))
                .ok_or_else(overflow)?;
        }
        // pad up to the requested scale
        for _ in kept..scale as usize {
            value = value.checked_mul(10).ok_or_else(overflow)?;
        }
        if frac_part.as_bytes().get(kept).map_or(false, |d| *d >= b'5') {
            value = value.checked_add(1).ok_or_else(overflow)?;
        }
        Self::new(if negative { -value } else { value }, scale)
    }

    /// Changes the scale. Raising it is exact; lowering it must not drop
    /// non-zero digits.
    pub fn rescale(self, scale: u8) -> Result<Self> {
        if scale >= self.scale {
            let factor = pow10(scale - self.scale)?;
            let value = self.value.checked_mul(factor).ok_or_else(|| {
                ErrorCode::NotSupported(format!("{} cannot be stored with scale {}", self, scale))
            })?;
            return Self::new(value, scale);
        }
        let factor = pow10(self.scale - scale)?;
        if self.value % factor != 0 {
            return Err(ErrorCode::NotSupported(format!(
                "{} cannot be stored with scale {} without rounding",
                self, scale
            )));
        }
        Self::new(self.value / factor, scale)
    }
}

/// Reads the literal at the scale it is written with.
impl FromStr for DecimalValue {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let scale = trimmed.split_once('.').map_or(0, |(_, frac)| frac.len());
        let scale = u8::try_from(scale)
            .ok()
            .filter(|scale| *scale <= DECIMAL128_MAX_PRECISION)
            .ok_or_else(|| ErrorCode::ParseError(format!("'{}' has too many fractional digits", s)))?;
        Self::parse_with_scale(trimmed, scale)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.value.unsigned_abs().to_string();
        if self.value < 0 {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            return write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits);
        }
        let split = digits.len() - scale;
        write!(f, "{}.{}", &digits[..split], &digits[split..])
    }
}

fn pow10(exponent: u8) -> Result<i128> {
    10i128.checked_pow(exponent as u32).ok_or_else(|| {
        ErrorCode::NotSupported(format!("10^{} does not fit a decimal", exponent))
    })
}

fn digit_count(mut value: u128) -> u8 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_written_scale() {
        let d = DecimalValue::from_str("32300.004747").unwrap();
        assert_eq!(d.raw_value(), 32_300_004_747);
        assert_eq!(d.scale(), 6);
        assert_eq!(d.precision(), 11);
        assert_eq!(d.integer_digits(), 5);
        assert_eq!(d.to_string(), "32300.004747");
    }

    #[test]
    fn thirty_eight_digits() {
        let text = "12345678901234567890123456789.123456789";
        let d = DecimalValue::from_str(text).unwrap();
        assert_eq!(d.raw_value(), 12345678901234567890123456789123456789);
        assert_eq!(d.precision(), 38);
        assert_eq!(d.to_string(), text);

        assert!(matches!(
            DecimalValue::from_str("123456789012345678901234567890123456789"),
            Err(ErrorCode::ParseError(_))
        ));
    }

    #[test]
    fn parse_rounds_to_scale() {
        let d = DecimalValue::parse_with_scale("1.5", 30).unwrap();
        assert_eq!(d.scale(), 30);
        assert_eq!(d.raw_value(), 15 * 10i128.pow(29));
        assert_eq!(DecimalValue::parse_with_scale("-2.345", 2).unwrap().to_string(), "-2.35");
        assert_eq!(DecimalValue::parse_with_scale(".5", 0).unwrap().raw_value(), 1);
        assert_eq!(DecimalValue::parse_with_scale("0.0001", 2).unwrap().to_string(), "0.00");
        assert_eq!(DecimalValue::parse_with_scale("0.0001", 2).unwrap().integer_digits(), 0);
    }

    #[test]
    fn reject_malformed_text() {
        for text in ["", "-", ".", "1e3", "1.2.3", "abc", " 1 2"] {
            assert!(
                matches!(DecimalValue::from_str(text), Err(ErrorCode::ParseError(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn rescale_is_exact() {
        let d = DecimalValue::from_str("1.50").unwrap();
        assert_eq!(d.rescale(4).unwrap().raw_value(), 15_000);
        assert_eq!(d.rescale(1).unwrap().raw_value(), 15);
        assert!(matches!(d.rescale(0), Err(ErrorCode::NotSupported(_))));
    }

    #[test]
    fn display_small_values() {
        assert_eq!(DecimalValue::new(-5, 3).unwrap().to_string(), "-0.005");
        assert_eq!(DecimalValue::new(0, 2).unwrap().to_string(), "0.00");
        assert!(DecimalValue::new(1, 39).is_err());
    }
}

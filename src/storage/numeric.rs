//! Numeric Codec
//!
//! Converts between the textual scalars clients send and the numbers the
//! increment commands compute with.
//!
//! ## Parsing
//!
//! - Integers are accepted only in canonical form: what `i64::to_string`
//!   would produce. `01`, `+1` and `-0` are not integers.
//! - Floats accept any decimal literal, including integers and exponent
//!   notation (`1e308`). Whitespace, `inf`, `nan` and literals that overflow
//!   to infinity are rejected.
//!
//! ## Formatting
//!
//! Floats render as the shortest decimal that round-trips, without an
//! exponent and without a trailing `.0`:
//!
//! ```text
//! 2.0      -> "2"
//! 1.1      -> "1.1"
//! -0.0     -> "0"
//! 1e21     -> "1000000000000000000000"
//! +inf     -> OutOfRange
//! ```

use thiserror::Error;

/// Errors produced when text cannot be treated as a number.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("value is not a valid float")]
    NotAFloat,

    #[error("value is not an integer or out of range")]
    NotAnInteger,

    /// Integer arithmetic left the `i64` range
    #[error("increment or decrement would overflow")]
    Overflow,

    /// Float arithmetic produced infinity or NaN
    #[error("value is out of range")]
    OutOfRange,
}

/// A parsed numeric scalar, tagged by the representation it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as a float, widening integers.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

/// Parses a canonical 64-bit signed integer.
pub fn parse_integer(token: &[u8]) -> Result<i64, NumericError> {
    let text = std::str::from_utf8(token).map_err(|_| NumericError::NotAnInteger)?;
    let n: i64 = text.parse().map_err(|_| NumericError::NotAnInteger)?;

    // Reject "+5", "007" and "-0" so that rendering gives back the same text
    if n.to_string() != text {
        return Err(NumericError::NotAnInteger);
    }

    Ok(n)
}

/// Parses a decimal literal.
///
/// Canonical integers come back as [`Number::Integer`], everything else that
/// is a finite decimal number as [`Number::Float`].
pub fn parse_float(token: &[u8]) -> Result<Number, NumericError> {
    if let Ok(n) = parse_integer(token) {
        return Ok(Number::Integer(n));
    }

    let text = std::str::from_utf8(token).map_err(|_| NumericError::NotAFloat)?;

    // Rust's float grammar also takes "inf", "infinity" and "nan"
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return Err(NumericError::NotAFloat);
    }

    let value: f64 = text.parse().map_err(|_| NumericError::NotAFloat)?;
    if !value.is_finite() {
        return Err(NumericError::NotAFloat);
    }

    Ok(Number::Float(value))
}

/// Renders a float in its minimal decimal form.
///
/// Fails with [`NumericError::OutOfRange`] for infinities and NaN so that a
/// non-finite result is never stored.
pub fn format_float(value: f64) -> Result<String, NumericError> {
    if !value.is_finite() {
        return Err(NumericError::OutOfRange);
    }

    // Covers -0.0 as well
    if value == 0.0 {
        return Ok("0".to_string());
    }

    // `Display` for f64 is shortest round-trip and never uses an exponent
    Ok(value.to_string())
}

/// Returns true if `token` is exactly what [`format_float`] would render
/// for the float it denotes.
pub fn is_canonical_float(token: &[u8]) -> bool {
    match parse_float(token) {
        Ok(number) => format_float(number.as_f64())
            .map(|rendered| rendered.as_bytes() == token)
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Adds an integer delta, failing instead of wrapping.
#[inline]
pub fn checked_increment(current: i64, delta: i64) -> Result<i64, NumericError> {
    current.checked_add(delta).ok_or(NumericError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_canonical() {
        assert_eq!(parse_integer(b"1"), Ok(1));
        assert_eq!(parse_integer(b"-42"), Ok(-42));
        assert_eq!(parse_integer(b"0"), Ok(0));
        assert_eq!(parse_integer(b"9223372036854775807"), Ok(i64::MAX));
    }

    #[test]
    fn test_parse_integer_rejects_non_canonical() {
        assert_eq!(parse_integer(b"+1"), Err(NumericError::NotAnInteger));
        assert_eq!(parse_integer(b"01"), Err(NumericError::NotAnInteger));
        assert_eq!(parse_integer(b"-0"), Err(NumericError::NotAnInteger));
        assert_eq!(parse_integer(b" 1"), Err(NumericError::NotAnInteger));
        assert_eq!(parse_integer(b"1.5"), Err(NumericError::NotAnInteger));
        assert_eq!(
            parse_integer(b"9223372036854775808"),
            Err(NumericError::NotAnInteger)
        );
        assert_eq!(parse_integer(b""), Err(NumericError::NotAnInteger));
    }

    #[test]
    fn test_parse_float_tags_integers() {
        assert_eq!(parse_float(b"1"), Ok(Number::Integer(1)));
        assert_eq!(parse_float(b"0.1"), Ok(Number::Float(0.1)));
        assert_eq!(parse_float(b"-0.1"), Ok(Number::Float(-0.1)));
        assert_eq!(parse_float(b"1e308"), Ok(Number::Float(1e308)));
        assert_eq!(parse_float(b"+2.5"), Ok(Number::Float(2.5)));
        assert_eq!(parse_float(b"007"), Ok(Number::Float(7.0)));
    }

    #[test]
    fn test_parse_float_rejects_garbage() {
        let tokens: [&[u8]; 11] = [
            b"",
            b" ",
            b"bar",
            b"1.2.3",
            b" 1.5",
            b"1.5 ",
            b"inf",
            b"-Infinity",
            b"NaN",
            b"1e400",
            b"\xff",
        ];
        for token in tokens {
            assert_eq!(parse_float(token), Err(NumericError::NotAFloat), "{:?}", token);
        }
    }

    #[test]
    fn test_format_float_minimal_form() {
        assert_eq!(format_float(2.0).unwrap(), "2");
        assert_eq!(format_float(0.1).unwrap(), "0.1");
        assert_eq!(format_float(1.0 + 0.1).unwrap(), "1.1");
        assert_eq!(format_float(2.0 + 0.1).unwrap(), "2.1");
        assert_eq!(format_float(-3.25).unwrap(), "-3.25");
        assert_eq!(format_float(1e21).unwrap(), "1000000000000000000000");
        assert_eq!(format_float(0.0000001).unwrap(), "0.0000001");
    }

    #[test]
    fn test_format_float_zero_has_no_sign() {
        assert_eq!(format_float(-0.0).unwrap(), "0");
        assert_eq!(format_float(1e308 + -1e308).unwrap(), "0");
    }

    #[test]
    fn test_format_float_non_finite() {
        assert_eq!(format_float(f64::INFINITY), Err(NumericError::OutOfRange));
        assert_eq!(format_float(f64::NEG_INFINITY), Err(NumericError::OutOfRange));
        assert_eq!(format_float(f64::NAN), Err(NumericError::OutOfRange));
        assert_eq!(format_float(1e308 + 1e308), Err(NumericError::OutOfRange));
    }

    #[test]
    fn test_canonical_float() {
        assert!(is_canonical_float(b"0.5"));
        assert!(is_canonical_float(b"-1.25"));
        assert!(!is_canonical_float(b"1.50"));
        assert!(!is_canonical_float(b"1e3"));
        assert!(!is_canonical_float(b".5"));
        assert!(!is_canonical_float(b"bar"));
    }

    #[test]
    fn test_checked_increment() {
        assert_eq!(checked_increment(1, 2), Ok(3));
        assert_eq!(checked_increment(i64::MAX, 1), Err(NumericError::Overflow));
        assert_eq!(checked_increment(i64::MIN, -1), Err(NumericError::Overflow));
    }
}

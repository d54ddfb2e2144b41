//! Built-in coercion for text, numbers, booleans and durations

use crate::error::ConvertError;
use crate::value::Value;
use std::path::PathBuf;
use std::time::Duration;

impl Value for String {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl Value for PathBuf {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        *self = PathBuf::from(raw);
        Ok(())
    }
}

impl Value for bool {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        *self = parse_bool(raw).ok_or_else(|| ConvertError::Bool(raw.to_string()))?;
        Ok(())
    }
}

impl Value for Duration {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        *self = match raw {
            "0" => Duration::ZERO,
            _ => humantime::parse_duration(raw)?,
        };
        Ok(())
    }
}

/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their `0`/`f`/`false` counterparts.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// An integer literal split into its sign, radix and bare digits.
struct IntLiteral<'a> {
    sign: Option<char>,
    radix: u32,
    digits: std::borrow::Cow<'a, str>,
}

/// Parse the shape of an integer literal.
///
/// `0x`, `0o` and `0b` select hex, octal and binary, a bare leading `0` means
/// octal, and `_` may separate digits.
fn int_literal<'a>(raw: &'a str, kind: &'static str) -> Result<IntLiteral<'a>, ConvertError> {
    let syntax = || ConvertError::IntSyntax {
        kind,
        value: raw.to_string(),
    };

    let (sign, unsigned) = match raw.chars().next() {
        Some(c @ ('+' | '-')) => (Some(c), &raw[1..]),
        _ => (None, raw),
    };

    let bytes = unsigned.as_bytes();
    let (radix, body) = match bytes {
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'x') => (16, &unsigned[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'o') => (8, &unsigned[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'b') => (2, &unsigned[2..]),
        [b'0', _, ..] => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };

    if body.is_empty() || body.starts_with(['+', '-']) {
        return Err(syntax());
    }

    let digits = if body.contains('_') {
        if !underscores_ok(unsigned) {
            return Err(syntax());
        }
        std::borrow::Cow::Owned(body.replace('_', ""))
    } else {
        std::borrow::Cow::Borrowed(body)
    };

    Ok(IntLiteral {
        sign,
        radix,
        digits,
    })
}

/// Underscores must sit between digits, or directly after a base prefix.
fn underscores_ok(unsigned: &str) -> bool {
    let bytes = unsigned.as_bytes();
    let mut rest = bytes;
    let mut hex = false;
    // '^' start, '0' digit or prefix, '_' underscore, '!' anything else
    let mut saw = b'^';

    if let [b'0', p, tail @ ..] = bytes {
        if matches!(p.to_ascii_lowercase(), b'b' | b'o' | b'x') {
            hex = p.eq_ignore_ascii_case(&b'x');
            saw = b'0';
            rest = tail;
        }
    }

    for &b in rest {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = b'0';
            continue;
        }
        if b == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
            continue;
        }
        if saw == b'_' {
            return false;
        }
        saw = b'!';
    }
    saw != b'_'
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Value for $t {
            fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
                let kind = stringify!($t);
                let literal = int_literal(raw, kind)?;
                let digits = match literal.sign {
                    Some('-') => std::borrow::Cow::Owned(format!("-{}", literal.digits)),
                    _ => literal.digits,
                };
                *self = <$t>::from_str_radix(&digits, literal.radix).map_err(|source| {
                    ConvertError::Int { kind, value: raw.to_string(), source }
                })?;
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl Value for $t {
            fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
                let kind = stringify!($t);
                let literal = int_literal(raw, kind)?;
                if literal.sign.is_some() {
                    return Err(ConvertError::IntSyntax { kind, value: raw.to_string() });
                }
                *self = <$t>::from_str_radix(&literal.digits, literal.radix).map_err(|source| {
                    ConvertError::Int { kind, value: raw.to_string(), source }
                })?;
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Value for $t {
            fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
                let value = raw.parse::<$t>().map_err(|source| ConvertError::Float {
                    value: raw.to_string(),
                    source,
                })?;
                if value.is_infinite() && !is_infinity(raw) {
                    return Err(ConvertError::FloatRange { value: raw.to_string() });
                }
                *self = value;
                Ok(())
            }
        }
    )*};
}

/// Whether `raw` spells infinity itself rather than overflowing to it.
fn is_infinity(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::convert;

    fn coerced<T: Value + Default>(raw: &str) -> Result<T, ConvertError> {
        let mut value = T::default();
        convert(&mut value, raw)?;
        Ok(value)
    }

    #[test]
    fn test_string_verbatim() {
        assert_eq!(coerced::<String>(" spaced, value ").unwrap(), " spaced, value ");
        assert_eq!(coerced::<String>("").unwrap(), "");
    }

    #[test]
    fn test_signed_decimal() {
        assert_eq!(coerced::<i32>("42").unwrap(), 42);
        assert_eq!(coerced::<i64>("-42").unwrap(), -42);
        assert_eq!(coerced::<i8>("+12").unwrap(), 12);
    }

    #[test]
    fn test_signed_bases() {
        assert_eq!(coerced::<i32>("0x1F").unwrap(), 31);
        assert_eq!(coerced::<i32>("-0b101").unwrap(), -5);
        assert_eq!(coerced::<i32>("0o17").unwrap(), 15);
        assert_eq!(coerced::<i32>("017").unwrap(), 15);
        assert_eq!(coerced::<i32>("0").unwrap(), 0);
        assert_eq!(coerced::<i32>("1_000_000").unwrap(), 1_000_000);
        assert_eq!(coerced::<i32>("0x_ff").unwrap(), 255);
    }

    #[test]
    fn test_int_syntax_errors() {
        for raw in ["", "-", "abc", "0x", "1__0", "_1", "1_", "08", "--1", "0x-1"] {
            assert!(coerced::<i64>(raw).is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn test_bit_width_is_enforced() {
        assert_eq!(coerced::<i8>("127").unwrap(), 127);
        assert!(matches!(coerced::<i8>("128"), Err(ConvertError::Int { kind: "i8", .. })));
        assert!(coerced::<u16>("65536").is_err());
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert_eq!(coerced::<u32>("0xff").unwrap(), 255);
        assert!(matches!(coerced::<u32>("-1"), Err(ConvertError::IntSyntax { .. })));
        assert!(matches!(coerced::<u32>("+1"), Err(ConvertError::IntSyntax { .. })));
    }

    #[test]
    fn test_bool_literals() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(coerced::<bool>(raw).unwrap());
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!coerced::<bool>(raw).unwrap());
        }
        assert!(matches!(coerced::<bool>("yes"), Err(ConvertError::Bool(_))));
    }

    #[test]
    fn test_float() {
        assert_eq!(coerced::<f64>("3.25").unwrap(), 3.25);
        assert_eq!(coerced::<f32>("-1e3").unwrap(), -1000.0);
        assert!(matches!(coerced::<f64>("x"), Err(ConvertError::Float { .. })));
    }

    #[test]
    fn test_float_out_of_range() {
        assert!(matches!(coerced::<f32>("1e40"), Err(ConvertError::FloatRange { .. })));
        assert!(matches!(coerced::<f64>("1e400"), Err(ConvertError::FloatRange { .. })));
        assert!(matches!(coerced::<f64>("-1e400"), Err(ConvertError::FloatRange { .. })));
        assert_eq!(coerced::<f32>("3.4e38").unwrap(), 3.4e38);
        assert!(coerced::<f64>("1e300").unwrap().is_finite());
    }

    #[test]
    fn test_float_explicit_infinity() {
        assert_eq!(coerced::<f32>("inf").unwrap(), f32::INFINITY);
        assert_eq!(coerced::<f64>("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(coerced::<f64>("+INF").unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_duration() {
        assert_eq!(coerced::<Duration>("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(coerced::<Duration>("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(coerced::<Duration>("0").unwrap(), Duration::ZERO);
        assert!(matches!(coerced::<Duration>("soon"), Err(ConvertError::Duration(_))));
    }

    #[test]
    fn test_duration_fractional_units() {
        assert_eq!(coerced::<Duration>("1.5h").unwrap(), Duration::from_secs(5400));
        assert!(coerced::<Duration>("-1s").is_err());
    }

    #[test]
    fn test_path() {
        assert_eq!(coerced::<PathBuf>("/etc/app").unwrap(), PathBuf::from("/etc/app"));
    }
}

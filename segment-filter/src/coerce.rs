//! Type coercion between filter values and event properties
//!
//! Filter values always arrive as text. Before an equality test the text is cast
//! to the runtime kind of the event property it is compared with, and ordering
//! conditions compare numeric forms. Failed numeric parses yield NaN, which is
//! never equal to anything and never ordered, so a failed coercion quietly makes
//! the comparison false.

use crate::types::{PropertyValue, ValueKind};

/// Cast filter text to a value comparable with a property of kind `target`
///
/// * `Boolean`: `"true"`/`"false"` in any letter case, otherwise the text unchanged
/// * `Number`: standard numeric parsing, NaN for non-numeric text
/// * `BigInt`: integer parsing, NaN for non-integer text
/// * anything else: the text unchanged
pub fn cast_to(value: &str, target: ValueKind) -> PropertyValue {
    match target {
        ValueKind::Boolean => match value.to_lowercase().as_str() {
            "true" => PropertyValue::Boolean(true),
            "false" => PropertyValue::Boolean(false),
            _ => PropertyValue::String(value.to_owned()),
        },
        ValueKind::Number => PropertyValue::Number(parse_number(value)),
        ValueKind::BigInt => parse_bigint(value)
            .map(PropertyValue::BigInt)
            .unwrap_or(PropertyValue::Number(f64::NAN)),
        ValueKind::String
        | ValueKind::Undefined
        | ValueKind::Null
        | ValueKind::Array
        | ValueKind::Object => PropertyValue::String(value.to_owned()),
    }
}

/// Equality without implicit conversion: both sides must be the same kind
///
/// Arrays and objects compare by identity in the source data model, so a value
/// produced by [`cast_to`] is never equal to one.
pub fn strict_equals(left: &PropertyValue, right: &PropertyValue) -> bool {
    match (left, right) {
        (PropertyValue::Null, PropertyValue::Null) => true,
        (PropertyValue::Boolean(a), PropertyValue::Boolean(b)) => a == b,
        (PropertyValue::Number(a), PropertyValue::Number(b)) => a == b,
        (PropertyValue::BigInt(a), PropertyValue::BigInt(b)) => a == b,
        (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
        _ => false,
    }
}

/// Parse text the way a dynamic numeric conversion does
///
/// Surrounding whitespace is ignored and empty text is zero. Accepts decimal
/// literals with optional sign, fraction and exponent, the `Infinity` words and
/// unsigned `0x`/`0o`/`0b` literals. Everything else is NaN; notably `inf`,
/// `nan` and digit separators are rejected.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    if !is_decimal_literal(trimmed) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse text as a large integer; `None` when it is not an integer literal
pub fn parse_bigint(text: &str) -> Option<i128> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0);
    }

    if let Some((radix, digits)) = split_radix_prefix(trimmed) {
        return i128::from_str_radix(digits, radix).ok();
    }
    trimmed.parse::<i128>().ok()
}

/// Render a number in shortest round-trip form
///
/// Magnitudes from 1e-6 up to 1e21 print positionally, others in exponent form
/// with an explicit exponent sign (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // covers -0 as well
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

fn split_radix_prefix(text: &str) -> Option<(u32, &str)> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let (radix, digits) = split_radix_prefix(text)?;
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0_f64;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(digit) => value = value * radix as f64 + digit as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text)
}

fn all_digits(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal_literal(text: &str) -> bool {
    let body = strip_sign(text);
    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return false;
    }
    if !all_digits(integer) || !all_digits(fraction) {
        return false;
    }

    match exponent.map(strip_sign) {
        None => true,
        Some(digits) => !digits.is_empty() && all_digits(digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_decimal() {
        assert_eq!(parse_number("123"), 123.0);
        assert_eq!(parse_number("123.1"), 123.1);
        assert_eq!(parse_number("  -4.5e2 "), -450.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("5."), 5.0);
        assert_eq!(parse_number("+7"), 7.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
    }

    #[test]
    fn test_parse_number_special_forms() {
        assert_eq!(parse_number("0x1F"), 31.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        for text in ["abc", "12abc", "inf", "nan", "NaN", "1_000", "1e", "e5", ".", "-0x10", "0x", "1.2.3"] {
            assert!(parse_number(text).is_nan(), "expected NaN for {:?}", text);
        }
    }

    #[test]
    fn test_parse_bigint() {
        assert_eq!(parse_bigint("9007199254740993"), Some(9_007_199_254_740_993));
        assert_eq!(parse_bigint(" -12 "), Some(-12));
        assert_eq!(parse_bigint("0xff"), Some(255));
        assert_eq!(parse_bigint(""), Some(0));
        assert_eq!(parse_bigint("1.5"), None);
        assert_eq!(parse_bigint("ten"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(123.1), "123.1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_cast_to_boolean() {
        assert_eq!(cast_to("true", ValueKind::Boolean), PropertyValue::Boolean(true));
        assert_eq!(cast_to("True", ValueKind::Boolean), PropertyValue::Boolean(true));
        assert_eq!(cast_to("FALSE", ValueKind::Boolean), PropertyValue::Boolean(false));
        assert_eq!(cast_to("yes", ValueKind::Boolean), PropertyValue::from("yes"));
    }

    #[test]
    fn test_cast_to_numeric_kinds() {
        assert_eq!(cast_to("123", ValueKind::Number), PropertyValue::Number(123.0));
        assert_eq!(cast_to("42", ValueKind::BigInt), PropertyValue::BigInt(42));
        assert!(matches!(cast_to("4.2", ValueKind::BigInt), PropertyValue::Number(n) if n.is_nan()));
        assert!(matches!(cast_to("abc", ValueKind::Number), PropertyValue::Number(n) if n.is_nan()));
    }

    #[test]
    fn test_cast_to_passthrough() {
        assert_eq!(cast_to("x", ValueKind::String), PropertyValue::from("x"));
        assert_eq!(cast_to("x", ValueKind::Object), PropertyValue::from("x"));
        assert_eq!(cast_to("x", ValueKind::Undefined), PropertyValue::from("x"));
    }

    #[test]
    fn test_strict_equals() {
        assert!(strict_equals(&PropertyValue::Number(1.0), &PropertyValue::Number(1.0)));
        assert!(!strict_equals(&PropertyValue::Number(f64::NAN), &PropertyValue::Number(f64::NAN)));
        assert!(!strict_equals(&PropertyValue::Boolean(true), &PropertyValue::from("true")));
        assert!(!strict_equals(&PropertyValue::BigInt(1), &PropertyValue::Number(1.0)));
        assert!(strict_equals(&PropertyValue::Null, &PropertyValue::Null));

        let array = PropertyValue::Array(vec![]);
        assert!(!strict_equals(&array, &array.clone()));
    }
}

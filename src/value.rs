use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// A materialised option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
    Hash(BTreeMap<String, String>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Value::Hash(pairs) => Some(pairs),
            _ => None,
        }
    }
}

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9]+(kb|k|mb|m|gb|g|tb|t|pb|p|b)?$").unwrap()
});

fn qualifier_multiplier(qualifier: &str) -> u64 {
    match qualifier {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        "t" | "tb" => 1024u64.pow(4),
        "p" | "pb" => 1024u64.pow(5),
        _ => 0,
    }
}

/// Convert a size expression (`1kb`, `2m`, `5`) to bytes. Qualifiers are
/// powers of 1024 and case-insensitive. Returns `None` when the expression
/// does not match the grammar or overflows.
pub fn convert_to_byte(value: &str) -> Option<u64> {
    let lower = value.to_ascii_lowercase();
    if !SIZE_RE.is_match(&lower) {
        return None;
    }

    let digits_end = lower
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lower.len());
    let number: u64 = lower[..digits_end].parse().ok()?;
    number.checked_mul(qualifier_multiplier(&lower[digits_end..]))
}

/// Convert a time expression in seconds (decimal fractions allowed) to
/// milliseconds. Returns `None` for anything that is not a plain decimal.
pub fn time_to_ms(value: &str) -> Option<i64> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let seconds: f64 = value.parse().ok()?;
    Some((seconds * 1000.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_plain_bytes() {
        assert_eq!(convert_to_byte("5"), Some(5));
        assert_eq!(convert_to_byte("5b"), Some(5));
    }

    #[test]
    fn size_qualifiers() {
        assert_eq!(convert_to_byte("1kb"), Some(1024));
        assert_eq!(convert_to_byte("1k"), Some(1024));
        assert_eq!(convert_to_byte("2m"), Some(2_097_152));
        assert_eq!(convert_to_byte("3GB"), Some(3 * 1024 * 1024 * 1024));
        assert_eq!(convert_to_byte("1t"), Some(1024u64.pow(4)));
        assert_eq!(convert_to_byte("1pb"), Some(1024u64.pow(5)));
    }

    #[test]
    fn size_case_insensitive() {
        assert_eq!(convert_to_byte("7KB"), Some(7 * 1024));
        assert_eq!(convert_to_byte("7Kb"), Some(7 * 1024));
    }

    #[test]
    fn size_invalid() {
        assert_eq!(convert_to_byte(""), None);
        assert_eq!(convert_to_byte("kb"), None);
        assert_eq!(convert_to_byte("1.5kb"), None);
        assert_eq!(convert_to_byte("1kbkb"), None);
        assert_eq!(convert_to_byte("-1"), None);
        assert_eq!(convert_to_byte("1 kb"), None);
    }

    #[test]
    fn size_overflow() {
        assert_eq!(convert_to_byte("99999999999999999999pb"), None);
        assert_eq!(convert_to_byte("18446744073709551615pb"), None);
    }

    #[test]
    fn time_whole_seconds() {
        assert_eq!(time_to_ms("60"), Some(60_000));
        assert_eq!(time_to_ms("0"), Some(0));
    }

    #[test]
    fn time_fractional_seconds() {
        assert_eq!(time_to_ms("2.5"), Some(2500));
        assert_eq!(time_to_ms("0.1"), Some(100));
    }

    #[test]
    fn time_invalid() {
        assert_eq!(time_to_ms(""), None);
        assert_eq!(time_to_ms("abc"), None);
        assert_eq!(time_to_ms("1s"), None);
        assert_eq!(time_to_ms("-1"), None);
        assert_eq!(time_to_ms("1.2.3"), None);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Int(7).as_str(), None);
    }
}

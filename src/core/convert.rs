//! Conversion rules between [`Value`] members and Rust target types.
//!
//! Every rule is invariant-culture: `.` is the only decimal separator, booleans
//! read `true`/`false` in any case, and date/time text is ISO-8601. Failures are
//! reported as [`ConvertError`]; `Bean::get` collapses them to a default.

use crate::core::enums::BeanEnum;
use crate::core::value::{DATETIME_FORMAT, Value, ValueTag};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// A stored value that cannot be read as the requested type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {from} value '{text}' to {target}")]
pub struct ConvertError {
    pub from: ValueTag,
    pub target: &'static str,
    pub text: String,
}

impl ConvertError {
    pub fn new(value: &Value, target: &'static str) -> Self {
        Self {
            from: value.tag(),
            target,
            text: value.to_invariant_string(),
        }
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Types that can be read out of a property bag.
pub trait FromValue: Sized {
    /// Converts `value`, returning it unchanged when its member already matches.
    fn from_value(value: &Value) -> ConvertResult<Self>;
}

/// Types that can be written into a property bag.
///
/// `None` means "no value": writing it removes the property.
pub trait IntoValue {
    fn into_value(self) -> Option<Value>;
}

// ============================================================================
// Scalar rules
// ============================================================================

fn to_i64(value: &Value, target: &'static str) -> ConvertResult<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) => {
            let t = f.trunc();
            if t.is_finite() && t >= i64::MIN as f64 && t < 9_223_372_036_854_775_808.0 {
                Ok(t as i64)
            } else {
                Err(ConvertError::new(value, target))
            }
        }
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ConvertError::new(value, target)),
        Value::DateTime(_) => Err(ConvertError::new(value, target)),
    }
}

fn to_f64(value: &Value) -> ConvertResult<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_invariant_f64(s).ok_or_else(|| ConvertError::new(value, "f64")),
        Value::DateTime(_) => Err(ConvertError::new(value, "f64")),
    }
}

fn parse_invariant_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn to_bool(value: &Value) -> ConvertResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Text(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if s.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(ConvertError::new(value, "bool"))
            }
        }
        Value::DateTime(_) => Err(ConvertError::new(value, "bool")),
    }
}

fn to_datetime(value: &Value, target: &'static str) -> ConvertResult<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Text(s) => parse_invariant_datetime(s).ok_or_else(|| ConvertError::new(value, target)),
        _ => Err(ConvertError::new(value, target)),
    }
}

/// Accepts RFC-3339 (normalised to UTC), `T`- or space-separated local
/// timestamps with optional fraction, and bare dates.
fn parse_invariant_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in [DATETIME_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Reads an enum from the textual form of `value`.
///
/// Symbols match case-insensitively; a non-negative integer selects by ordinal.
pub fn enum_from_value<E: BeanEnum>(value: &Value) -> ConvertResult<E> {
    let text = value.to_invariant_string();
    E::parse_symbol(&text).ok_or_else(|| ConvertError::new(value, std::any::type_name::<E>()))
}

// ============================================================================
// FromValue impls
// ============================================================================

impl FromValue for Value {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_i64(value, "i64")
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> ConvertResult<Self> {
                    let wide = to_i64(value, stringify!($ty))?;
                    <$ty>::try_from(wide).map_err(|_| ConvertError::new(value, stringify!($ty)))
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Option<Value> {
                    Some(Value::Integer(i64::from(self)))
                }
            }
        )*
    };
}

narrow_integer!(i32, i16, i8, u32, u16, u8);

impl FromValue for f64 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_f64(value)
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_f64(value)
            .map(|f| f as f32)
            .map_err(|_| ConvertError::new(value, "f32"))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_bool(value)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Ok(other.to_invariant_string()),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_datetime(value, "NaiveDateTime")
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_datetime(value, "DateTime<Utc>").map(|dt| dt.and_utc())
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        to_datetime(value, "NaiveDate").map(|dt| dt.date())
    }
}

// ============================================================================
// IntoValue impls
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Option<Value> {
        Some(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Option<Value> {
        Some(Value::Integer(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Option<Value> {
        Some(Value::Float(self))
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Option<Value> {
        Some(Value::Float(f64::from(self)))
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Option<Value> {
        Some(Value::Boolean(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Option<Value> {
        Some(Value::Text(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Option<Value> {
        Some(Value::Text(self.to_string()))
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Option<Value> {
        Some(Value::DateTime(self))
    }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(self) -> Option<Value> {
        Some(Value::DateTime(self.naive_utc()))
    }
}

impl IntoValue for NaiveDate {
    fn into_value(self) -> Option<Value> {
        Some(Value::DateTime(self.and_time(NaiveTime::MIN)))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Option<Value> {
        self.and_then(IntoValue::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_numbers() {
        assert_eq!(i64::from_value(&Value::from("42")), Ok(42));
        assert_eq!(i64::from_value(&Value::from(" -7 ")), Ok(-7));
        assert_eq!(f64::from_value(&Value::from("2.5e2")), Ok(250.0));
        assert!(f64::from_value(&Value::from("1,5")).is_err());
        assert!(i64::from_value(&Value::from("4.2")).is_err());
    }

    #[test]
    fn test_float_truncates() {
        assert_eq!(i64::from_value(&Value::Float(3.9)), Ok(3));
        assert_eq!(i64::from_value(&Value::Float(-3.9)), Ok(-3));
        assert!(i64::from_value(&Value::Float(f64::NAN)).is_err());
        assert!(i64::from_value(&Value::Float(1e30)).is_err());
    }

    #[test]
    fn test_narrowing_overflow_fails() {
        assert_eq!(u8::from_value(&Value::Integer(255)), Ok(255));
        assert!(u8::from_value(&Value::Integer(256)).is_err());
        assert!(u32::from_value(&Value::Integer(-1)).is_err());
        assert_eq!(i32::from_value(&Value::from("12")), Ok(12));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(bool::from_value(&Value::from("TRUE")), Ok(true));
        assert_eq!(bool::from_value(&Value::Integer(0)), Ok(false));
        assert_eq!(bool::from_value(&Value::Float(0.5)), Ok(true));
        assert!(bool::from_value(&Value::from("yes")).is_err());
        assert_eq!(i64::from_value(&Value::Boolean(true)), Ok(1));
    }

    #[test]
    fn test_strings() {
        assert_eq!(String::from_value(&Value::Integer(42)), Ok("42".to_string()));
        assert_eq!(String::from_value(&Value::Boolean(false)), Ok("False".to_string()));
        assert_eq!(String::from_value(&Value::Float(0.1)), Ok("0.1".to_string()));
    }

    #[test]
    fn test_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap();
        for text in [
            "2023-12-31T23:59:01",
            "2023-12-31 23:59:01",
            "2023-12-31T23:59:01Z",
            "2024-01-01T01:59:01+02:00",
        ] {
            assert_eq!(NaiveDateTime::from_value(&Value::from(text)), Ok(expected), "{}", text);
        }

        let midnight = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(NaiveDateTime::from_value(&Value::from("2023-12-31")), Ok(midnight));
        assert!(NaiveDateTime::from_value(&Value::from("31/12/2023")).is_err());
        assert!(NaiveDateTime::from_value(&Value::Integer(0)).is_err());
        assert!(i64::from_value(&Value::DateTime(expected)).is_err());
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Some(5i64).into_value(), Some(Value::Integer(5)));
        assert_eq!(None::<i64>.into_value(), None);
        assert_eq!(7u16.into_value(), Some(Value::Integer(7)));
    }

    #[test]
    fn test_error_reports_source() {
        let err = i64::from_value(&Value::from("abc")).unwrap_err();
        assert_eq!(err.from, ValueTag::Text);
        assert_eq!(err.target, "i64");
        assert_eq!(err.to_string(), "cannot convert TEXT value 'abc' to i64");
    }
}

//! Carrier values accepted by input columns.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::sql_time::SqlTime;

/// A value offered to [`InputColumn::set_value`](crate::InputColumn::set_value).
///
/// The receiving column decides whether the value fits its representation
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindValue<'a> {
    /// Exact integer.
    Int(i128),
    /// Real number.
    Real(f64),
    /// UTF-8 text.
    Text(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// Temporal record.
    Time(SqlTime),
}

impl BindValue<'_> {
    /// Short name of the carrier form, used in mismatch errors.
    pub fn form(&self) -> &'static str {
        match self {
            BindValue::Int(_) => "integer",
            BindValue::Real(_) => "real",
            BindValue::Text(_) => "text",
            BindValue::Bytes(_) => "bytes",
            BindValue::Time(_) => "time",
        }
    }

    /// Byte view of text and byte carriers.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BindValue::Text(s) => Some(s.as_bytes()),
            BindValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for BindValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Int(i) => write!(f, "{} {}", self.form(), i),
            BindValue::Real(r) => write!(f, "{} {}", self.form(), r),
            BindValue::Text(s) => write!(f, "{} ({} bytes)", self.form(), s.len()),
            BindValue::Bytes(b) => write!(f, "{} ({} bytes)", self.form(), b.len()),
            BindValue::Time(t) => write!(f, "{} {}", self.form(), t),
        }
    }
}

macro_rules! impl_from_for_bind_value {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for BindValue<'_> {
                fn from(v: $t) -> Self {
                    BindValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_bind_value!(Int, i8, i16, i32, i64, i128, u8, u16, u32, u64);
impl_from_for_bind_value!(Real, f32, f64);
impl_from_for_bind_value!(Time, SqlTime, NaiveDate, NaiveDateTime, NaiveTime);

impl From<bool> for BindValue<'_> {
    fn from(v: bool) -> Self {
        BindValue::Int(i128::from(v))
    }
}

impl<'a> From<&'a str> for BindValue<'a> {
    fn from(v: &'a str) -> Self {
        BindValue::Text(v)
    }
}

impl<'a> From<&'a String> for BindValue<'a> {
    fn from(v: &'a String) -> Self {
        BindValue::Text(v)
    }
}

impl<'a> From<&'a [u8]> for BindValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        BindValue::Bytes(v)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for BindValue<'a> {
    fn from(v: &'a [u8; N]) -> Self {
        BindValue::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_carriers_are_exact() {
        assert_eq!(BindValue::from(u64::MAX), BindValue::Int(u64::MAX as i128));
        assert_eq!(BindValue::from(-3i8), BindValue::Int(-3));
        assert_eq!(BindValue::from(true), BindValue::Int(1));
    }

    #[test]
    fn test_byte_views() {
        assert_eq!(BindValue::from("abc").as_bytes(), Some(&b"abc"[..]));
        assert_eq!(BindValue::from(b"\x00\x01").as_bytes(), Some(&[0u8, 1][..]));
        assert_eq!(BindValue::from(1.5).as_bytes(), None);
    }

    #[test]
    fn test_display_names_form() {
        assert_eq!(BindValue::Real(3.5).to_string(), "real 3.5");
        assert_eq!(BindValue::Text("hello").to_string(), "text (5 bytes)");
    }
}

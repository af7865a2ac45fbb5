//! Coercion of raw field text into caller-requested types.
//!
//! Every read operation on [`KeywordReader`] ends by turning a raw substring
//! into a typed value. Rather than accepting an arbitrary callable, the
//! supported coercions form a closed, enumerable set expressed through the
//! [`FromField`] trait: boolean synonym sets, the primitive integer and float
//! types, and string passthrough. Callers can register their own coercions by
//! implementing `FromField` for their types.
//!
//! # Example
//!
//! ```
//! use keyquill::reader::FromField;
//!
//! assert_eq!(bool::from_field("Yes").unwrap(), true);
//! assert_eq!(bool::from_field("OFF").unwrap(), false);
//! assert_eq!(i64::from_field("42").unwrap(), 42);
//! assert!(f64::from_field("not a number").is_err());
//! ```
//!
//! [`KeywordReader`]: crate::reader::KeywordReader

use super::error::ReadError;

/// A type that can be constructed from the raw text of a keyword field.
///
/// Implementations must be total over their failure modes: any input that
/// does not coerce cleanly returns [`ReadError::Coercion`] naming the
/// offending text and the target type.
pub trait FromField: Sized {
    /// Whether this target accepts multi-line continuation blocks.
    ///
    /// Only string-like targets set this to `true`. When a scalar read finds
    /// a continuation sigil (`^`, `|`, `>`) as the entire value text, it
    /// resolves the block before coercion for multiline targets, and treats
    /// the sigil as ordinary value text otherwise.
    const MULTILINE: bool = false;

    /// Name of the target type, used in error messages.
    const TARGET: &'static str;

    /// Coerce raw field text into this type.
    fn from_field(raw: &str) -> Result<Self, ReadError>;
}

/// Boolean coercion over case-insensitive synonym sets.
///
/// `true`, `yes`, and `on` coerce to `true`; `false`, `no`, and `off`
/// coerce to `false`. Any other token is a coercion error.
impl FromField for bool {
    const TARGET: &'static str = "bool";

    fn from_field(raw: &str) -> Result<Self, ReadError> {
        const TRUTHY: [&str; 3] = ["true", "yes", "on"];
        const FALSY: [&str; 3] = ["false", "no", "off"];

        if TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
            Ok(true)
        } else if FALSY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
            Ok(false)
        } else {
            Err(ReadError::Coercion {
                value: raw.to_string(),
                target: Self::TARGET,
            })
        }
    }
}

/// String passthrough. The only target eligible for continuation blocks.
impl FromField for String {
    const MULTILINE: bool = true;
    const TARGET: &'static str = "String";

    fn from_field(raw: &str) -> Result<Self, ReadError> {
        Ok(raw.to_string())
    }
}

macro_rules! from_field_via_from_str {
    ($($ty:ty),+) => {
        $(
            impl FromField for $ty {
                const TARGET: &'static str = stringify!($ty);

                fn from_field(raw: &str) -> Result<Self, ReadError> {
                    raw.parse::<$ty>().map_err(|_| ReadError::Coercion {
                        value: raw.to_string(),
                        target: Self::TARGET,
                    })
                }
            }
        )+
    };
}

from_field_via_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

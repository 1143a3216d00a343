//! Coercion of scalar text into typed values.

/// Types that can be read from a scalar's text.
///
/// Returning `None` makes the typed accessors fall back to their default.
pub trait FromScalar: Sized {
    fn from_scalar(raw: &str) -> Option<Self>;
}

impl FromScalar for String {
    fn from_scalar(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

impl FromScalar for bool {
    fn from_scalar(raw: &str) -> Option<Self> {
        match raw {
            "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
                Some(true)
            }
            "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off"
            | "OFF" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                fn from_scalar(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_scalar_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

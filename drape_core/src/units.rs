//! # Unit Types
//!
//! Lightweight newtype wrappers for the measurements the shop works in. They
//! serialize as bare numbers so project files stay readable.
//!
//! - Length: centimeters (cm), as measured on site
//! - Area: square centimeters (cm²) and 才 ("tsai"), the traditional unit
//!   fabric is priced by: 1 才 = 30.3 cm × 30.3 cm = 918.09 cm²
//!
//! ## Example
//!
//! ```rust
//! use drape_core::units::{Centimeters, Tsai};
//!
//! let area = Centimeters(100.0) * Centimeters(150.0);
//! let tsai: Tsai = area.into();
//! assert_eq!(tsai.rounded().0, 16.34);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Square centimeters per 才. Fixed by the trade, never configurable.
pub const CM2_PER_TSAI: f64 = 918.09;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl Mul for Centimeters {
    type Output = SqCm;
    fn mul(self, rhs: Self) -> SqCm {
        SqCm(self.0 * rhs.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCm(pub f64);

/// Area in 才
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tsai(pub f64);

impl From<SqCm> for Tsai {
    /// Non-positive (or NaN) areas convert to zero.
    fn from(area: SqCm) -> Self {
        if area.0 > 0.0 {
            Tsai(area.0 / CM2_PER_TSAI)
        } else {
            Tsai(0.0)
        }
    }
}

impl From<Tsai> for SqCm {
    fn from(tsai: Tsai) -> Self {
        SqCm(tsai.0 * CM2_PER_TSAI)
    }
}

impl Tsai {
    /// Round to the two decimals shown on quotes.
    pub fn rounded(self) -> Self {
        Tsai(round_to(self.0, 2))
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(SqCm);
impl_arithmetic!(Tsai);

// ============================================================================
// Rounding and Money Display
// ============================================================================

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Format an amount as a rounded integer with thousands separators
/// (e.g. `8470.4` -> `"8,470"`).
pub fn format_currency(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a number for display without trailing zeros (`150.0` -> `"150"`,
/// `12.5` -> `"12.5"`).
pub fn format_plain(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_tsai() {
        let area = Centimeters(30.3) * Centimeters(30.3);
        let tsai: Tsai = area.into();
        assert!((tsai.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_and_negative_area_is_zero_tsai() {
        assert_eq!(Tsai::from(SqCm(0.0)).0, 0.0);
        assert_eq!(Tsai::from(SqCm(-50.0)).0, 0.0);
        assert_eq!(Tsai::from(SqCm(f64::NAN)).0, 0.0);
    }

    #[test]
    fn test_tsai_rounding() {
        let tsai: Tsai = SqCm(15000.0).into();
        assert_eq!(tsai.rounded(), Tsai(16.34));
    }

    #[test]
    fn test_arithmetic() {
        let a = Tsai(10.0);
        let b = Tsai(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(999.4), "999");
        assert_eq!(format_currency(8470.0), "8,470");
        assert_eq!(format_currency(1234567.5), "1,234,568");
        assert_eq!(format_currency(f64::NAN), "0");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(150.0), "150");
        assert_eq!(format_plain(12.5), "12.5");
        assert_eq!(format_plain(16.34), "16.34");
    }

    #[test]
    fn test_serialization() {
        let cm = Centimeters(120.5);
        let json = serde_json::to_string(&cm).unwrap();
        assert_eq!(json, "120.5");

        let roundtrip: Centimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(cm, roundtrip);
    }
}

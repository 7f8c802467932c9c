//! Choropleth color scale.
//!
//! Values are mapped linearly onto a two-point gradient, each RGB channel
//! interpolated independently and rounded to the nearest integer.

use crate::error::DataError;
use crate::models::ConsumptionRange;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || DataError::InvalidFormat(format!("invalid color {:?}", s));
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Lightest color, used at the minimum.
pub const DEFAULT_LOW: Rgb = Rgb::new(0xff, 0xf5, 0xeb);
/// Darkest color, used at the maximum.
pub const DEFAULT_HIGH: Rgb = Rgb::new(0x7f, 0x27, 0x04);
/// Neutral grey for municipalities without data.
pub const DEFAULT_NO_DATA: Rgb = Rgb::new(0xe0, 0xe0, 0xe0);

/// Two-point gradient plus the color for missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub low: Rgb,
    pub high: Rgb,
    pub no_data: Rgb,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
            no_data: DEFAULT_NO_DATA,
        }
    }
}

/// A labelled color for the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    pub value: f64,
    pub color: Rgb,
}

impl Gradient {
    /// Color for `value` within `[min, max]`.
    ///
    /// - absent or NaN value: `no_data`
    /// - `max <= min` or a non-finite bound: `low`
    /// - values outside the range are clamped to the end colors
    pub fn color_for(&self, value: Option<f64>, min: f64, max: f64) -> Rgb {
        let value = match value {
            Some(v) if !v.is_nan() => v,
            _ => return self.no_data,
        };
        let width = max - min;
        if !width.is_finite() || width <= 0.0 {
            return self.low;
        }
        self.low.lerp(self.high, (value - min) / width)
    }

    /// Color for `value` within a [`ConsumptionRange`].
    pub fn color_in(&self, value: Option<f64>, range: &ConsumptionRange) -> Rgb {
        self.color_for(value, range.min, range.max)
    }

    /// `steps` evenly spaced legend stops from `range.min` to `range.max`.
    ///
    /// Empty for an empty range; a single stop for a degenerate one.
    pub fn legend(&self, range: &ConsumptionRange, steps: usize) -> Vec<LegendStop> {
        if range.is_empty() || steps == 0 {
            return Vec::new();
        }
        if range.is_degenerate() || steps == 1 {
            return vec![LegendStop {
                value: range.min,
                color: self.color_in(Some(range.min), range),
            }];
        }
        (0..steps)
            .map(|i| {
                let value = range.min + range.width() * i as f64 / (steps - 1) as f64;
                LegendStop {
                    value,
                    color: self.color_in(Some(value), range),
                }
            })
            .collect()
    }
}

/// Color for a consumption value on the default gradient.
pub fn color_for_consumption(value: Option<f64>, min: f64, max: f64) -> Rgb {
    Gradient::default().color_for(value, min, max)
}

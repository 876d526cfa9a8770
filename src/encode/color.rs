use std::fmt;

use serde::{Serialize, Serializer};

pub const DEFAULT_DOMAIN_MAX: f64 = 100.0;

const NEUTRAL: [f64; 3] = [1.0, 1.0, 1.0];

/// `#rrggbb` color. Stable for a given input, so it doubles as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorToken {
    hex: String,
    rgb: [u8; 3],
}

impl ColorToken {
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Channel bytes, in red/green/blue order.
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    fn from_rgb(channels: [f64; 3]) -> Self {
        let rgb = channels.map(|x| (x * 255.0).round().clamp(0.0, 255.0) as u8);
        let hex = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
        ColorToken { hex, rgb }
    }
}

impl Serialize for ColorToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Heat-map color on a 0..=`domain_max` scale: low values are green, high
/// values red, and the midpoint fades to white.
///
/// Inputs outside the domain are not clamped; the hue keeps extrapolating and
/// only the final channels are clamped to a byte. A value or domain without a
/// defined hue (NaN, infinite, non-positive domain) maps to white.
pub fn color_of(value: f64, domain_max: f64) -> ColorToken {
    if !value.is_finite() || !domain_max.is_finite() || domain_max <= 0.0 {
        return ColorToken::from_rgb(NEUTRAL);
    }
    let half = domain_max / 2.0;
    let hue = ((domain_max - value) * 120.0 / domain_max).floor();
    let saturation = (value - half).abs() / half;
    ColorToken::from_rgb(hsv_to_rgb(hue, saturation, 1.0))
}

pub fn color_of_percent(value: f64) -> ColorToken {
    color_of(value, DEFAULT_DOMAIN_MAX)
}

fn hsv_to_rgb(hue: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let h = hue / 60.0;
    let floor = h.floor();
    let f = h - floor;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (floor as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/encode/color.rs"]
mod tests;

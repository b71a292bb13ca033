//! HSB color values and color-space conversion

use serde::{Deserialize, Serialize};

/// Color as hue (0-360), saturation (0-100) and brightness (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorDescriptor {
    /// Hue in degrees, `[0, 360)`
    pub h: f32,
    /// Saturation percentage
    pub s: f32,
    /// Brightness percentage
    pub b: f32,
}

impl ColorDescriptor {
    /// Neutral gray used for notes without a pitch class
    pub const NEUTRAL: ColorDescriptor = ColorDescriptor {
        h: 0.0,
        s: 0.0,
        b: 60.0,
    };

    /// Create a descriptor, wrapping the hue and clamping saturation/brightness to 0-100
    pub fn new(h: f32, s: f32, b: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: s.clamp(0.0, 100.0),
            b: b.clamp(0.0, 100.0),
        }
    }

    /// 8-bit RGB rendition
    pub fn to_rgb(self) -> [u8; 3] {
        let s = self.s / 100.0;
        let v = self.b / 100.0;
        let channel = |n: f32| {
            let k = (n + self.h / 60.0) % 6.0;
            let value = v * (1.0 - s * k.min(4.0 - k).clamp(0.0, 1.0));
            (value * 255.0).round().clamp(0.0, 255.0) as u8
        };
        [channel(5.0), channel(3.0), channel(1.0)]
    }
}

impl std::fmt::Display for ColorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsb({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.b)
    }
}

/// Wrap a hue in degrees into `[0, 360)`
pub fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Color as hue (0-360), saturation (0-100) and lightness (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    /// Hue in degrees
    pub h: f32,
    /// Saturation percentage
    pub s: f32,
    /// Lightness percentage
    pub l: f32,
}

/// Convert HSL to HSB, rounding every channel to a whole number
///
/// `s` and `l` are fractions in `[0, 1]`; the result uses percentages.
pub fn hsl_to_hsb(h: f32, s: f32, l: f32) -> ColorDescriptor {
    let b = l + s * l.min(1.0 - l);
    let sb = if b == 0.0 { 0.0 } else { 2.0 * (1.0 - l / b) };
    ColorDescriptor {
        h: wrap_hue(h.round()),
        s: (sb * 100.0).round(),
        b: (b * 100.0).round(),
    }
}

//! Chart series coloring.
//!
//! Series are discovered one at a time while a report is rendered, so colors
//! cannot be planned up front. [`ColorSequence`] hands out the two Tango
//! palettes first (light, then dark) and afterwards keeps splitting the gap
//! between each dark/light pair in halves, quarters, eighths, and so on.
//!
//! # Example
//!
//! ```
//! use solverforge_report::ColorSequence;
//!
//! let mut colors: ColorSequence = ColorSequence::new();
//! assert_eq!(colors.color_for("Hill Climbing"), "#8ae234");
//! assert_eq!(colors.color_for("Tabu Search"), "#fce94f");
//! assert_eq!(colors.color_for("Hill Climbing"), "#8ae234");
//! ```

mod sequence;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use sequence::{ColorSequence, SharedColorSequence};

/// Number of colors in each base palette.
pub const PALETTE_SIZE: usize = 5;

/// A fixed base palette.
pub type Palette = [RgbColor; PALETTE_SIZE];

/// Light Tango colors, handed out first.
pub const TANGO_LIGHT: Palette = [
    RgbColor::from_packed(0x8AE234), // chameleon
    RgbColor::from_packed(0xFCE94F), // butter
    RgbColor::from_packed(0x729FCF), // sky blue
    RgbColor::from_packed(0xE9B96E), // chocolate
    RgbColor::from_packed(0xAD7FA8), // plum
];

/// Dark Tango colors, handed out second and used as the blend floor afterwards.
pub const TANGO_DARK: Palette = [
    RgbColor::from_packed(0x73D216),
    RgbColor::from_packed(0xEDD400),
    RgbColor::from_packed(0x3465A4),
    RgbColor::from_packed(0xC17D11),
    RgbColor::from_packed(0x75507B),
];

const CHANNEL_MASKS: [u32; 3] = [0xFF0000, 0x00FF00, 0x0000FF];

/// How hex strings are rendered.
///
/// `Unpadded` matches what chart consumers have always received: a color such
/// as `0x012345` renders as `#12345`. `Padded` always emits six digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HexStyle {
    #[default]
    Unpadded,
    Padded,
}

/// A packed 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RgbColor(u32);

impl RgbColor {
    /// Creates a color from a packed `0xRRGGBB` value. Bits above 24 are dropped.
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed & 0xFF_FFFF)
    }

    /// Creates a color from its channels.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Renders the color as a lowercase CSS hex string.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::{HexStyle, RgbColor};
    ///
    /// let color = RgbColor::from_packed(0x012345);
    /// assert_eq!(color.to_hex(HexStyle::Unpadded), "#12345");
    /// assert_eq!(color.to_hex(HexStyle::Padded), "#012345");
    /// ```
    pub fn to_hex(self, style: HexStyle) -> String {
        match style {
            HexStyle::Unpadded => format!("#{:x}", self.0),
            HexStyle::Padded => format!("#{:06x}", self.0),
        }
    }

    /// Parses `#rrggbb`, `rrggbb` or `0xrrggbb` (case-insensitive).
    ///
    /// Returns `None` for non-hex input or values above `0xFFFFFF`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty()
            || digits.len() > 6
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self)
    }

    /// Blends each channel from `floor` toward `ceil` by `fraction`.
    ///
    /// Every channel is computed in its own byte position as
    /// `floor + floor(fraction * (ceil - floor))` and masked back to that byte.
    pub fn blend(floor: Self, ceil: Self, fraction: BlendFraction) -> Self {
        let numerator = i128::from(fraction.numerator);
        let denominator = i128::from(fraction.denominator);
        let packed = CHANNEL_MASKS.iter().fold(0u32, |acc, &mask| {
            let lo = i128::from(floor.0 & mask);
            let hi = i128::from(ceil.0 & mask);
            let channel = lo + (numerator * (hi - lo)).div_euclid(denominator);
            acc | (channel & i128::from(mask)) as u32
        });
        Self(packed)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// Interpolation weight `numerator / denominator` in `(0, 1)`.
///
/// The denominator is always a power of two and the numerator is odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl BlendFraction {
    /// Returns the fraction for the `t`-th blended tier (tier 2 is `t = 0`).
    ///
    /// The sequence is 1/2, 1/4, 3/4, 1/8, 3/8, 5/8, 7/8, 1/16, ...
    ///
    /// # Panics
    ///
    /// Overflows when `t >= 2^63 - 1`, which panics in debug builds. Sequence
    /// indices stay far below that: the deepest tier [`sequence_color`] asks
    /// for is `usize::MAX / 5 - 2`.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::BlendFraction;
    ///
    /// let f = BlendFraction::for_blend_tier(2);
    /// assert_eq!((f.numerator, f.denominator), (3, 4));
    /// ```
    pub fn for_blend_tier(t: u64) -> Self {
        let base = t + 1;
        let mut divisor = 2u64;
        while base >= divisor {
            divisor *= 2;
        }
        Self {
            numerator: base * 2 - divisor + 1,
            denominator: divisor,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Computes the color handed out at position `index` of the sequence.
///
/// This is pure: it depends only on the palettes and the index.
///
/// # Example
///
/// ```
/// use solverforge_report::color::{sequence_color, TANGO_DARK, TANGO_LIGHT};
///
/// assert_eq!(sequence_color(&TANGO_LIGHT, &TANGO_DARK, 0), TANGO_LIGHT[0]);
/// assert_eq!(sequence_color(&TANGO_LIGHT, &TANGO_DARK, 5), TANGO_DARK[0]);
/// ```
pub fn sequence_color(light: &Palette, dark: &Palette, index: usize) -> RgbColor {
    let palette_index = index % PALETTE_SIZE;
    let tier = index / PALETTE_SIZE;
    match tier {
        0 => light[palette_index],
        1 => dark[palette_index],
        _ => RgbColor::blend(
            dark[palette_index],
            light[palette_index],
            BlendFraction::for_blend_tier((tier - 2) as u64),
        ),
    }
}

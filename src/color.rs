//! Colors, palettes and blend modes for layer rendering.
//!
//! Colors parse from the same string forms the host configs use
//! (`#rgb`/`#rrggbb` hex, `rgb(...)`, `hsl(...)`) and carry straight
//! alpha. Palettes are ordered color stops; particles index into them
//! by their hue value.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::color::{Color, Palette};
//!
//! let gold: Color = "#f6c667".parse()?;
//! let palette = Palette::ember().with_stop(gold);
//! let stop = palette.pick(0.5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::ParseError;

/// An RGBA color with components in 0.0-1.0, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    // Theme colors shared by the built-in palettes.
    pub const PHOENIX_RED: Color = Color { r: 1.0, g: 0.419608, b: 0.419608, a: 1.0 };
    pub const QUANTUM_VIOLET: Color = Color { r: 0.658824, g: 0.333333, b: 0.968627, a: 1.0 };
    pub const RENAISSANCE_GOLD: Color = Color { r: 0.964706, g: 0.776471, b: 0.403922, a: 1.0 };
    pub const COSMIC_DAWN: Color = Color { r: 0.023529, g: 0.713726, b: 0.831373, a: 1.0 };

    /// Create an opaque color from RGB components (0.0-1.0).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components (0.0-1.0).
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit RGB components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create a color from hue/saturation/lightness.
    ///
    /// * `h` - hue in degrees (wraps at 360)
    /// * `s` - saturation, 0.0-1.0
    /// * `l` - lightness, 0.0-1.0
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(r + m, g + m, b + m)
    }

    /// Return this color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation between two colors, component-wise.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Convert to 8-bit RGBA, clamping each channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Parse a color string: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`,
    /// `rgba(...)`, `hsl(...)` or `hsla(...)`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ParseError::InvalidColor(input.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return Self::parse_rgb_fn(s).ok_or_else(|| ParseError::InvalidColor(input.to_string()));
        }
        if lower.starts_with("hsl") {
            return Self::parse_hsl_fn(s).ok_or_else(|| ParseError::InvalidColor(input.to_string()));
        }
        Err(ParseError::InvalidColor(input.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let expanded: String = match hex.len() {
            // #abc expands per-character: a -> aa, b -> bb, c -> cc
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        let r = byte(0)?;
        let g = byte(2)?;
        let b = byte(4)?;
        let a = if expanded.len() == 8 { byte(6)? } else { 255 };
        Some(Self {
            a: a as f32 / 255.0,
            ..Self::from_rgb8(r, g, b)
        })
    }

    fn parse_rgb_fn(s: &str) -> Option<Self> {
        let parts = fn_args(s)?;
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |p: &str| -> Option<f32> {
            let v: f32 = p.trim().parse().ok()?;
            Some((v / 255.0).clamp(0.0, 1.0))
        };
        let r = channel(&parts[0])?;
        let g = channel(&parts[1])?;
        let b = channel(&parts[2])?;
        let a = match parts.get(3) {
            Some(p) => p.trim().parse::<f32>().ok()?.clamp(0.0, 1.0),
            None => 1.0,
        };
        Some(Self { r, g, b, a })
    }

    fn parse_hsl_fn(s: &str) -> Option<Self> {
        let parts = fn_args(s)?;
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let h: f32 = parts[0].trim().trim_end_matches("deg").trim().parse().ok()?;
        let pct = |p: &str| -> Option<f32> {
            let v: f32 = p.trim().trim_end_matches('%').trim().parse().ok()?;
            Some((v / 100.0).clamp(0.0, 1.0))
        };
        let sat = pct(&parts[1])?;
        let light = pct(&parts[2])?;
        let a = match parts.get(3) {
            Some(p) => p.trim().parse::<f32>().ok()?.clamp(0.0, 1.0),
            None => 1.0,
        };
        Some(Self::from_hsl(h, sat, light).with_alpha(a))
    }
}

/// Split `name(a, b, c)` into its comma- or space-separated arguments.
fn fn_args(s: &str) -> Option<Vec<String>> {
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = &s[open + 1..close];
    let parts: Vec<String> = if inner.contains(',') {
        inner.split(',').map(|p| p.trim().to_string()).collect()
    } else {
        inner.split_whitespace().map(|p| p.to_string()).collect()
    };
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(de::Error::custom)
    }
}

/// Blend mode for compositing draws onto a canvas.
///
/// Controls how source colors combine with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending (default).
    ///
    /// Source is composited over the destination by its alpha. Good for
    /// solid, discrete layers.
    #[default]
    Alpha,

    /// Additive blending.
    ///
    /// Color channels are summed, so overlapping draws get brighter.
    /// Used for glowing accents like the quantum field's squares.
    Additive,

    /// Screen blending.
    ///
    /// Inverted multiply: `1 - (1-dst)(1-src)`. Lightens without the
    /// harsh clipping of additive. Used by the liquid backdrop layers.
    Screen,
}

/// An ordered list of color stops.
///
/// Particles carry a hue in `[0, 1)` that indexes into the palette, and
/// gradient builders spread the stops across their range.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Palette {
    stops: Vec<Color>,
}

// Deserializes through `Palette::new` so an empty stop list still
// falls back to the default palette.
impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stops = Vec::<Color>::deserialize(deserializer)?;
        Ok(Palette::new(stops))
    }
}

impl Palette {
    /// Create a palette from explicit stops.
    ///
    /// An empty list falls back to [`Palette::dawn`], so a palette is
    /// never empty.
    pub fn new(stops: Vec<Color>) -> Self {
        if stops.is_empty() {
            Self::dawn()
        } else {
            Self { stops }
        }
    }

    /// Single-color palette.
    pub fn solid(color: Color) -> Self {
        Self { stops: vec![color] }
    }

    /// Cyan into violet into red. The default for particle fields.
    pub fn dawn() -> Self {
        Self {
            stops: vec![Color::COSMIC_DAWN, Color::QUANTUM_VIOLET, Color::PHOENIX_RED],
        }
    }

    /// Red into gold into cyan. The default for liquid backdrops.
    pub fn ember() -> Self {
        Self {
            stops: vec![Color::PHOENIX_RED, Color::RENAISSANCE_GOLD, Color::COSMIC_DAWN],
        }
    }

    /// Violet into red into cyan. The default for geometry figures.
    pub fn arcane() -> Self {
        Self {
            stops: vec![Color::QUANTUM_VIOLET, Color::PHOENIX_RED, Color::COSMIC_DAWN],
        }
    }

    /// Append a stop, builder style.
    pub fn with_stop(mut self, color: Color) -> Self {
        self.stops.push(color);
        self
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// All stops in order.
    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// The first stop. Used for connection lines and static fallbacks.
    pub fn primary(&self) -> Color {
        self.stops[0]
    }

    /// Map a hue in `[0, 1)` to a stop.
    ///
    /// Buckets the range evenly: hue 0.0 is the first stop, values just
    /// below 1.0 the last. Out-of-range hues clamp.
    pub fn pick(&self, hue: f32) -> Color {
        let idx = (hue * self.stops.len() as f32).floor() as isize;
        let idx = idx.clamp(0, self.stops.len() as isize - 1) as usize;
        self.stops[idx]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dawn()
    }
}

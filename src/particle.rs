//! Particle state and per-mode behavior profiles.
//!
//! A [`Particle`] is plain simulation state; all stepping logic lives in
//! [`crate::field::ParticleField`]. [`FieldMode`] bundles the tuning
//! constants that make the four field styles feel different, and
//! [`ParticleInstance`] is the packed per-particle record hosts can
//! upload straight into an instance buffer.

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

use crate::color::Color;
use crate::error::ParseError;

/// Behavior profile for a particle field.
///
/// The profile decides boundary policy, pointer response, aging and
/// whether proximity lines are drawn. Constants are expressed per
/// 60 Hz reference frame; the field scales them by the actual delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Slow drifters that bounce at the edges and link up with
    /// proximity lines.
    #[default]
    Constellation,
    /// Free drifters that wrap around the edges.
    Cosmic,
    /// Embers that fade out while rising and respawn from the bottom
    /// edge.
    Phoenix,
    /// Wrapping motes drawn as additive squares with an orbital
    /// pointer response and proximity lines.
    Quantum,
}

impl FieldMode {
    pub const ALL: [FieldMode; 4] = [
        FieldMode::Constellation,
        FieldMode::Cosmic,
        FieldMode::Phoenix,
        FieldMode::Quantum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldMode::Constellation => "constellation",
            FieldMode::Cosmic => "cosmic",
            FieldMode::Phoenix => "phoenix",
            FieldMode::Quantum => "quantum",
        }
    }

    /// Pointer influence radius in surface units, before pixel scaling.
    #[inline]
    pub fn pointer_radius(&self) -> f32 {
        match self {
            FieldMode::Phoenix => 180.0,
            _ => 140.0,
        }
    }

    /// Pointer force gain inside the influence radius.
    #[inline]
    pub fn force_gain(&self) -> f32 {
        match self {
            FieldMode::Constellation => 0.8,
            _ => 1.2,
        }
    }

    /// How hard the pointer force steers velocity.
    #[inline]
    pub fn steer_gain(&self) -> f32 {
        match self {
            FieldMode::Phoenix => 1.6,
            _ => 1.1,
        }
    }

    /// Life lost per reference frame.
    #[inline]
    pub fn life_decay(&self) -> f32 {
        match self {
            FieldMode::Phoenix => 0.0025,
            _ => 0.0003,
        }
    }

    /// Whether particles wrap at the edges (otherwise they bounce).
    #[inline]
    pub fn wraps(&self) -> bool {
        !matches!(self, FieldMode::Constellation)
    }

    /// Whether this mode draws proximity lines between close particles.
    #[inline]
    pub fn connects(&self) -> bool {
        matches!(self, FieldMode::Constellation | FieldMode::Quantum)
    }

    /// Multiplier on the configured connection distance.
    #[inline]
    pub fn connection_scale(&self) -> f32 {
        match self {
            FieldMode::Quantum => 0.8,
            _ => 1.0,
        }
    }

    /// Peak alpha of a proximity line at zero distance.
    #[inline]
    pub fn line_alpha_gain(&self) -> f32 {
        match self {
            FieldMode::Quantum => 0.35,
            _ => 0.2,
        }
    }

    /// Stroke width of proximity lines.
    #[inline]
    pub fn line_width(&self) -> f32 {
        match self {
            FieldMode::Quantum => 0.8,
            _ => 0.5,
        }
    }

    /// Whether particles composite additively (squares) instead of as
    /// alpha-blended gradient discs.
    #[inline]
    pub fn additive(&self) -> bool {
        matches!(self, FieldMode::Quantum)
    }

    /// Center alpha of the gradient disc.
    #[inline]
    pub fn glow_alpha(&self) -> f32 {
        match self {
            FieldMode::Phoenix => 0.95,
            _ => 0.8,
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constellation" => Ok(FieldMode::Constellation),
            "cosmic" => Ok(FieldMode::Cosmic),
            "phoenix" => Ok(FieldMode::Phoenix),
            "quantum" => Ok(FieldMode::Quantum),
            _ => Err(ParseError::UnknownMode(s.to_string())),
        }
    }
}

/// One particle of a field, in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Current rendered radius; pulses or grows around `base_size`.
    pub size: f32,
    pub base_size: f32,
    /// Current alpha; pulses or fades around `base_opacity`.
    pub opacity: f32,
    pub base_opacity: f32,
    /// Palette index in `[0, 1)`.
    pub hue: f32,
    /// Remaining life in `(0, 1]`; expiry triggers a respawn.
    pub life: f32,
    /// Per-particle phase for the pulse and orbital responses.
    pub seed: f32,
}

impl Particle {
    /// Spawn a fresh particle uniformly over `extent`.
    pub fn spawn(rng: &mut impl Rng, extent: Vec2) -> Self {
        let base_size = rng.gen_range(0.6..2.6);
        let base_opacity = rng.gen_range(0.35..0.85);
        Self {
            position: Vec2::new(
                rng.gen_range(0.0..extent.x.max(1.0)),
                rng.gen_range(0.0..extent.y.max(1.0)),
            ),
            velocity: Vec2::new(rng.gen_range(-0.4..0.4), rng.gen_range(-0.3..0.3)),
            size: base_size,
            base_size,
            opacity: base_opacity,
            base_opacity,
            hue: rng.gen_range(0.0..1.0),
            life: rng.gen_range(0.6..1.0),
            seed: rng.gen_range(0.0..1.0),
        }
    }

    /// Spawn a replacement ember: a fresh particle restarted just below
    /// the bottom edge with an upward velocity.
    pub fn spawn_ember(rng: &mut impl Rng, extent: Vec2) -> Self {
        let mut newborn = Self::spawn(rng, extent);
        newborn.position.y = extent.y + newborn.base_size * 10.0;
        newborn.velocity.y = rng.gen_range(-1.4..-0.4);
        newborn
    }

    /// Packed record for this particle, colored and faded by the host.
    #[inline]
    pub fn instance(&self, color: Color) -> ParticleInstance {
        ParticleInstance {
            position: [self.position.x, self.position.y],
            size: self.size,
            _pad: 0.0,
            color: [color.r, color.g, color.b, color.a],
        }
    }
}

/// Per-particle instance record, laid out for direct buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

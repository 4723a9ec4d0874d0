//! # Emberfield
//!
//! Layered ambient backdrops: particle fields, liquid gradients and
//! sacred-geometry figures, simulated and rasterized on the CPU.
//!
//! Emberfield owns the simulation and drawing; the embedding owns the
//! surface. Hosts feed in pointer, scroll and resize input, drive frames
//! at whatever cadence they choose, and get back painted pixels or
//! packed per-particle instances.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberfield::prelude::*;
//!
//! let mut field = ParticleField::new(
//!     FieldConfig::new()
//!         .with_mode(FieldMode::Phoenix)
//!         .with_count(250),
//! );
//! field.resize(Viewport::new(1440.0, 900.0).with_pixel_ratio(2.0));
//!
//! let mut canvas = Canvas::new(2880, 1800);
//! loop {
//!     field.step(1.0 / 60.0);
//!     canvas.clear(Color::TRANSPARENT);
//!     field.render(&mut canvas);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A [`ParticleField`] is a population of particles over a [`Viewport`].
//! Its [`FieldMode`] selects the motion profile:
//!
//! | Mode | Behavior |
//! |------|----------|
//! | [`FieldMode::Constellation`] | bounces off edges, draws proximity lines |
//! | [`FieldMode::Cosmic`] | free drift, wraps across edges |
//! | [`FieldMode::Phoenix`] | expires and rekindles below the bottom edge |
//! | [`FieldMode::Quantum`] | orbital pointer motion, additive squares |
//!
//! Motion constants are tuned per 60 Hz reference frame and scaled by
//! the actual delta, so a field stepped at 30 Hz or 144 Hz covers the
//! same distance per second.
//!
//! ### Geometry
//!
//! [`Figure`] builds line-art figures ([`Pattern::FlowerOfLife`],
//! [`Pattern::GoldenSpiral`], ...) at three [`Complexity`] tiers. Figures
//! stroke onto a [`Canvas`] or export as standalone SVG documents via
//! [`svg::document`].
//!
//! ### Scenes
//!
//! A [`Scene`] stacks the layers a page section uses: the liquid
//! backdrop, two tinted fields and corner geometry. [`SceneVariant`]
//! picks the color scheme, [`Intensity`] the budgets; both parse from
//! strings, so presets can live in TOML files.
//!
//! ### Hosts and quality
//!
//! [`SurfaceHost`] ties a field to an embedding: it attaches listeners
//! through a [`host::ListenerRegistry`], schedules frames through a
//! [`host::FrameScheduler`], honors reduced-motion profiles with a
//! static gradient, and degrades the particle budget when measured fps
//! sags. [`DeviceProfile`] picks the starting [`QualityTier`].
//!
//! ## Feature Overview
//!
//! | Category | Types |
//! |----------|-------|
//! | Simulation | [`ParticleField`], [`FieldConfig`], [`FieldMode`] |
//! | Rendering | [`Canvas`], [`BlendMode`], [`Color`], [`Palette`] |
//! | Geometry | [`Pattern`], [`Complexity`], [`Figure`], [`SvgOptions`] |
//! | Composition | [`Scene`], [`SceneVariant`], [`Intensity`], [`LiquidLayer`] |
//! | Lifecycle | [`SurfaceHost`], [`HostEvent`], [`host::FrameScheduler`] |
//! | Quality | [`DeviceProfile`], [`QualityTier`], [`FpsGovernor`] |

pub mod canvas;
pub mod color;
pub mod error;
pub mod field;
pub mod geometry;
pub mod host;
pub mod liquid;
pub mod particle;
pub mod quality;
pub mod scene;
pub mod svg;
pub mod time;

pub use bytemuck;
pub use canvas::Canvas;
pub use color::{BlendMode, Color, Palette};
pub use error::{ExportError, ParseError, PresetError};
pub use field::{FieldConfig, Frame, ParticleField, Viewport};
pub use geometry::{Complexity, Figure, Pattern};
pub use glam::Vec2;
pub use host::{HostEvent, HostState, SurfaceHost};
pub use liquid::LiquidLayer;
pub use particle::{FieldMode, Particle, ParticleInstance};
pub use quality::{DeviceProfile, FpsGovernor, QualityTier};
pub use scene::{Intensity, Scene, SceneConfig, SceneVariant};
pub use svg::SvgOptions;
pub use time::{FrameClock, StepClock};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use emberfield::prelude::*;
/// ```
///
/// This imports:
/// - [`ParticleField`], [`FieldConfig`], [`FieldMode`] - the simulation
/// - [`Canvas`], [`Color`], [`Palette`] - rasterization
/// - [`Figure`], [`Pattern`], [`Complexity`] - geometry figures
/// - [`Scene`], [`SceneConfig`] - composed presets
/// - [`SurfaceHost`] and its scheduler/registry traits - lifecycle
/// - [`Viewport`], [`Vec2`] - surface coordinates
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::{BlendMode, Color, Palette};
    pub use crate::field::{FieldConfig, Frame, ParticleField, Viewport};
    pub use crate::geometry::{Complexity, Figure, Pattern};
    pub use crate::host::{
        FrameScheduler, HostEvent, HostState, ListenerKind, ListenerRegistry, ManualScheduler,
        NullRegistry, SurfaceHost,
    };
    pub use crate::liquid::LiquidLayer;
    pub use crate::particle::FieldMode;
    pub use crate::quality::{DeviceProfile, FpsGovernor, QualityTier};
    pub use crate::scene::{Intensity, Scene, SceneConfig, SceneVariant};
    pub use crate::svg::SvgOptions;
    pub use crate::time::{FrameClock, StepClock};
    pub use crate::Vec2;
}

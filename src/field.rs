//! Ambient particle field simulation.
//!
//! A [`ParticleField`] owns a population of particles over a
//! [`Viewport`], advances them with [`ParticleField::step`] and draws
//! them onto a [`Canvas`] or exports them as packed instances. Behavior
//! is selected by [`FieldMode`]; tuning lives in [`FieldConfig`].
//!
//! The field never talks to a window system. Hosts feed it pointer,
//! scroll and resize input and drive `step` at whatever cadence they
//! choose; all motion constants are expressed per 60 Hz reference frame
//! and scaled by the actual delta.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::field::{FieldConfig, ParticleField, Viewport};
//! use emberfield::particle::FieldMode;
//!
//! let mut field = ParticleField::new(FieldConfig::new().with_mode(FieldMode::Phoenix));
//! field.resize(Viewport::new(1280.0, 720.0).with_pixel_ratio(2.0));
//!
//! // Per frame:
//! field.step(1.0 / 60.0);
//! field.render(&mut canvas);
//! ```

use std::path::Path;

use glam::Vec2;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::color::{BlendMode, Palette};
use crate::error::PresetError;
use crate::particle::{FieldMode, Particle, ParticleInstance};

/// Reference simulation rate the motion constants are tuned for.
const REFERENCE_HZ: f32 = 60.0;
/// Scroll velocity multiplier per reference frame.
const SCROLL_DECAY: f32 = 0.92;
/// Scroll offset delta to velocity conversion.
const SCROLL_GAIN: f32 = 0.003;
/// Scroll velocity clamp.
const SCROLL_MAX: f32 = 1.6;
/// How far outside the surface wrapping particles may drift.
const WRAP_MARGIN: f32 = 10.0;
/// Per-axis velocity jitter per reference frame.
const JITTER: f32 = 0.01;
/// Layout area the configured population count is designed for.
const DESIGN_AREA: f32 = 1440.0 * 900.0;

/// Logical surface dimensions plus the pixel ratio mapping them to
/// physical pixels.
///
/// Population targets derive from the logical area; particle positions,
/// pointer input and rendering all live in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    pixel_ratio: f32,
}

impl Viewport {
    /// A viewport with logical dimensions and a 1:1 pixel ratio.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    /// Set the device pixel ratio. Non-positive or non-finite ratios
    /// fall back to 1; ratios above 2 are capped to keep fill cost sane
    /// on dense displays.
    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio.min(2.0)
        } else {
            1.0
        };
        self
    }

    /// Whether the surface has been measured yet.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Logical area used for population scaling.
    #[inline]
    pub fn logical_area(&self) -> f32 {
        self.width * self.height
    }

    /// Physical surface extent.
    #[inline]
    pub fn physical(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * self.pixel_ratio
    }

    /// Map a logical point (e.g. pointer coordinates) to physical.
    #[inline]
    pub fn to_physical(&self, logical: Vec2) -> Vec2 {
        logical * self.pixel_ratio
    }
}

/// Tuning for a particle field.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Population at the design area; scaled by surface area when
    /// `responsive` is set.
    pub count: usize,
    pub mode: FieldMode,
    pub palette: Palette,
    /// Whether the field responds to pointer input.
    pub interactive: bool,
    /// Proximity-line threshold in surface pixels.
    pub connection_distance: f32,
    /// How strongly scroll velocity pushes particles along +y.
    pub scroll_influence: f32,
    /// Scale the population with the surface area.
    pub responsive: bool,
    /// Layer opacity folded into every draw.
    pub opacity: f32,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self {
            count: 260,
            mode: FieldMode::default(),
            palette: Palette::dawn(),
            interactive: true,
            connection_distance: 140.0,
            scroll_influence: 0.25,
            responsive: true,
            opacity: 0.7,
        }
    }

    /// Lenient constructor for config-driven hosts: an unknown mode
    /// name yields the default field rather than an error.
    pub fn for_mode_name(name: &str) -> Self {
        match name.parse::<FieldMode>() {
            Ok(mode) => Self::new().with_mode(mode),
            Err(_) => {
                debug!("unknown field mode '{}', using {}", name, FieldMode::default());
                Self::new()
            }
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    pub fn with_scroll_influence(mut self, influence: f32) -> Self {
        self.scroll_influence = influence;
        self
    }

    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Parse a preset from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, PresetError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a preset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A proximity line between two particles, by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

/// A rendered snapshot of the field as packed per-particle instances.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    instances: Vec<ParticleInstance>,
}

impl Frame {
    #[inline]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes suitable for an instance buffer upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Pointer {
    position: Vec2,
    active: bool,
}

/// A population of particles over a viewport.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    rng: SmallRng,
    pointer: Pointer,
    scroll_velocity: f32,
    last_scroll_offset: Option<f32>,
    elapsed: f32,
}

impl ParticleField {
    /// Create an empty field. Particles spawn on the first valid
    /// [`resize`](Self::resize).
    pub fn new(config: FieldConfig) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(config, seed)
    }

    /// Create a field with a fixed RNG seed for reproducible runs.
    pub fn seeded(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            viewport: Viewport::new(0.0, 0.0),
            particles: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            pointer: Pointer {
                position: Vec2::ZERO,
                active: false,
            },
            scroll_velocity: 0.0,
            last_scroll_offset: None,
            elapsed: 0.0,
        }
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn pointer_active(&self) -> bool {
        self.pointer.active
    }

    #[inline]
    pub fn scroll_velocity(&self) -> f32 {
        self.scroll_velocity
    }

    /// Population the current config and viewport call for.
    pub fn target_count(&self) -> usize {
        if !self.viewport.is_valid() {
            return 0;
        }
        if self.config.responsive {
            let scaled =
                (self.config.count as f32 * self.viewport.logical_area() / DESIGN_AREA) as usize;
            // A surface too small to scale sensibly keeps the full count
            if scaled == 0 {
                self.config.count
            } else {
                scaled
            }
        } else {
            self.config.count
        }
    }

    // ========== Input ==========

    /// Adopt new surface dimensions and retarget the population.
    /// Invalid dimensions mean the surface is not ready; the call is
    /// ignored and the field keeps waiting.
    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            return;
        }
        self.viewport = viewport;
        self.retarget();
    }

    /// Replace the design population and retarget immediately. Used by
    /// the quality policy to shed load.
    pub fn set_count(&mut self, count: usize) {
        self.config.count = count;
        if self.viewport.is_valid() {
            self.retarget();
        }
    }

    fn retarget(&mut self) {
        let target = self.target_count();
        let extent = self.viewport.physical();
        if self.particles.len() > target {
            // Shrinking keeps the survivors untouched
            self.particles.truncate(target);
        } else {
            while self.particles.len() < target {
                let newborn = Particle::spawn(&mut self.rng, extent);
                self.particles.push(newborn);
            }
        }
        debug!(
            "field retargeted to {} particles over {}x{}",
            target, self.viewport.width, self.viewport.height
        );
    }

    /// Pointer moved over the surface, in logical coordinates.
    pub fn pointer_moved(&mut self, logical: Vec2) {
        self.pointer = Pointer {
            position: self.viewport.to_physical(logical),
            active: true,
        };
    }

    /// Pointer left the surface. Deactivates and recenters so no stale
    /// attraction point lingers.
    pub fn pointer_left(&mut self) {
        self.pointer = Pointer {
            position: Vec2::ZERO,
            active: false,
        };
    }

    /// Feed an absolute scroll offset; successive offsets become a
    /// decaying velocity that drifts particles along +y.
    pub fn scrolled(&mut self, offset: f32) {
        let delta = offset - self.last_scroll_offset.unwrap_or(offset);
        self.scroll_velocity =
            (self.scroll_velocity + delta * SCROLL_GAIN).clamp(-SCROLL_MAX, SCROLL_MAX);
        self.last_scroll_offset = Some(offset);
    }

    // ========== Simulation ==========

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if !self.viewport.is_valid() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let rate = dt * REFERENCE_HZ;
        self.elapsed += dt;
        self.scroll_velocity *= SCROLL_DECAY.powf(rate);

        let extent = self.viewport.physical();
        let pixel_ratio = self.viewport.pixel_ratio();
        let mode = self.config.mode;
        let pointer = self.pointer;
        let scroll_force = self.scroll_velocity * self.config.scroll_influence;
        let interactive = self.config.interactive;

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];

            if interactive && pointer.active {
                let to_pointer = pointer.position - p.position;
                let distance = to_pointer.length();
                let influence = mode.pointer_radius() * pixel_ratio;
                if distance < influence {
                    let force = (1.0 - distance / influence) * mode.force_gain();
                    let angle = to_pointer.y.atan2(to_pointer.x);
                    if mode == FieldMode::Quantum {
                        // Orbital scatter instead of straight attraction
                        p.velocity.x += (angle * 3.0 + p.seed * 6.0).sin() * force * 0.9 * rate;
                        p.velocity.y += (angle * 3.0 + p.seed * 4.0).cos() * force * 0.9 * rate;
                    } else {
                        let steer = force * mode.steer_gain() * rate;
                        p.velocity.x += angle.cos() * steer;
                        p.velocity.y += angle.sin() * steer;
                    }
                }
            }

            p.velocity.y += scroll_force * rate;
            p.velocity.x += self.rng.gen_range(-JITTER..JITTER) * rate;
            p.velocity.y += self.rng.gen_range(-JITTER..JITTER) * rate;

            p.position += p.velocity * rate;

            p.life -= mode.life_decay() * rate;
            if p.life <= 0.0 {
                let newborn = if mode == FieldMode::Phoenix {
                    Particle::spawn_ember(&mut self.rng, extent)
                } else {
                    Particle::spawn(&mut self.rng, extent)
                };
                self.particles[i] = newborn;
                continue;
            }

            if mode == FieldMode::Phoenix {
                // Embers brighten and grow as they burn down
                p.opacity = (p.base_opacity * (1.2 - p.life)).clamp(0.15, 1.0);
                p.size = p.base_size * (1.3 - p.life * 0.3);
            } else {
                p.opacity = (p.base_opacity + (self.elapsed * 0.8 + p.seed * 12.0).sin() * 0.2)
                    .clamp(0.1, 1.0);
                p.size = (p.base_size + (self.elapsed * 0.6 + p.seed * 8.0).sin() * 0.65)
                    .clamp(0.4, 4.0);
            }

            if mode.wraps() {
                if p.position.x < -WRAP_MARGIN {
                    p.position.x = extent.x + WRAP_MARGIN;
                }
                if p.position.x > extent.x + WRAP_MARGIN {
                    p.position.x = -WRAP_MARGIN;
                }
                if p.position.y < -WRAP_MARGIN {
                    p.position.y = extent.y + WRAP_MARGIN;
                }
                if p.position.y > extent.y + WRAP_MARGIN {
                    p.position.y = -WRAP_MARGIN;
                }
            } else {
                if p.position.x <= 0.0 || p.position.x >= extent.x {
                    p.velocity.x = -p.velocity.x;
                }
                if p.position.y <= 0.0 || p.position.y >= extent.y {
                    p.velocity.y = -p.velocity.y;
                }
            }

            self.particles[i] = p;
        }
    }

    /// All proximity lines the current state calls for. Quadratic in
    /// the population; keep counts in the hundreds.
    pub fn connections(&self) -> Vec<Connection> {
        let mode = self.config.mode;
        if !mode.connects() {
            return Vec::new();
        }
        let threshold = self.config.connection_distance * mode.connection_scale();
        if threshold <= 0.0 {
            return Vec::new();
        }
        let gain = mode.line_alpha_gain();

        let mut connections = Vec::new();
        for i in 0..self.particles.len() {
            for j in i + 1..self.particles.len() {
                let dist = self.particles[i].position.distance(self.particles[j].position);
                if dist < threshold {
                    connections.push(Connection {
                        a: i,
                        b: j,
                        alpha: (1.0 - dist / threshold) * gain,
                    });
                }
            }
        }
        connections
    }

    // ========== Output ==========

    /// Draw the field onto a canvas: a soft glow per particle (additive
    /// squares in quantum), then proximity lines. An empty population
    /// renders nothing.
    pub fn render(&self, canvas: &mut Canvas) {
        let mode = self.config.mode;
        let layer = self.config.opacity;

        for p in &self.particles {
            let fill = self.config.palette.pick(p.hue);
            if mode.additive() {
                let color = fill.with_alpha(mode.glow_alpha() * layer);
                canvas.fill_rect_soft(
                    p.position,
                    Vec2::splat(p.size),
                    p.size * 6.0,
                    color,
                    BlendMode::Additive,
                );
            } else {
                let color = fill.with_alpha(mode.glow_alpha() * p.opacity * layer);
                canvas.fill_disc_soft(p.position, p.size, p.size * 6.0, color, BlendMode::Alpha);
            }
        }

        if mode.connects() {
            let line = self.config.palette.primary();
            let width = mode.line_width();
            for c in self.connections() {
                canvas.stroke_line(
                    self.particles[c.a].position,
                    self.particles[c.b].position,
                    width,
                    line.with_alpha(c.alpha * layer),
                    BlendMode::Alpha,
                );
            }
        }
    }

    /// Draw the motionless fallback: a single radial gradient washed
    /// from above center, used when the host honors reduced motion.
    pub fn render_static(&self, canvas: &mut Canvas) {
        let extent = canvas.extent();
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return;
        }
        let center = Vec2::new(extent.x * 0.5, extent.y * 0.4);
        let radius = (extent.x * 0.5).hypot(extent.y * 0.6);
        let primary = self.config.palette.primary();
        let stops = [
            (0.0, primary.with_alpha(self.config.opacity)),
            (0.6, primary.with_alpha(0.0)),
        ];
        canvas.fill_radial_gradient(center, radius, &stops, BlendMode::Alpha);
    }

    /// Snapshot the field as packed instances, colors and layer opacity
    /// already applied.
    pub fn frame(&self) -> Frame {
        let mode = self.config.mode;
        let layer = self.config.opacity;
        let instances = self
            .particles
            .iter()
            .map(|p| {
                let fill = self.config.palette.pick(p.hue);
                let alpha = if mode.additive() {
                    mode.glow_alpha() * layer
                } else {
                    mode.glow_alpha() * p.opacity * layer
                };
                p.instance(fill.with_alpha(alpha))
            })
            .collect();
        Frame { instances }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_field(config: FieldConfig, width: f32, height: f32) -> ParticleField {
        let mut field = ParticleField::seeded(config, 99);
        field.resize(Viewport::new(width, height));
        field
    }

    #[test]
    fn test_config_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.count, 260);
        assert_eq!(config.mode, FieldMode::Constellation);
        assert_eq!(config.connection_distance, 140.0);
        assert_eq!(config.scroll_influence, 0.25);
        assert_eq!(config.opacity, 0.7);
        assert!(config.interactive);
        assert!(config.responsive);
    }

    #[test]
    fn test_for_mode_name_degrades_on_unknown() {
        assert_eq!(FieldConfig::for_mode_name("phoenix").mode, FieldMode::Phoenix);
        assert_eq!(FieldConfig::for_mode_name("plasma").mode, FieldMode::Constellation);
    }

    #[test]
    fn test_config_from_toml() {
        let config = FieldConfig::from_toml_str(
            "mode = \"quantum\"\ncount = 120\npalette = [\"#ff6b6b\", \"#f6c667\"]\n",
        )
        .unwrap();
        assert_eq!(config.mode, FieldMode::Quantum);
        assert_eq!(config.count, 120);
        assert_eq!(config.palette.len(), 2);
        // Omitted keys keep their defaults
        assert_eq!(config.connection_distance, 140.0);
    }

    #[test]
    fn test_pixel_ratio_clamping() {
        assert_eq!(Viewport::new(10.0, 10.0).with_pixel_ratio(3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(10.0, 10.0).with_pixel_ratio(0.0).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(10.0, 10.0).with_pixel_ratio(f32::NAN).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(10.0, 10.0).with_pixel_ratio(1.5).pixel_ratio(), 1.5);
    }

    #[test]
    fn test_invalid_viewport_defers_population() {
        let mut field = ParticleField::seeded(FieldConfig::new(), 1);
        field.resize(Viewport::new(0.0, 600.0));
        assert!(field.is_empty());
        field.step(1.0 / 60.0);
        assert!(field.is_empty());

        field.resize(Viewport::new(800.0, 600.0));
        assert!(!field.is_empty());
    }

    #[test]
    fn test_responsive_population_scales_with_area() {
        let field = ready_field(FieldConfig::new(), 1440.0, 900.0);
        assert_eq!(field.len(), 260);

        let quarter = ready_field(FieldConfig::new(), 720.0, 450.0);
        assert_eq!(quarter.len(), 65);

        let fixed = ready_field(FieldConfig::new().with_responsive(false), 720.0, 450.0);
        assert_eq!(fixed.len(), 260);
    }

    #[test]
    fn test_tiny_surface_falls_back_to_full_count() {
        let field = ready_field(FieldConfig::new(), 10.0, 10.0);
        assert_eq!(field.len(), 260);
    }

    #[test]
    fn test_population_matches_target_after_resizes() {
        let mut field = ready_field(FieldConfig::new(), 1440.0, 900.0);
        for (w, h) in [(2880.0, 900.0), (100.0, 900.0), (1440.0, 450.0), (1440.0, 900.0)] {
            field.resize(Viewport::new(w, h));
            assert_eq!(field.len(), field.target_count());
        }
    }

    #[test]
    fn test_shrink_keeps_survivors() {
        let mut field = ready_field(FieldConfig::new(), 1440.0, 900.0);
        let keeper = field.particles()[0];
        field.resize(Viewport::new(720.0, 450.0));
        assert_eq!(field.particles()[0], keeper);
    }

    #[test]
    fn test_set_count_retargets() {
        let mut field = ready_field(FieldConfig::new().with_responsive(false), 800.0, 600.0);
        assert_eq!(field.len(), 260);
        field.set_count(100);
        assert_eq!(field.len(), 100);
    }

    #[test]
    fn test_step_requires_valid_dt() {
        let mut field = ready_field(FieldConfig::new().with_count(20), 800.0, 600.0);
        let before: Vec<_> = field.particles().to_vec();
        field.step(0.0);
        field.step(-1.0);
        field.step(f32::NAN);
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_step_moves_particles() {
        let mut field = ready_field(FieldConfig::new().with_count(20), 800.0, 600.0);
        let before: Vec<_> = field.particles().to_vec();
        field.step(1.0 / 60.0);
        let moved = field
            .particles()
            .iter()
            .zip(&before)
            .filter(|(now, was)| now.position != was.position)
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn test_constellation_bounces_at_edges() {
        let mut field = ready_field(
            FieldConfig::new().with_count(1).with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(1);
        field.particles[0].position = Vec2::new(799.9, 300.0);
        field.particles[0].velocity = Vec2::new(0.5, 0.0);
        field.step(1.0 / 60.0);
        assert!(field.particles[0].velocity.x < 0.0, "x velocity should reflect");
    }

    #[test]
    fn test_cosmic_wraps_at_margin() {
        let mut field = ready_field(
            FieldConfig::new()
                .with_mode(FieldMode::Cosmic)
                .with_count(1)
                .with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(1);
        field.particles[0].position = Vec2::new(809.5, 300.0);
        field.particles[0].velocity = Vec2::new(1.0, 0.0);
        field.step(1.0 / 60.0);
        assert_eq!(field.particles[0].position.x, -WRAP_MARGIN);
    }

    #[test]
    fn test_phoenix_rebirth_rises_from_bottom() {
        let mut field = ready_field(
            FieldConfig::new()
                .with_mode(FieldMode::Phoenix)
                .with_count(1)
                .with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(1);
        field.particles[0].life = 0.00001;
        field.step(1.0 / 60.0);
        let reborn = field.particles[0];
        assert!(reborn.position.y > 600.0);
        assert!(reborn.velocity.y < 0.0);
        assert!(reborn.life > 0.0);
    }

    #[test]
    fn test_pointer_attracts_nearby_particles() {
        let mut field = ready_field(
            FieldConfig::new().with_count(1).with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(1);
        field.particles[0].position = Vec2::new(380.0, 300.0);
        field.particles[0].velocity = Vec2::ZERO;
        field.pointer_moved(Vec2::new(400.0, 300.0));
        field.step(1.0 / 60.0);
        assert!(
            field.particles[0].velocity.x > 0.1,
            "velocity should steer toward the pointer"
        );
    }

    #[test]
    fn test_pointer_leave_clears_attraction() {
        let mut field = ready_field(FieldConfig::new(), 800.0, 600.0);
        field.pointer_moved(Vec2::new(100.0, 100.0));
        assert!(field.pointer_active());
        field.pointer_left();
        assert!(!field.pointer_active());
        assert_eq!(field.pointer.position, Vec2::ZERO);
    }

    #[test]
    fn test_non_interactive_field_ignores_pointer() {
        let mut field = ready_field(
            FieldConfig::new()
                .with_interactive(false)
                .with_count(1)
                .with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(1);
        field.particles[0].position = Vec2::new(380.0, 300.0);
        field.particles[0].velocity = Vec2::ZERO;
        field.pointer_moved(Vec2::new(400.0, 300.0));
        field.step(1.0 / 60.0);
        // Only jitter applies, far below the pointer force
        assert!(field.particles[0].velocity.length() < 0.05);
    }

    #[test]
    fn test_scroll_velocity_accumulates_clamps_and_decays() {
        let mut field = ready_field(FieldConfig::new(), 800.0, 600.0);
        field.scrolled(0.0);
        field.scrolled(100.0);
        assert!((field.scroll_velocity() - 0.3).abs() < 1e-6);

        field.scrolled(100_000.0);
        assert_eq!(field.scroll_velocity(), SCROLL_MAX);

        field.step(1.0 / 60.0);
        assert!((field.scroll_velocity() - SCROLL_MAX * SCROLL_DECAY).abs() < 1e-4);
    }

    #[test]
    fn test_connection_pairs_and_alpha() {
        let mut field = ready_field(
            FieldConfig::new()
                .with_count(4)
                .with_responsive(false)
                .with_connection_distance(200.0),
            800.0,
            600.0,
        );
        field.particles.truncate(4);
        let anchor = Vec2::new(400.0, 300.0);
        for (i, offset) in [
            Vec2::ZERO,
            Vec2::new(30.0, 0.0),
            Vec2::new(0.0, 40.0),
            Vec2::new(-20.0, -20.0),
        ]
        .iter()
        .enumerate()
        {
            field.particles[i].position = anchor + *offset;
        }
        // Four particles within 50 units of each other: every pair links
        assert_eq!(field.connections().len(), 6);

        field.particles[1].position = anchor + Vec2::new(100.0, 0.0);
        let connections = field.connections();
        let pair = connections
            .iter()
            .find(|c| (c.a, c.b) == (0, 1))
            .expect("pair within threshold");
        assert!((pair.alpha - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_phoenix_mode_never_connects() {
        let mut field = ready_field(
            FieldConfig::new()
                .with_mode(FieldMode::Phoenix)
                .with_count(4)
                .with_responsive(false),
            800.0,
            600.0,
        );
        field.particles.truncate(4);
        for p in &mut field.particles {
            p.position = Vec2::new(400.0, 300.0);
        }
        assert!(field.connections().is_empty());
    }

    #[test]
    fn test_state_stays_sane_over_many_steps() {
        for mode in FieldMode::ALL {
            let mut field = ready_field(
                FieldConfig::new().with_mode(mode).with_count(40).with_responsive(false),
                640.0,
                480.0,
            );
            field.pointer_moved(Vec2::new(320.0, 240.0));
            field.scrolled(0.0);
            field.scrolled(500.0);
            for _ in 0..500 {
                field.step(1.0 / 60.0);
            }
            assert_eq!(field.len(), 40);
            for p in field.particles() {
                assert!(p.position.x.is_finite() && p.position.y.is_finite());
                assert!(p.opacity >= 0.0 && p.opacity <= 1.0);
                assert!(p.size > 0.0);
                assert!(p.life > 0.0 && p.life <= 1.0);
            }
        }
    }

    #[test]
    fn test_frame_packs_every_particle() {
        let mut field = ready_field(
            FieldConfig::new().with_count(16).with_responsive(false),
            320.0,
            240.0,
        );
        field.step(1.0 / 60.0);
        let frame = field.frame();
        assert_eq!(frame.len(), field.len());
        assert_eq!(frame.as_bytes().len(), frame.len() * 32);
    }

    #[test]
    fn test_render_paints_particles() {
        let mut canvas = Canvas::new(320, 240);
        let mut field = ready_field(
            FieldConfig::new().with_count(30).with_responsive(false),
            320.0,
            240.0,
        );
        field.step(1.0 / 60.0);
        field.render(&mut canvas);
        assert!(canvas.pixels().iter().any(|p| p.a > 0.0));
    }

    #[test]
    fn test_render_with_no_particles_is_fine() {
        let mut canvas = Canvas::new(64, 64);
        let field = ParticleField::seeded(FieldConfig::new(), 5);
        field.render(&mut canvas);
        assert!(canvas.pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn test_static_fallback_paints_gradient_wash() {
        let mut canvas = Canvas::new(100, 100);
        let field = ParticleField::seeded(FieldConfig::new(), 5);
        field.render_static(&mut canvas);
        let wash = canvas.pixel(50, 40).unwrap();
        let corner = canvas.pixel(99, 99).unwrap();
        assert!(wash.a > 0.0);
        assert!(wash.a > corner.a);
    }
}

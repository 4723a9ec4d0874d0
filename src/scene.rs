//! Scene presets composing the full ambient backdrop.
//!
//! A [`Scene`] stacks the layers a page section uses: the liquid
//! gradient backdrop, an ember field and a constellation field tinted
//! from the variant's color scheme, and two geometry figures hanging
//! off opposite corners. Variants and intensities are data, so presets
//! can also load from TOML files.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::quality::QualityTier;
//! use emberfield::scene::{Intensity, Scene, SceneConfig, SceneVariant};
//!
//! let config = SceneConfig::new()
//!     .with_variant(SceneVariant::Hero)
//!     .with_intensity(Intensity::Intense);
//! let mut scene = Scene::new(config, QualityTier::High);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use glam::Vec2;
use log::debug;

use crate::canvas::Canvas;
use crate::color::{BlendMode, Color, Palette};
use crate::error::{ParseError, PresetError};
use crate::field::{FieldConfig, ParticleField, Viewport};
use crate::geometry::{Complexity, Figure, Pattern, Primitive};
use crate::liquid::LiquidLayer;
use crate::particle::FieldMode;
use crate::quality::QualityTier;

/// Extra particles the constellation layer carries over the budget.
const CONSTELLATION_BONUS: usize = 50;
/// Proximity-line thresholds for the two fields, in surface pixels.
const EMBER_CONNECTION_DISTANCE: f32 = 120.0;
const CONSTELLATION_CONNECTION_DISTANCE: f32 = 160.0;
/// Figure footprints in surface pixels.
const FLOWER_SIZE: f32 = 400.0;
const SPIRAL_SIZE: f32 = 320.0;
/// The spiral reads fainter than the flower.
const SPIRAL_OPACITY_SCALE: f32 = 0.8;

/// How strongly a scene animates.
///
/// Each level fixes the blob morph period, the particle budget and the
/// geometry overlay opacity together, so a single knob moves the whole
/// composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Subtle,
    #[default]
    Medium,
    Intense,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Subtle, Intensity::Medium, Intensity::Intense];

    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Subtle => "subtle",
            Intensity::Medium => "medium",
            Intensity::Intense => "intense",
        }
    }

    /// Blob morph period in seconds.
    pub fn morph_secs(&self) -> f32 {
        match self {
            Intensity::Subtle => 8.0,
            Intensity::Medium => 12.0,
            Intensity::Intense => 16.0,
        }
    }

    /// Particle budget before quality scaling.
    pub fn particle_budget(&self) -> usize {
        match self {
            Intensity::Subtle => 150,
            Intensity::Medium => 250,
            Intensity::Intense => 350,
        }
    }

    /// Opacity of the geometry overlays.
    pub fn overlay_opacity(&self) -> f32 {
        match self {
            Intensity::Subtle => 0.3,
            Intensity::Medium => 0.5,
            Intensity::Intense => 0.7,
        }
    }

    /// Blob rect size as a fraction of the surface.
    pub fn blob_scale(&self) -> f32 {
        match self {
            Intensity::Subtle => 0.70,
            Intensity::Medium => 0.95,
            Intensity::Intense => 1.20,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intensity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subtle" => Ok(Intensity::Subtle),
            "medium" => Ok(Intensity::Medium),
            "intense" => Ok(Intensity::Intense),
            _ => Err(ParseError::UnknownIntensity(s.to_string())),
        }
    }
}

/// Named scene presets, one per page section.
///
/// A variant is a three-color scheme: the base tint (liquid and embers),
/// the counterpoint (constellation) and the accent (spiral figure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneVariant {
    #[default]
    Hero,
    Philosophy,
    Timeline,
    Vision,
    Education,
    Disruption,
    Cta,
}

impl SceneVariant {
    pub const ALL: [SceneVariant; 7] = [
        SceneVariant::Hero,
        SceneVariant::Philosophy,
        SceneVariant::Timeline,
        SceneVariant::Vision,
        SceneVariant::Education,
        SceneVariant::Disruption,
        SceneVariant::Cta,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneVariant::Hero => "hero",
            SceneVariant::Philosophy => "philosophy",
            SceneVariant::Timeline => "timeline",
            SceneVariant::Vision => "vision",
            SceneVariant::Education => "education",
            SceneVariant::Disruption => "disruption",
            SceneVariant::Cta => "cta",
        }
    }

    /// The variant's color scheme: base, counterpoint, accent.
    pub fn color_scheme(&self) -> [Color; 3] {
        match self {
            SceneVariant::Hero => {
                [Color::PHOENIX_RED, Color::RENAISSANCE_GOLD, Color::COSMIC_DAWN]
            }
            SceneVariant::Philosophy => {
                [Color::PHOENIX_RED, Color::QUANTUM_VIOLET, Color::COSMIC_DAWN]
            }
            SceneVariant::Timeline => {
                [Color::RENAISSANCE_GOLD, Color::PHOENIX_RED, Color::QUANTUM_VIOLET]
            }
            SceneVariant::Vision => {
                [Color::COSMIC_DAWN, Color::QUANTUM_VIOLET, Color::PHOENIX_RED]
            }
            SceneVariant::Education => {
                [Color::QUANTUM_VIOLET, Color::COSMIC_DAWN, Color::RENAISSANCE_GOLD]
            }
            SceneVariant::Disruption => {
                [Color::PHOENIX_RED, Color::RENAISSANCE_GOLD, Color::QUANTUM_VIOLET]
            }
            SceneVariant::Cta => {
                [Color::PHOENIX_RED, Color::QUANTUM_VIOLET, Color::COSMIC_DAWN]
            }
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneVariant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(SceneVariant::Hero),
            "philosophy" => Ok(SceneVariant::Philosophy),
            "timeline" => Ok(SceneVariant::Timeline),
            "vision" => Ok(SceneVariant::Vision),
            "education" => Ok(SceneVariant::Education),
            "disruption" => Ok(SceneVariant::Disruption),
            "cta" => Ok(SceneVariant::Cta),
            _ => Err(ParseError::UnknownVariant(s.to_string())),
        }
    }
}

/// Tuning for a composed scene.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub variant: SceneVariant,
    pub intensity: Intensity,
    /// Whether the scene's layers respond to pointer input.
    pub interactive: bool,
}

impl SceneConfig {
    pub fn new() -> Self {
        Self {
            variant: SceneVariant::default(),
            intensity: Intensity::default(),
            interactive: true,
        }
    }

    pub fn with_variant(mut self, variant: SceneVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
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

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which corner a geometry overlay hangs off.
#[derive(Debug, Clone, Copy)]
enum Corner {
    TopRight,
    BottomLeft,
}

/// A figure anchored past a surface corner, stroked at fixed opacity.
#[derive(Debug, Clone)]
struct GeometryOverlay {
    figure: Figure,
    color: Color,
    size: f32,
    opacity: f32,
    corner: Corner,
    /// How far the figure hangs past the surface edge.
    overhang: f32,
    /// Offset from the other edge of its corner.
    inset: f32,
}

impl GeometryOverlay {
    fn center(&self, extent: Vec2) -> Vec2 {
        let half = self.size * 0.5;
        match self.corner {
            Corner::TopRight => Vec2::new(extent.x + self.overhang - half, self.inset + half),
            Corner::BottomLeft => Vec2::new(half - self.overhang, extent.y - self.inset - half),
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        let extent = canvas.extent();
        if extent.x <= 0.0 || extent.y <= 0.0 || self.figure.is_empty() {
            return;
        }
        let origin = self.center(extent);
        let scale = self.size / (self.figure.frame_half() * 2.0);
        let width = (self.figure.stroke_width() * scale).max(0.5);
        let color = self.color.with_alpha(self.color.a * self.opacity);
        for primitive in self.figure.primitives() {
            match primitive {
                Primitive::Circle { center, radius } => {
                    canvas.stroke_circle(
                        origin + *center * scale,
                        radius * scale,
                        width,
                        color,
                        BlendMode::Alpha,
                    );
                }
                Primitive::Segment { a, b } => {
                    canvas.stroke_line(
                        origin + *a * scale,
                        origin + *b * scale,
                        width,
                        color,
                        BlendMode::Alpha,
                    );
                }
                Primitive::Polygon { vertices } => {
                    let points: Vec<Vec2> =
                        vertices.iter().map(|v| origin + *v * scale).collect();
                    canvas.stroke_polygon(&points, width, color, BlendMode::Alpha);
                }
                Primitive::Polyline { points } => {
                    let points: Vec<Vec2> =
                        points.iter().map(|p| origin + *p * scale).collect();
                    canvas.stroke_polyline(&points, width, color, BlendMode::Alpha);
                }
                Primitive::Ellipse { center, rx, ry } => {
                    canvas.stroke_ellipse(
                        origin + *center * scale,
                        rx * scale,
                        ry * scale,
                        width,
                        color,
                        BlendMode::Alpha,
                    );
                }
            }
        }
    }
}

/// A composed ambient backdrop.
///
/// Layers paint bottom to top: liquid, embers, constellation, then the
/// geometry overlays. The quality tier fixes layer budgets at build
/// time; [`Scene::advance`] and [`Scene::compose`] drive it per frame.
#[derive(Debug)]
pub struct Scene {
    variant: SceneVariant,
    intensity: Intensity,
    tier: QualityTier,
    viewport: Viewport,
    liquid: LiquidLayer,
    embers: ParticleField,
    constellation: ParticleField,
    overlays: Vec<GeometryOverlay>,
}

impl Scene {
    /// Build a scene for the given quality tier.
    pub fn new(config: SceneConfig, tier: QualityTier) -> Self {
        Self::assemble(config, tier, None)
    }

    /// Deterministic construction for tests and offline rendering.
    pub fn seeded(config: SceneConfig, tier: QualityTier, seed: u64) -> Self {
        Self::assemble(config, tier, Some(seed))
    }

    fn assemble(config: SceneConfig, tier: QualityTier, seed: Option<u64>) -> Self {
        let scheme = config.variant.color_scheme();
        let budget = config.intensity.particle_budget();

        let ember_config = FieldConfig::new()
            .with_mode(FieldMode::Phoenix)
            .with_count(tier.scale_count(budget))
            .with_connection_distance(EMBER_CONNECTION_DISTANCE)
            .with_palette(Palette::solid(scheme[0]))
            .with_interactive(config.interactive);
        let constellation_config = FieldConfig::new()
            .with_mode(FieldMode::Constellation)
            .with_count(tier.scale_count(budget + CONSTELLATION_BONUS))
            .with_connection_distance(CONSTELLATION_CONNECTION_DISTANCE)
            .with_palette(Palette::solid(scheme[1]))
            .with_interactive(config.interactive);
        let (embers, constellation) = match seed {
            Some(seed) => (
                ParticleField::seeded(ember_config, seed),
                ParticleField::seeded(constellation_config, seed.wrapping_add(1)),
            ),
            None => (
                ParticleField::new(ember_config),
                ParticleField::new(constellation_config),
            ),
        };

        let liquid = LiquidLayer::new(
            Palette::new(scheme.to_vec()),
            config.intensity,
            config.intensity.morph_secs(),
        )
        .with_blob_count(if tier == QualityTier::Low { 2 } else { 3 });

        let overlay_opacity = config.intensity.overlay_opacity();
        let mut overlays = vec![GeometryOverlay {
            figure: Figure::with_reference_size(Pattern::FlowerOfLife, Complexity::Complex),
            color: scheme[0],
            size: FLOWER_SIZE,
            opacity: overlay_opacity,
            corner: Corner::TopRight,
            overhang: 96.0,
            inset: 64.0,
        }];
        // The low tier keeps only the flower
        if tier != QualityTier::Low {
            overlays.push(GeometryOverlay {
                figure: Figure::with_reference_size(Pattern::GoldenSpiral, Complexity::Medium),
                color: scheme[2],
                size: SPIRAL_SIZE,
                opacity: overlay_opacity * SPIRAL_OPACITY_SCALE,
                corner: Corner::BottomLeft,
                overhang: 80.0,
                inset: 0.0,
            });
        }

        debug!(
            "Assembled {} scene at {} intensity, {} tier",
            config.variant, config.intensity, tier
        );
        Self {
            variant: config.variant,
            intensity: config.intensity,
            tier,
            viewport: Viewport::new(0.0, 0.0),
            liquid,
            embers,
            constellation,
            overlays,
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn variant(&self) -> SceneVariant {
        self.variant
    }

    #[inline]
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    #[inline]
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn liquid(&self) -> &LiquidLayer {
        &self.liquid
    }

    #[inline]
    pub fn embers(&self) -> &ParticleField {
        &self.embers
    }

    #[inline]
    pub fn constellation(&self) -> &ParticleField {
        &self.constellation
    }

    /// Number of geometry overlays in the stack.
    #[inline]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    // ========== Input ==========

    /// Adopt a new surface size and repopulate both fields.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.embers.resize(viewport);
        self.constellation.resize(viewport);
    }

    /// Route a pointer position, in logical pixels, to every layer.
    pub fn pointer_moved(&mut self, logical: Vec2) {
        self.embers.pointer_moved(logical);
        self.constellation.pointer_moved(logical);
        if self.viewport.is_valid() {
            let normalized =
                logical / Vec2::new(self.viewport.width(), self.viewport.height());
            self.liquid.pointer_moved(normalized);
        }
    }

    /// Release the pointer on every layer.
    pub fn pointer_left(&mut self) {
        self.embers.pointer_left();
        self.constellation.pointer_left();
        self.liquid.pointer_left();
    }

    /// Feed a scroll offset to both fields.
    pub fn scrolled(&mut self, offset: f32) {
        self.embers.scrolled(offset);
        self.constellation.scrolled(offset);
    }

    // ========== Frame ==========

    /// Advance every animated layer by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.liquid.advance(dt);
        self.embers.step(dt);
        self.constellation.step(dt);
    }

    /// Paint every layer bottom to top.
    pub fn compose(&self, canvas: &mut Canvas) {
        self.liquid.render(canvas);
        self.embers.render(canvas);
        self.constellation.render(canvas);
        for overlay in &self.overlays {
            overlay.draw(canvas);
        }
    }

    /// Motionless composition for reduced-motion hosts: static washes
    /// and the geometry overlays, no particles.
    pub fn compose_static(&self, canvas: &mut Canvas) {
        self.liquid.render_static(canvas);
        self.embers.render_static(canvas);
        for overlay in &self.overlays {
            overlay.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse_and_display() {
        assert_eq!(
            "philosophy".parse::<SceneVariant>().unwrap(),
            SceneVariant::Philosophy
        );
        assert_eq!(SceneVariant::Cta.to_string(), "cta");
        assert!(matches!(
            "banner".parse::<SceneVariant>(),
            Err(ParseError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_intensity_parse_and_tables() {
        assert_eq!("intense".parse::<Intensity>().unwrap(), Intensity::Intense);
        assert!(matches!(
            "extreme".parse::<Intensity>(),
            Err(ParseError::UnknownIntensity(_))
        ));

        assert_eq!(Intensity::Subtle.morph_secs(), 8.0);
        assert_eq!(Intensity::Subtle.particle_budget(), 150);
        assert_eq!(Intensity::Medium.particle_budget(), 250);
        assert_eq!(Intensity::Intense.particle_budget(), 350);
        assert_eq!(Intensity::Intense.overlay_opacity(), 0.7);
        assert!(Intensity::Intense.blob_scale() > 1.0);
    }

    #[test]
    fn test_every_variant_has_an_opaque_scheme() {
        for variant in SceneVariant::ALL {
            let scheme = variant.color_scheme();
            assert!(scheme.iter().all(|c| c.a == 1.0), "{}", variant);
        }
    }

    #[test]
    fn test_hero_scheme_colors() {
        let scheme = SceneVariant::Hero.color_scheme();
        assert_eq!(scheme[0], Color::PHOENIX_RED);
        assert_eq!(scheme[1], Color::RENAISSANCE_GOLD);
        assert_eq!(scheme[2], Color::COSMIC_DAWN);
    }

    #[test]
    fn test_config_from_toml() {
        let config =
            SceneConfig::from_toml_str("variant = \"vision\"\nintensity = \"intense\"\n")
                .unwrap();
        assert_eq!(config.variant, SceneVariant::Vision);
        assert_eq!(config.intensity, Intensity::Intense);
        assert!(config.interactive);
    }

    #[test]
    fn test_config_defaults_when_empty() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config.variant, SceneVariant::Hero);
        assert_eq!(config.intensity, Intensity::Medium);
    }

    #[test]
    fn test_bad_preset_reports_toml_error() {
        let err = SceneConfig::from_toml_str("variant = \"nope\"").unwrap_err();
        assert!(matches!(err, PresetError::Toml(_)));
    }

    #[test]
    fn test_layer_budgets_follow_intensity_and_tier() {
        let config = SceneConfig::new().with_intensity(Intensity::Medium);
        let scene = Scene::seeded(config.clone(), QualityTier::High, 9);
        assert_eq!(scene.embers().config().count, 250);
        assert_eq!(scene.constellation().config().count, 300);

        let low = Scene::seeded(config, QualityTier::Low, 9);
        assert_eq!(low.embers().config().count, 75);
        assert_eq!(low.constellation().config().count, 90);
    }

    #[test]
    fn test_field_modes_and_thresholds() {
        let scene = Scene::seeded(SceneConfig::new(), QualityTier::High, 5);
        assert_eq!(scene.embers().config().mode, FieldMode::Phoenix);
        assert_eq!(scene.constellation().config().mode, FieldMode::Constellation);
        assert_eq!(scene.embers().config().connection_distance, 120.0);
        assert_eq!(scene.constellation().config().connection_distance, 160.0);
    }

    #[test]
    fn test_low_tier_trims_decorative_layers() {
        let low = Scene::seeded(SceneConfig::new(), QualityTier::Low, 1);
        assert_eq!(low.overlay_count(), 1);
        assert_eq!(low.liquid().blob_count(), 2);

        let full = Scene::seeded(SceneConfig::new(), QualityTier::High, 1);
        assert_eq!(full.overlay_count(), 2);
        assert_eq!(full.liquid().blob_count(), 3);
    }

    #[test]
    fn test_compose_paints_populated_scene() {
        let mut scene = Scene::seeded(SceneConfig::new(), QualityTier::Low, 7);
        scene.resize(Viewport::new(160.0, 100.0));
        scene.advance(1.0 / 60.0);
        let mut canvas = Canvas::new(160, 100);
        scene.compose(&mut canvas);
        assert!(canvas.pixels().iter().any(|p| p.a > 0.0));
    }

    #[test]
    fn test_static_composition_needs_no_stepping() {
        let scene = Scene::seeded(SceneConfig::new(), QualityTier::High, 7);
        let mut canvas = Canvas::new(120, 90);
        scene.compose_static(&mut canvas);
        assert!(canvas.pixels().iter().any(|p| p.a > 0.0));
    }

    #[test]
    fn test_seeded_scenes_match() {
        let mut a = Scene::seeded(SceneConfig::new(), QualityTier::Medium, 11);
        let mut b = Scene::seeded(SceneConfig::new(), QualityTier::Medium, 11);
        a.resize(Viewport::new(320.0, 200.0));
        b.resize(Viewport::new(320.0, 200.0));
        for _ in 0..30 {
            a.advance(1.0 / 60.0);
            b.advance(1.0 / 60.0);
        }
        assert_eq!(a.embers().frame().as_bytes(), b.embers().frame().as_bytes());
        assert_eq!(
            a.constellation().frame().as_bytes(),
            b.constellation().frame().as_bytes()
        );
    }

    #[test]
    fn test_pointer_routes_to_every_layer() {
        let mut scene = Scene::seeded(SceneConfig::new(), QualityTier::High, 3);
        scene.resize(Viewport::new(200.0, 100.0));

        scene.pointer_moved(Vec2::new(200.0, 100.0));
        assert!(scene.embers().pointer_active());
        assert_eq!(scene.liquid().pointer(), Vec2::ONE);

        scene.pointer_left();
        assert!(!scene.embers().pointer_active());
        assert_eq!(scene.liquid().pointer(), Vec2::splat(0.5));
    }
}

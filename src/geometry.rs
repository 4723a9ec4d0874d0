//! Procedural sacred-geometry figures.
//!
//! Each pattern builds a flat list of stroke primitives centered on the
//! origin, sized by a base radius and densified by a complexity tier.
//! Generation is pure: the same inputs always produce the same figure,
//! in the same order, so figures can be cached, diffed or snapshotted.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::geometry::{Complexity, Figure, Pattern};
//!
//! let figure = Figure::with_reference_size(Pattern::FlowerOfLife, Complexity::Simple);
//! assert_eq!(figure.primitives().len(), 7);
//! ```

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use log::debug;

use crate::error::ParseError;

/// The geometry patterns that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// Overlapping circles on a hex lattice.
    FlowerOfLife,
    /// Node rings connected by a proximity graph.
    MetatronsCube,
    /// Logarithmic spiral with concentric reference circles.
    GoldenSpiral,
    /// Nested regular polygons.
    PlatonicSolids,
    /// Two overlapping circles and their lens.
    VesicaPiscis,
    /// Interlocked triangle stack.
    SriYantra,
}

impl Pattern {
    /// All patterns, in a stable order.
    pub const ALL: [Pattern; 6] = [
        Pattern::FlowerOfLife,
        Pattern::MetatronsCube,
        Pattern::GoldenSpiral,
        Pattern::PlatonicSolids,
        Pattern::VesicaPiscis,
        Pattern::SriYantra,
    ];

    /// Kebab-case name used in configs and preset files.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::FlowerOfLife => "flower-of-life",
            Pattern::MetatronsCube => "metatrons-cube",
            Pattern::GoldenSpiral => "golden-spiral",
            Pattern::PlatonicSolids => "platonic-solids",
            Pattern::VesicaPiscis => "vesica-piscis",
            Pattern::SriYantra => "sri-yantra",
        }
    }

    /// The base radius at which the pattern renders at its designed
    /// proportions inside a 240-unit frame.
    pub fn reference_radius(&self) -> f32 {
        match self {
            Pattern::FlowerOfLife => 36.0,
            Pattern::MetatronsCube => 56.0,
            Pattern::GoldenSpiral => 60.0,
            Pattern::PlatonicSolids => 56.0,
            Pattern::VesicaPiscis => 52.0,
            Pattern::SriYantra => 68.0,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flower-of-life" => Ok(Pattern::FlowerOfLife),
            "metatrons-cube" => Ok(Pattern::MetatronsCube),
            "golden-spiral" => Ok(Pattern::GoldenSpiral),
            "platonic-solids" => Ok(Pattern::PlatonicSolids),
            "vesica-piscis" => Ok(Pattern::VesicaPiscis),
            "sri-yantra" => Ok(Pattern::SriYantra),
            _ => Err(ParseError::UnknownPattern(s.to_string())),
        }
    }
}

/// Detail tier controlling ring counts, polygon counts and stroke weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] =
        [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    /// Stroke width in frame units.
    pub fn stroke_width(&self) -> f32 {
        match self {
            Complexity::Simple => 1.2,
            Complexity::Medium => 1.6,
            Complexity::Complex => 2.0,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        };
        f.write_str(name)
    }
}

impl FromStr for Complexity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Complexity::Simple),
            "medium" => Ok(Complexity::Medium),
            "complex" => Ok(Complexity::Complex),
            _ => Err(ParseError::UnknownComplexity(s.to_string())),
        }
    }
}

/// A single stroke primitive, coordinates centered on the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle { center: Vec2, radius: f32 },
    Segment { a: Vec2, b: Vec2 },
    Polygon { vertices: Vec<Vec2> },
    Polyline { points: Vec<Vec2> },
    Ellipse { center: Vec2, rx: f32, ry: f32 },
}

impl Primitive {
    /// Farthest distance from the origin this primitive reaches.
    pub fn reach(&self) -> f32 {
        match self {
            Primitive::Circle { center, radius } => center.length() + radius,
            Primitive::Segment { a, b } => a.length().max(b.length()),
            Primitive::Polygon { vertices } => {
                vertices.iter().map(|v| v.length()).fold(0.0, f32::max)
            }
            Primitive::Polyline { points } => {
                points.iter().map(|p| p.length()).fold(0.0, f32::max)
            }
            Primitive::Ellipse { center, rx, ry } => center.length() + rx.max(*ry),
        }
    }
}

/// An immutable, origin-centered set of stroke primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    primitives: Vec<Primitive>,
    stroke_width: f32,
    frame_half: f32,
}

impl Figure {
    /// Generate a pattern at an explicit base radius.
    ///
    /// The construction scales uniformly by
    /// `base_radius / pattern.reference_radius()`, so passing the
    /// reference radius reproduces the designed proportions exactly.
    pub fn generate(pattern: Pattern, complexity: Complexity, base_radius: f32) -> Self {
        let scale = base_radius / pattern.reference_radius();
        let primitives = match pattern {
            Pattern::FlowerOfLife => flower_of_life(complexity, base_radius),
            Pattern::MetatronsCube => metatrons_cube(complexity, base_radius, scale),
            Pattern::GoldenSpiral => golden_spiral(complexity, base_radius, scale),
            Pattern::PlatonicSolids => platonic_solids(complexity, scale),
            Pattern::VesicaPiscis => vesica_piscis(scale),
            Pattern::SriYantra => sri_yantra(complexity, base_radius, scale),
        };
        Self {
            primitives,
            stroke_width: complexity.stroke_width() * scale,
            frame_half: 120.0 * scale,
        }
    }

    /// Generate a pattern at its designed size (240-unit frame).
    pub fn with_reference_size(pattern: Pattern, complexity: Complexity) -> Self {
        Self::generate(pattern, complexity, pattern.reference_radius())
    }

    /// Lenient string entry point for config-driven hosts.
    ///
    /// An unrecognized pattern name yields an empty figure that renders
    /// nothing, rather than an error.
    pub fn generate_named(name: &str, complexity: Complexity, base_radius: f32) -> Self {
        match name.parse::<Pattern>() {
            Ok(pattern) => Self::generate(pattern, complexity, base_radius),
            Err(_) => {
                debug!("unknown geometry pattern '{}', rendering nothing", name);
                Self::empty(complexity)
            }
        }
    }

    /// A figure with no primitives.
    pub fn empty(complexity: Complexity) -> Self {
        Self {
            primitives: Vec::new(),
            stroke_width: complexity.stroke_width(),
            frame_half: 120.0,
        }
    }

    /// The stroke primitives, in draw order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Stroke width in frame units.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Half-extent of the designed frame. The SVG writer uses this for
    /// the viewBox; primitives may deliberately overreach it and clip.
    pub fn frame_half(&self) -> f32 {
        self.frame_half
    }

    /// Farthest distance from the origin any primitive reaches.
    pub fn extent(&self) -> f32 {
        self.primitives.iter().map(|p| p.reach()).fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

// ========== Pattern constructions ==========

/// Hex-lattice circles. Ring generation visits some lattice points more
/// than once; centers are deduplicated at 0.01-unit tolerance so each
/// circle appears exactly once.
fn flower_of_life(complexity: Complexity, radius: f32) -> Vec<Primitive> {
    let layers = match complexity {
        Complexity::Simple => 1,
        Complexity::Medium => 2,
        Complexity::Complex => 3,
    };
    let d = radius;
    let sqrt3 = 3.0_f32.sqrt();

    let mut centers: Vec<Vec2> = vec![Vec2::ZERO];

    for layer in 1..=layers {
        for i in 0..6 * layer {
            let angle = (PI / 3.0) * i as f32;
            let dist = d * layer as f32;
            centers.push(Vec2::new(angle.cos() * dist, angle.sin() * dist));
        }
    }

    if layers >= 2 {
        let offsets = [
            Vec2::new(d * 2.0, 0.0),
            Vec2::new(-d * 2.0, 0.0),
            Vec2::new(d, d * sqrt3),
            Vec2::new(-d, d * sqrt3),
            Vec2::new(d, -d * sqrt3),
            Vec2::new(-d, -d * sqrt3),
        ];
        centers.extend_from_slice(&offsets);
        if layers >= 3 {
            centers.extend(offsets.iter().map(|p| *p * 1.5));
        }
    }

    let mut seen = std::collections::HashSet::new();
    centers
        .into_iter()
        .filter(|c| seen.insert(center_key(*c)))
        .map(|center| Primitive::Circle { center, radius })
        .collect()
}

/// Quantized center used to collapse coincident circles.
fn center_key(c: Vec2) -> (i64, i64) {
    ((c.x * 100.0).round() as i64, (c.y * 100.0).round() as i64)
}

fn metatrons_cube(complexity: Complexity, radius: f32, scale: f32) -> Vec<Primitive> {
    let layers = match complexity {
        Complexity::Simple => 1,
        Complexity::Medium => 2,
        Complexity::Complex => 3,
    };

    let mut points: Vec<Vec2> = vec![Vec2::ZERO];
    for layer in 1..=layers {
        let count = if layer == 1 { 6 } else { 12 };
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let dist = radius * layer as f32 / layers as f32;
            points.push(Vec2::new(angle.cos() * dist, angle.sin() * dist));
        }
    }

    let mut primitives = Vec::new();
    // Proximity graph: connect every pair closer than 1.2 radii.
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if points[i].distance(points[j]) <= radius * 1.2 {
                primitives.push(Primitive::Segment {
                    a: points[i],
                    b: points[j],
                });
            }
        }
    }
    for (index, point) in points.iter().enumerate() {
        primitives.push(Primitive::Circle {
            center: *point,
            radius: if index == 0 { 6.0 * scale } else { 4.0 * scale },
        });
    }
    primitives
}

fn golden_spiral(complexity: Complexity, radius: f32, scale: f32) -> Vec<Primitive> {
    let turns = match complexity {
        Complexity::Simple => 2,
        Complexity::Medium => 3,
        Complexity::Complex => 4,
    };
    let total = turns * 90;
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let points: Vec<Vec2> = (0..=total)
        .map(|i| {
            let theta = (i as f32 / total as f32) * TAU * turns as f32;
            let r = radius * phi.powf(theta / TAU);
            Vec2::new(theta.cos() * r, theta.sin() * r)
        })
        .collect();

    let mut primitives = vec![Primitive::Polyline { points }];
    for idx in 0..turns + 2 {
        primitives.push(Primitive::Circle {
            center: Vec2::ZERO,
            radius: 34.0 * 1.618_f32.powi(idx as i32) * scale,
        });
    }
    primitives
}

fn platonic_solids(complexity: Complexity, scale: f32) -> Vec<Primitive> {
    let polygons: &[(u32, f32)] = match complexity {
        Complexity::Simple => &[(4, 46.0), (3, 32.0)],
        Complexity::Medium => &[(4, 52.0), (3, 36.0), (6, 62.0)],
        Complexity::Complex => &[(4, 54.0), (3, 40.0), (6, 64.0), (5, 72.0)],
    };

    polygons
        .iter()
        .map(|&(sides, radius)| {
            let vertices = (0..sides)
                .map(|vertex| {
                    let angle = TAU * vertex as f32 / sides as f32 - PI / 2.0;
                    Vec2::new(angle.cos(), angle.sin()) * radius * scale
                })
                .collect();
            Primitive::Polygon { vertices }
        })
        .collect()
}

fn vesica_piscis(scale: f32) -> Vec<Primitive> {
    vec![
        Primitive::Circle {
            center: Vec2::new(-26.0 * scale, 0.0),
            radius: 56.0 * scale,
        },
        Primitive::Circle {
            center: Vec2::new(26.0 * scale, 0.0),
            radius: 56.0 * scale,
        },
        Primitive::Ellipse {
            center: Vec2::ZERO,
            rx: 58.0 * scale,
            ry: 28.0 * scale,
        },
    ]
}

fn sri_yantra(complexity: Complexity, radius: f32, scale: f32) -> Vec<Primitive> {
    let layers = match complexity {
        Complexity::Simple => 3,
        Complexity::Medium => 5,
        Complexity::Complex => 7,
    };

    let mut primitives = Vec::new();
    for i in 0..layers {
        let s = 1.0 - i as f32 / (layers + 1) as f32;
        let r = radius * s;
        primitives.push(Primitive::Polygon {
            vertices: vec![
                Vec2::new(0.0, -r),
                Vec2::new(-r * 0.9, r * 0.6),
                Vec2::new(r * 0.9, r * 0.6),
            ],
        });
        primitives.push(Primitive::Polygon {
            vertices: vec![
                Vec2::new(0.0, r),
                Vec2::new(-r * 0.9, -r * 0.6),
                Vec2::new(r * 0.9, -r * 0.6),
            ],
        });
    }
    primitives.push(Primitive::Circle {
        center: Vec2::ZERO,
        radius: 72.0 * scale,
    });
    primitives.push(Primitive::Circle {
        center: Vec2::ZERO,
        radius: 16.0 * scale,
    });
    primitives
}

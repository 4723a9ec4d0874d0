//! Deterministic SVG writer for geometry figures.
//!
//! Produces a standalone document with a radial gradient stroke fading
//! center-outward and an optional Gaussian glow. Output depends only on
//! the figure and the options, so documents can be snapshot-tested byte
//! for byte.
//!
//! Figures are stroked against a symmetric viewBox taken from the
//! figure's frame; primitives that overreach the frame clip, which is
//! part of the look.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::geometry::{Complexity, Figure, Pattern};
//! use emberfield::svg::{self, SvgOptions};
//!
//! let figure = Figure::with_reference_size(Pattern::GoldenSpiral, Complexity::Medium);
//! let doc = svg::document(&figure, &SvgOptions::new().with_id_prefix("hero"));
//! assert!(doc.starts_with("<svg"));
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::color::Palette;
use crate::error::ExportError;
use crate::geometry::{Figure, Primitive};

/// Rendering options for [`document`].
#[derive(Debug, Clone)]
pub struct SvgOptions {
    size: f32,
    palette: Palette,
    id_prefix: String,
    glow: bool,
    opacity: f32,
}

impl SvgOptions {
    pub fn new() -> Self {
        Self {
            size: 240.0,
            palette: Palette::arcane(),
            id_prefix: "emberfield".to_string(),
            glow: true,
            opacity: 0.92,
        }
    }

    /// Rendered width and height in pixels.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Gradient stops for the stroke.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Prefix for `defs` ids. Give each document embedded in a page its
    /// own prefix so gradient and filter references do not collide.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Enable or disable the Gaussian glow filter.
    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    /// Opacity of the stroke group.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a figure to a complete SVG document.
pub fn document(figure: &Figure, options: &SvgOptions) -> String {
    let half = figure.frame_half();
    let prefix = options.id_prefix.as_str();
    let mut out = String::with_capacity(1024);

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        num(options.size),
        num(options.size),
        num(-half),
        num(-half),
        num(half * 2.0),
        num(half * 2.0),
    );

    out.push_str("  <defs>\n");
    let _ = writeln!(
        out,
        "    <radialGradient id=\"{}-grad\" cx=\"50%\" cy=\"50%\" r=\"65%\">",
        prefix
    );
    let stops = options.palette.stops();
    let last = stops.len().saturating_sub(1).max(1);
    for (i, color) in stops.iter().enumerate() {
        let [r, g, b, _] = color.to_rgba8();
        let _ = writeln!(
            out,
            "      <stop offset=\"{}%\" stop-color=\"#{:02x}{:02x}{:02x}\" stop-opacity=\"{}\"/>",
            num(i as f32 / last as f32 * 100.0),
            r,
            g,
            b,
            num((0.9 - 0.15 * i as f32).max(0.0)),
        );
    }
    out.push_str("    </radialGradient>\n");
    if options.glow {
        // Blur radius tracks the frame so the halo keeps its proportion
        // at any base radius.
        let _ = writeln!(out, "    <filter id=\"{}-glow\">", prefix);
        let _ = writeln!(
            out,
            "      <feGaussianBlur stdDeviation=\"{}\" result=\"blur\"/>",
            num(half / 10.0)
        );
        out.push_str("      <feMerge>\n");
        out.push_str("        <feMergeNode in=\"blur\"/>\n");
        out.push_str("        <feMergeNode in=\"SourceGraphic\"/>\n");
        out.push_str("      </feMerge>\n");
        out.push_str("    </filter>\n");
    }
    out.push_str("  </defs>\n");

    let filter = if options.glow {
        format!(" filter=\"url(#{}-glow)\"", prefix)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "  <g fill=\"none\" stroke=\"url(#{}-grad)\" stroke-width=\"{}\"{} opacity=\"{}\">",
        prefix,
        num(figure.stroke_width()),
        filter,
        num(options.opacity),
    );

    for primitive in figure.primitives() {
        write_primitive(&mut out, primitive);
    }

    out.push_str("  </g>\n");
    out.push_str("</svg>\n");
    out
}

/// Render a figure and write the document to disk.
pub fn save(figure: &Figure, options: &SvgOptions, path: impl AsRef<Path>) -> Result<(), ExportError> {
    std::fs::write(path, document(figure, options))?;
    Ok(())
}

fn write_primitive(out: &mut String, primitive: &Primitive) {
    match primitive {
        Primitive::Circle { center, radius } => {
            let _ = writeln!(
                out,
                "    <circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                num(center.x),
                num(center.y),
                num(*radius),
            );
        }
        Primitive::Segment { a, b } => {
            let _ = writeln!(
                out,
                "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y),
            );
        }
        Primitive::Polygon { vertices } => {
            let points: Vec<String> = vertices
                .iter()
                .map(|v| format!("{:.3},{:.3}", v.x, v.y))
                .collect();
            let _ = writeln!(out, "    <polygon points=\"{}\"/>", points.join(" "));
        }
        Primitive::Polyline { points } => {
            let mut d = String::with_capacity(points.len() * 16);
            for (i, point) in points.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{} {:.3},{:.3} ", command, point.x, point.y);
            }
            let _ = writeln!(out, "    <path d=\"{}\"/>", d.trim_end());
        }
        Primitive::Ellipse { center, rx, ry } => {
            let _ = writeln!(
                out,
                "    <ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"/>",
                num(center.x),
                num(center.y),
                num(*rx),
                num(*ry),
            );
        }
    }
}

/// Attribute number formatting: at most three decimals, trailing zeros
/// trimmed.
fn num(value: f32) -> String {
    let mut s = format!("{:.3}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s.truncate(0);
        s.push('0');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Complexity, Pattern};

    #[test]
    fn test_document_is_deterministic() {
        let figure = Figure::with_reference_size(Pattern::SriYantra, Complexity::Medium);
        let options = SvgOptions::new();
        assert_eq!(document(&figure, &options), document(&figure, &options));
    }

    #[test]
    fn test_simple_flower_emits_seven_circles() {
        let figure = Figure::with_reference_size(Pattern::FlowerOfLife, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new());
        assert_eq!(doc.matches("<circle").count(), 7);
        assert!(doc.contains("viewBox=\"-120 -120 240 240\""));
    }

    #[test]
    fn test_id_prefix_wires_defs_references() {
        let figure = Figure::with_reference_size(Pattern::VesicaPiscis, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new().with_id_prefix("hero"));
        assert!(doc.contains("id=\"hero-grad\""));
        assert!(doc.contains("stroke=\"url(#hero-grad)\""));
        assert!(doc.contains("id=\"hero-glow\""));
        assert!(doc.contains("filter=\"url(#hero-glow)\""));
    }

    #[test]
    fn test_stroke_gradient_fades_from_center() {
        let figure = Figure::with_reference_size(Pattern::FlowerOfLife, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new());
        assert!(doc.contains("<radialGradient id=\"emberfield-grad\" cx=\"50%\" cy=\"50%\" r=\"65%\">"));
        assert!(doc.contains("</radialGradient>"));
        assert!(!doc.contains("<linearGradient"));
    }

    #[test]
    fn test_glow_can_be_disabled() {
        let figure = Figure::with_reference_size(Pattern::VesicaPiscis, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new().with_glow(false));
        assert!(!doc.contains("<filter"));
        assert!(!doc.contains("filter=\"url"));
    }

    #[test]
    fn test_gradient_stop_opacities_fade() {
        let figure = Figure::with_reference_size(Pattern::FlowerOfLife, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new());
        assert!(doc.contains("stop-opacity=\"0.9\""));
        assert!(doc.contains("stop-opacity=\"0.75\""));
        assert!(doc.contains("stop-opacity=\"0.6\""));
    }

    #[test]
    fn test_spiral_path_uses_three_decimals() {
        let figure = Figure::with_reference_size(Pattern::GoldenSpiral, Complexity::Simple);
        let doc = document(&figure, &SvgOptions::new());
        assert!(doc.contains("<path d=\"M 60.000,0.000 L "));
    }

    #[test]
    fn test_empty_figure_is_still_a_document() {
        let figure = Figure::empty(Complexity::Medium);
        let doc = document(&figure, &SvgOptions::new());
        assert!(doc.starts_with("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert!(!doc.contains("<circle"));
    }
}

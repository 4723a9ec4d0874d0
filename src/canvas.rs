//! Software raster surface.
//!
//! [`Canvas`] owns an RGBA f32 pixel buffer and provides the small set
//! of antialiased draw operations the layers need: soft discs and
//! squares for particles, stroked primitives for geometry overlays and
//! full-surface radial gradients for backdrops. Every operation takes a
//! [`BlendMode`] and clips itself, so drawing against a zero-sized or
//! too-small surface is a no-op rather than an error.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::canvas::Canvas;
//! use emberfield::color::{BlendMode, Color};
//! use glam::Vec2;
//!
//! let mut canvas = Canvas::new(640, 360);
//! canvas.clear(Color::BLACK);
//! canvas.fill_disc_soft(Vec2::new(320.0, 180.0), 4.0, 24.0, Color::PHOENIX_RED, BlendMode::Alpha);
//! canvas.save_png("frame.png")?;
//! ```

use std::path::Path;

use glam::Vec2;
use image::{ImageBuffer, Rgba, RgbaImage};

use crate::color::{BlendMode, Color};
use crate::error::ExportError;

/// An owned RGBA surface with f32 channels in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    /// Per-shape coverage scratch so multi-segment strokes blend once
    /// per pixel instead of once per segment.
    scratch: Vec<f32>,
}

impl Canvas {
    /// Create a surface of the given size, cleared to transparent.
    /// A zero dimension yields an empty surface that ignores draws.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; len],
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Surface extent as a vector, handy for layout math.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Read one pixel; `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Reallocate to a new size, clearing to transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), Color::TRANSPARENT);
        self.scratch.clear();
    }

    /// Fill the whole surface with a flat color, replacing content.
    pub fn clear(&mut self, color: Color) {
        for pixel in &mut self.pixels {
            *pixel = color;
        }
    }

    // ========== Fills ==========

    /// Fill the entire surface with a radial gradient centered at
    /// `center`, interpolating `stops` (offset in `[0, 1]`, color) over
    /// `radius`. Pixels past the last stop take its color, so a
    /// trailing transparent stop confines the gradient to a blob.
    pub fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        radius: f32,
        stops: &[(f32, Color)],
        mode: BlendMode,
    ) {
        if self.pixels.is_empty() || stops.is_empty() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = p.distance(center) / radius;
                let color = sample_stops(stops, t);
                if color.a > 0.0 {
                    let idx = (y * self.width + x) as usize;
                    self.pixels[idx] = blend(self.pixels[idx], color, mode);
                }
            }
        }
    }

    /// Disc of `radius` whose alpha falls off linearly toward
    /// `falloff_radius`, like a glow sampled inside a hard rim.
    /// `falloff_radius <= radius` paints a flat disc.
    pub fn fill_disc_soft(
        &mut self,
        center: Vec2,
        radius: f32,
        falloff_radius: f32,
        color: Color,
        mode: BlendMode,
    ) {
        if self.pixels.is_empty() || !finite(center) || radius <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = match self.clip_box(center, Vec2::splat(radius + 1.0)) {
            Some(bounds) => bounds,
            None => return,
        };
        let falloff = falloff_radius.max(radius);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let fade = (1.0 - d / falloff).max(0.0);
                    let alpha = color.a * coverage * fade;
                    if alpha > 0.0 {
                        let idx = (y as u32 * self.width + x as u32) as usize;
                        self.pixels[idx] = blend(self.pixels[idx], color.with_alpha(alpha), mode);
                    }
                }
            }
        }
    }

    /// Axis-aligned rectangle around `center` whose alpha falls off
    /// radially toward `falloff_radius`.
    pub fn fill_rect_soft(
        &mut self,
        center: Vec2,
        half_extent: Vec2,
        falloff_radius: f32,
        color: Color,
        mode: BlendMode,
    ) {
        if self.pixels.is_empty() || !finite(center) || half_extent.x <= 0.0 || half_extent.y <= 0.0
        {
            return;
        }
        let (x0, y0, x1, y1) = match self.clip_box(center, half_extent + Vec2::splat(1.0)) {
            Some(bounds) => bounds,
            None => return,
        };
        let falloff = falloff_radius.max(half_extent.x.max(half_extent.y));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let cover_x = (half_extent.x + 0.5 - (p.x - center.x).abs()).clamp(0.0, 1.0);
                let cover_y = (half_extent.y + 0.5 - (p.y - center.y).abs()).clamp(0.0, 1.0);
                let coverage = cover_x * cover_y;
                if coverage > 0.0 {
                    let fade = (1.0 - p.distance(center) / falloff).max(0.0);
                    let alpha = color.a * coverage * fade;
                    if alpha > 0.0 {
                        let idx = (y as u32 * self.width + x as u32) as usize;
                        self.pixels[idx] = blend(self.pixels[idx], color.with_alpha(alpha), mode);
                    }
                }
            }
        }
    }

    // ========== Strokes ==========

    /// Stroke a single segment with round caps.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color, mode: BlendMode) {
        self.stroke_path(&[a, b], false, width, color, mode);
    }

    /// Stroke an open polyline as one shape (joints blend once).
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color, mode: BlendMode) {
        self.stroke_path(points, false, width, color, mode);
    }

    /// Stroke a closed polygon outline.
    pub fn stroke_polygon(&mut self, vertices: &[Vec2], width: f32, color: Color, mode: BlendMode) {
        self.stroke_path(vertices, true, width, color, mode);
    }

    /// Stroke a circle outline.
    pub fn stroke_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
        mode: BlendMode,
    ) {
        if self.pixels.is_empty() || !finite(center) || radius <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let reach = radius + half + 1.0;
        let (x0, y0, x1, y1) = match self.clip_box(center, Vec2::splat(reach)) {
            Some(bounds) => bounds,
            None => return,
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = (p.distance(center) - radius).abs();
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let idx = (y as u32 * self.width + x as u32) as usize;
                    self.pixels[idx] =
                        blend(self.pixels[idx], color.with_alpha(color.a * coverage), mode);
                }
            }
        }
    }

    /// Stroke an ellipse outline, approximated as a closed polyline.
    pub fn stroke_ellipse(
        &mut self,
        center: Vec2,
        rx: f32,
        ry: f32,
        width: f32,
        color: Color,
        mode: BlendMode,
    ) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        const SEGMENTS: usize = 96;
        let points: Vec<Vec2> = (0..SEGMENTS)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / SEGMENTS as f32;
                center + Vec2::new(angle.cos() * rx, angle.sin() * ry)
            })
            .collect();
        self.stroke_path(&points, true, width, color, mode);
    }

    fn stroke_path(
        &mut self,
        points: &[Vec2],
        closed: bool,
        width: f32,
        color: Color,
        mode: BlendMode,
    ) {
        if self.pixels.is_empty() || points.len() < 2 || width <= 0.0 {
            return;
        }
        if points.iter().any(|p| !finite(*p)) {
            return;
        }
        let half = width * 0.5;

        if self.scratch.len() != self.pixels.len() {
            self.scratch = vec![0.0; self.pixels.len()];
        } else {
            self.scratch.fill(0.0);
        }

        let mut touched: Option<(i32, i32, i32, i32)> = None;
        let segment_count = if closed { points.len() } else { points.len() - 1 };
        for s in 0..segment_count {
            let a = points[s];
            let b = points[(s + 1) % points.len()];
            let lo = a.min(b) - Vec2::splat(half + 1.0);
            let hi = a.max(b) + Vec2::splat(half + 1.0);
            let center = (lo + hi) * 0.5;
            let (x0, y0, x1, y1) = match self.clip_box(center, (hi - lo) * 0.5) {
                Some(bounds) => bounds,
                None => continue,
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let coverage = (half + 0.5 - segment_distance(p, a, b)).clamp(0.0, 1.0);
                    if coverage > 0.0 {
                        let idx = (y as u32 * self.width + x as u32) as usize;
                        if coverage > self.scratch[idx] {
                            self.scratch[idx] = coverage;
                        }
                    }
                }
            }
            touched = Some(match touched {
                Some((tx0, ty0, tx1, ty1)) => (tx0.min(x0), ty0.min(y0), tx1.max(x1), ty1.max(y1)),
                None => (x0, y0, x1, y1),
            });
        }

        if let Some((x0, y0, x1, y1)) = touched {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let idx = (y as u32 * self.width + x as u32) as usize;
                    let coverage = self.scratch[idx];
                    if coverage > 0.0 {
                        self.pixels[idx] =
                            blend(self.pixels[idx], color.with_alpha(color.a * coverage), mode);
                    }
                }
            }
        }
    }

    // ========== Export ==========

    /// Convert to an 8-bit RGBA image.
    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width.max(1), self.height.max(1), |x, y| {
            match self.pixel(x, y) {
                Some(color) => Rgba(color.to_rgba8()),
                None => Rgba([0, 0, 0, 0]),
            }
        })
    }

    /// Encode the surface as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::EmptyCanvas);
        }
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Clamp a box around `center` to the surface; `None` when fully
    /// outside.
    fn clip_box(&self, center: Vec2, half_extent: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = ((center.x - half_extent.x).floor() as i32).max(0);
        let y0 = ((center.y - half_extent.y).floor() as i32).max(0);
        let x1 = ((center.x + half_extent.x).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((center.y + half_extent.y).ceil() as i32).min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}

fn finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared().max(f32::EPSILON)).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Piecewise-linear interpolation over sorted gradient stops.
fn sample_stops(stops: &[(f32, Color)], t: f32) -> Color {
    match stops {
        [] => Color::TRANSPARENT,
        [only] => only.1,
        _ => {
            if t <= stops[0].0 {
                return stops[0].1;
            }
            for pair in stops.windows(2) {
                let (o0, c0) = pair[0];
                let (o1, c1) = pair[1];
                if t <= o1 {
                    let span = (o1 - o0).max(f32::EPSILON);
                    return c0.lerp(c1, (t - o0) / span);
                }
            }
            stops[stops.len() - 1].1
        }
    }
}

fn blend(dst: Color, src: Color, mode: BlendMode) -> Color {
    let a = src.a.clamp(0.0, 1.0);
    match mode {
        BlendMode::Alpha => Color {
            r: src.r * a + dst.r * (1.0 - a),
            g: src.g * a + dst.g * (1.0 - a),
            b: src.b * a + dst.b * (1.0 - a),
            a: a + dst.a * (1.0 - a),
        },
        BlendMode::Additive => Color {
            r: (dst.r + src.r * a).min(1.0),
            g: (dst.g + src.g * a).min(1.0),
            b: (dst.b + src.b * a).min(1.0),
            a: (dst.a + a).min(1.0),
        },
        BlendMode::Screen => Color {
            r: 1.0 - (1.0 - dst.r) * (1.0 - src.r * a),
            g: 1.0 - (1.0 - dst.g) * (1.0 - src.g * a),
            b: 1.0 - (1.0 - dst.b) * (1.0 - src.b * a),
            a: a + dst.a * (1.0 - a),
        },
    }
}

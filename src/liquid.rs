//! Liquid gradient backdrop.
//!
//! Three oversized radial-gradient blobs drift on mirrored cycles and
//! composite with screen blending over a pointer-following color wash.
//! Everything is a pure function of accumulated time, so two layers
//! advanced by the same deltas paint identical pixels.

use std::f32::consts::PI;

use glam::Vec2;

use crate::canvas::Canvas;
use crate::color::{BlendMode, Color, Palette};
use crate::scene::Intensity;

/// Mirrored drift keyframes per blob, in surface pixels.
const LAYER_OFFSETS: [([f32; 2], [f32; 2]); 3] = [
    ([-16.0, 14.0], [-10.0, 18.0]),
    ([12.0, -18.0], [20.0, -14.0]),
    ([-10.0, 8.0], [18.0, -22.0]),
];
/// Opacity of each blob gradient at its center.
const BLOB_OPACITY: f32 = 0.75;
/// Each successive blob cycles this much slower.
const BLOB_STAGGER_SECS: f32 = 2.4;
/// Fraction of the blob rect where its gradient reaches transparent.
const BLOB_EDGE: f32 = 0.65;

/// A drifting multi-blob gradient layer.
#[derive(Debug, Clone)]
pub struct LiquidLayer {
    palette: Palette,
    intensity: Intensity,
    speed: f32,
    blob_count: usize,
    pointer: Vec2,
    elapsed: f32,
}

impl LiquidLayer {
    /// A layer cycling over `speed` seconds. The palette paints one
    /// blob per stop (up to three).
    pub fn new(palette: Palette, intensity: Intensity, speed: f32) -> Self {
        Self {
            blob_count: palette.len().min(LAYER_OFFSETS.len()),
            palette,
            intensity,
            speed: speed.max(0.1),
            pointer: Vec2::splat(0.5),
            elapsed: 0.0,
        }
    }

    /// Limit how many blobs render; low quality tiers drop one.
    pub fn with_blob_count(mut self, count: usize) -> Self {
        self.blob_count = count.min(LAYER_OFFSETS.len());
        self
    }

    #[inline]
    pub fn blob_count(&self) -> usize {
        self.blob_count
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current wash center, normalized to `[0, 1]`.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Advance the morph cycle.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Steer the color wash; coordinates normalized to `[0, 1]`.
    pub fn pointer_moved(&mut self, normalized: Vec2) {
        self.pointer = normalized.clamp(Vec2::ZERO, Vec2::ONE);
    }

    /// Recenter the color wash.
    pub fn pointer_left(&mut self) {
        self.pointer = Vec2::splat(0.5);
    }

    /// Paint the animated layer: the pointer wash, then each blob with
    /// screen blending.
    pub fn render(&self, canvas: &mut Canvas) {
        let extent = canvas.extent();
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return;
        }

        // The wash tracks the pointer across most of the surface
        let wash_center = Vec2::new(
            (0.10 + self.pointer.x * 0.80) * extent.x,
            (0.12 + self.pointer.y * 0.76) * extent.y,
        );
        let primary = self.palette.primary();
        canvas.fill_radial_gradient(
            wash_center,
            farthest_corner(wash_center, extent),
            &[(0.0, primary), (BLOB_EDGE, primary.with_alpha(0.0))],
            BlendMode::Alpha,
        );

        let blob_extent = extent * self.intensity.blob_scale();
        for index in 0..self.blob_count {
            let color = self.blob_color(index);
            let (dx, dy) = LAYER_OFFSETS[index % LAYER_OFFSETS.len()];
            let period = self.speed + index as f32 * BLOB_STAGGER_SECS;
            // Mirrored ease: out over one period, back over the next
            let u = 0.5 - 0.5 * (PI * self.elapsed / period).cos();
            let drift = Vec2::new(
                dx[0] + (dx[1] - dx[0]) * u,
                dy[0] + (dy[1] - dy[0]) * u,
            );
            let center = blob_extent * 0.3 + drift;
            canvas.fill_radial_gradient(
                center,
                (blob_extent * 0.7).length(),
                &[
                    (0.0, color.with_alpha(BLOB_OPACITY)),
                    (BLOB_EDGE, color.with_alpha(0.0)),
                ],
                BlendMode::Screen,
            );
        }
    }

    /// Paint the motionless fallback: two fixed washes, no blobs.
    pub fn render_static(&self, canvas: &mut Canvas) {
        let extent = canvas.extent();
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return;
        }
        let first = self.palette.primary();
        let second = self.blob_color(1);

        let near = Vec2::new(extent.x * 0.3, extent.y * 0.3);
        canvas.fill_radial_gradient(
            near,
            farthest_corner(near, extent),
            &[(0.0, first), (0.55, first.with_alpha(0.0))],
            BlendMode::Alpha,
        );
        let far = Vec2::new(extent.x * 0.7, extent.y * 0.6);
        canvas.fill_radial_gradient(
            far,
            farthest_corner(far, extent),
            &[(0.0, second), (0.60, second.with_alpha(0.0))],
            BlendMode::Alpha,
        );
    }

    fn blob_color(&self, index: usize) -> Color {
        let stops = self.palette.stops();
        stops[index % stops.len().max(1)]
    }
}

/// Distance from a point to the farthest surface corner, the radius a
/// CSS-style cover gradient would use.
fn farthest_corner(center: Vec2, extent: Vec2) -> f32 {
    let dx = center.x.max(extent.x - center.x);
    let dy = center.y.max(extent.y - center.y);
    Vec2::new(dx, dy).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> LiquidLayer {
        LiquidLayer::new(Palette::ember(), Intensity::Medium, 12.0)
    }

    #[test]
    fn test_defaults() {
        let liquid = layer();
        assert_eq!(liquid.blob_count(), 3);
        assert_eq!(liquid.elapsed(), 0.0);
    }

    #[test]
    fn test_advance_ignores_bad_deltas() {
        let mut liquid = layer();
        liquid.advance(-1.0);
        liquid.advance(f32::NAN);
        assert_eq!(liquid.elapsed(), 0.0);
        liquid.advance(0.5);
        assert_eq!(liquid.elapsed(), 0.5);
    }

    #[test]
    fn test_render_paints_screen_blended_blobs() {
        let mut canvas = Canvas::new(120, 80);
        let liquid = layer();
        liquid.render(&mut canvas);
        // Blob center region (30% of the scaled rect) must be lit
        assert!(canvas.pixel(34, 22).unwrap().a > 0.0);
    }

    #[test]
    fn test_mirrored_cycle_repeats() {
        let mut canvas_start = Canvas::new(64, 48);
        let mut canvas_cycle = Canvas::new(64, 48);

        let liquid = LiquidLayer::new(Palette::solid(Color::PHOENIX_RED), Intensity::Medium, 4.0);
        liquid.render(&mut canvas_start);

        let mut later = liquid.clone();
        later.advance(8.0);
        later.render(&mut canvas_cycle);

        // One blob, period 4 s: out and back in 8 s
        for (a, b) in canvas_start.pixels().iter().zip(canvas_cycle.pixels()) {
            assert!((a.r - b.r).abs() < 1e-4);
            assert!((a.a - b.a).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pointer_moves_the_wash() {
        let mut liquid = layer();
        let mut left = Canvas::new(100, 60);
        let mut right = Canvas::new(100, 60);

        liquid.pointer_moved(Vec2::new(0.0, 0.5));
        liquid.render(&mut left);
        liquid.pointer_moved(Vec2::new(5.0, 0.5));
        liquid.render(&mut right);

        // Clamped to 1.0, so the wash center sits at 90% width
        assert!(right.pixel(90, 35).unwrap().a >= left.pixel(90, 35).unwrap().a);

        liquid.pointer_left();
        assert_eq!(liquid.pointer, Vec2::splat(0.5));
    }

    #[test]
    fn test_static_fallback_uses_two_washes() {
        let mut canvas = Canvas::new(100, 100);
        layer().render_static(&mut canvas);
        assert!(canvas.pixel(30, 30).unwrap().a > 0.0);
        assert!(canvas.pixel(70, 60).unwrap().a > 0.0);
    }

    #[test]
    fn test_blob_count_caps_at_offsets() {
        let liquid = layer().with_blob_count(9);
        assert_eq!(liquid.blob_count(), 3);
        let trimmed = layer().with_blob_count(2);
        assert_eq!(trimmed.blob_count(), 2);
    }
}

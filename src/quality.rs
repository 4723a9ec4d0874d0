//! Device signals and the render quality policy.
//!
//! [`DeviceProfile`] captures the coarse capability signals a host can
//! observe, [`QualityTier`] turns them into budget multipliers, and
//! [`FpsGovernor`] sheds load at runtime when the frame rate drops.
//!
//! The governor only ever degrades. Climbing back up right after
//! shedding load makes the tier oscillate, so a degraded tier sticks
//! until teardown.

use std::fmt;

use log::{info, warn};

/// Fps below this floor triggers a degradation.
const FPS_FLOOR: f32 = 30.0;
/// Measurement window for one fps estimate.
const WINDOW_SECS: f32 = 1.0;

/// Coarse device capability signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub is_mobile: bool,
    /// The user asked for reduced motion; hosts render a static frame
    /// instead of animating.
    pub reduced_motion: bool,
}

impl DeviceProfile {
    /// Probe what the process can see. Core count comes from the OS;
    /// memory and form factor have no portable source and keep the
    /// conservative defaults.
    pub fn detect() -> Self {
        let cpu_cores = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4);
        Self {
            cpu_cores,
            ..Self::default()
        }
    }

    pub fn with_cpu_cores(mut self, cores: u32) -> Self {
        self.cpu_cores = cores;
        self
    }

    pub fn with_memory_gb(mut self, memory_gb: u32) -> Self {
        self.memory_gb = memory_gb;
        self
    }

    pub fn with_mobile(mut self, mobile: bool) -> Self {
        self.is_mobile = mobile;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Map the signals to a starting tier.
    pub fn quality_tier(&self) -> QualityTier {
        if self.is_mobile || self.cpu_cores < 4 || self.memory_gb < 4 {
            QualityTier::Low
        } else if self.cpu_cores < 8 || self.memory_gb < 8 {
            QualityTier::Medium
        } else {
            QualityTier::High
        }
    }
}

impl Default for DeviceProfile {
    /// The assumption made when nothing can be probed: a modest
    /// 4-core, 4 GB desktop without motion preferences.
    fn default() -> Self {
        Self {
            cpu_cores: 4,
            memory_gb: 4,
            is_mobile: false,
            reduced_motion: false,
        }
    }
}

/// Render quality tier, ordered `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn name(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    /// Multiplier on particle populations.
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityTier::Low => 0.3,
            QualityTier::Medium => 0.6,
            QualityTier::High => 1.0,
        }
    }

    /// Multiplier on decorative detail (blob counts, overlay density).
    pub fn detail_scale(&self) -> f32 {
        match self {
            QualityTier::Low => 0.2,
            QualityTier::Medium => 0.5,
            QualityTier::High => 1.0,
        }
    }

    /// Apply the particle budget to a designed count.
    pub fn scale_count(&self, count: usize) -> usize {
        (count as f32 * self.particle_scale()).floor() as usize
    }

    /// One step down; `Low` stays `Low`.
    pub fn degrade(&self) -> QualityTier {
        match self {
            QualityTier::High => QualityTier::Medium,
            QualityTier::Medium | QualityTier::Low => QualityTier::Low,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Degrade-only quality governor fed by frame deltas.
///
/// Frames accumulate into one-second windows; when a window's average
/// fps lands below the floor the tier steps down one level and the new
/// tier is reported so the host can shrink its populations.
#[derive(Debug)]
pub struct FpsGovernor {
    tier: QualityTier,
    frame_count: u32,
    window_secs: f32,
    fps: f32,
}

impl FpsGovernor {
    pub fn new(tier: QualityTier) -> Self {
        Self {
            tier,
            frame_count: 0,
            window_secs: 0.0,
            fps: 60.0,
        }
    }

    /// Record one frame of `dt` seconds. Returns the new tier when this
    /// sample closed a window on a degradation.
    pub fn sample(&mut self, dt: f32) -> Option<QualityTier> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        self.frame_count += 1;
        self.window_secs += dt;
        if self.window_secs < WINDOW_SECS {
            return None;
        }

        self.fps = (self.frame_count as f32 / self.window_secs).round();
        self.frame_count = 0;
        self.window_secs = 0.0;

        if self.fps < FPS_FLOOR {
            warn!("low fps detected: {}", self.fps);
            if self.tier != QualityTier::Low {
                let degraded = self.tier.degrade();
                info!(
                    "render quality {} -> {} at {} fps",
                    self.tier, degraded, self.fps
                );
                self.tier = degraded;
                return Some(degraded);
            }
        }
        None
    }

    #[inline]
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Last measured fps (60 until the first window closes).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        let desktop = DeviceProfile::default().with_cpu_cores(16).with_memory_gb(16);
        assert_eq!(desktop.quality_tier(), QualityTier::High);
        assert_eq!(
            desktop.with_mobile(true).quality_tier(),
            QualityTier::Low,
            "mobile always lands on low"
        );

        assert_eq!(
            DeviceProfile::default().with_cpu_cores(2).quality_tier(),
            QualityTier::Low
        );
        assert_eq!(
            DeviceProfile::default().with_memory_gb(2).quality_tier(),
            QualityTier::Low
        );
        assert_eq!(DeviceProfile::default().quality_tier(), QualityTier::Medium);
        assert_eq!(
            DeviceProfile::default()
                .with_cpu_cores(8)
                .with_memory_gb(4)
                .quality_tier(),
            QualityTier::Medium
        );
        assert_eq!(
            DeviceProfile::default()
                .with_cpu_cores(8)
                .with_memory_gb(8)
                .quality_tier(),
            QualityTier::High
        );
    }

    #[test]
    fn test_detect_reports_at_least_one_core() {
        assert!(DeviceProfile::detect().cpu_cores >= 1);
    }

    #[test]
    fn test_budget_scales() {
        assert_eq!(QualityTier::High.scale_count(300), 300);
        assert_eq!(QualityTier::Medium.scale_count(300), 180);
        assert_eq!(QualityTier::Low.scale_count(300), 90);
        assert!(QualityTier::Low.detail_scale() < QualityTier::Medium.detail_scale());
    }

    #[test]
    fn test_degrade_bottoms_out_at_low() {
        assert_eq!(QualityTier::High.degrade(), QualityTier::Medium);
        assert_eq!(QualityTier::Medium.degrade(), QualityTier::Low);
        assert_eq!(QualityTier::Low.degrade(), QualityTier::Low);
    }

    #[test]
    fn test_governor_keeps_tier_at_healthy_fps() {
        let mut governor = FpsGovernor::new(QualityTier::High);
        for _ in 0..180 {
            assert_eq!(governor.sample(1.0 / 120.0), None);
        }
        assert_eq!(governor.tier(), QualityTier::High);
        assert!((governor.fps() - 120.0).abs() < 1.0);
    }

    #[test]
    fn test_governor_degrades_one_step_per_window() {
        let mut governor = FpsGovernor::new(QualityTier::High);

        let mut changes = Vec::new();
        for _ in 0..60 {
            if let Some(tier) = governor.sample(1.0 / 20.0) {
                changes.push(tier);
            }
        }
        assert_eq!(changes, vec![QualityTier::Medium, QualityTier::Low]);
        assert_eq!(governor.tier(), QualityTier::Low);
    }

    #[test]
    fn test_governor_never_recovers() {
        let mut governor = FpsGovernor::new(QualityTier::High);
        for _ in 0..40 {
            governor.sample(1.0 / 20.0);
        }
        assert_eq!(governor.tier(), QualityTier::Low);

        // A healthy stretch afterwards must not climb back up
        for _ in 0..600 {
            assert_eq!(governor.sample(1.0 / 60.0), None);
        }
        assert_eq!(governor.tier(), QualityTier::Low);
    }

    #[test]
    fn test_governor_ignores_bad_samples() {
        let mut governor = FpsGovernor::new(QualityTier::Medium);
        assert_eq!(governor.sample(0.0), None);
        assert_eq!(governor.sample(-1.0), None);
        assert_eq!(governor.sample(f32::NAN), None);
        assert_eq!(governor.tier(), QualityTier::Medium);
    }
}

//! Surface lifecycle: mounting, event routing, frame scheduling and
//! teardown.
//!
//! [`SurfaceHost`] is the explicit state machine an embedding drives.
//! It owns a particle field, a frame clock and a quality governor, and
//! talks to the outside world only through two injected seams: a
//! [`FrameScheduler`] that requests and cancels frame callbacks, and a
//! [`ListenerRegistry`] that attaches and detaches input listeners.
//! Both have in-crate fakes ([`ManualScheduler`], [`RecordingRegistry`])
//! so the whole lifecycle is testable without a window system.
//!
//! Reduced motion is honored at mount: the host renders a single static
//! gradient, attaches no listeners and never schedules a frame.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::field::{FieldConfig, Viewport};
//! use emberfield::host::{ManualScheduler, NullRegistry, SurfaceHost};
//! use emberfield::quality::DeviceProfile;
//!
//! let mut host = SurfaceHost::new(
//!     FieldConfig::new(),
//!     DeviceProfile::detect(),
//!     ManualScheduler::new(),
//!     NullRegistry,
//! );
//! host.mount(Viewport::new(1280.0, 720.0));
//! while host.scheduler_mut().take() {
//!     host.frame(&mut canvas);
//! }
//! host.unmount();
//! ```

use glam::Vec2;
use log::{debug, info};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::field::{FieldConfig, ParticleField, Viewport};
use crate::quality::{DeviceProfile, FpsGovernor, QualityTier};
use crate::time::FrameClock;

/// How a host asks its embedding for frame callbacks.
pub trait FrameScheduler {
    /// Request one frame callback, soon.
    fn request(&mut self);
    /// Cancel the outstanding request, if any.
    fn cancel(&mut self);
    /// Whether a request is outstanding.
    fn pending(&self) -> bool;
}

/// Scheduler for embeddings that drive frames by hand: tests, offline
/// renders, game loops that tick on their own clock.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u32,
    cancels: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request; returns whether one was pending.
    /// Call [`SurfaceHost::frame`] when it returns true.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total requests seen.
    #[inline]
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Total cancels seen.
    #[inline]
    pub fn cancels(&self) -> u32 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.cancels += 1;
    }

    fn pending(&self) -> bool {
        self.pending
    }
}

/// The input listeners a host may hold on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerLeave,
    Scroll,
    Resize,
}

/// How a host attaches input listeners to its embedding.
pub trait ListenerRegistry {
    fn attach(&mut self, kind: ListenerKind);
    fn detach(&mut self, kind: ListenerKind);
}

/// Registry for embeddings without an event system.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

impl ListenerRegistry for NullRegistry {
    fn attach(&mut self, _kind: ListenerKind) {}
    fn detach(&mut self, _kind: ListenerKind) {}
}

/// Records attach/detach calls so tests can assert teardown leaves
/// nothing behind.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    attached: Vec<ListenerKind>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listeners currently attached, in attach order.
    pub fn attached(&self) -> &[ListenerKind] {
        &self.attached
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

impl ListenerRegistry for RecordingRegistry {
    fn attach(&mut self, kind: ListenerKind) {
        if !self.attached.contains(&kind) {
            self.attached.push(kind);
        }
    }

    fn detach(&mut self, kind: ListenerKind) {
        self.attached.retain(|k| *k != kind);
    }
}

/// Lifecycle states of a [`SurfaceHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// Constructed, not yet mounted.
    Unmounted,
    /// Mounted but the surface has no valid dimensions yet; listeners
    /// are live and frames run idle until a real resize arrives.
    Initialized,
    /// Animating normally.
    Running,
    /// Reduced motion: one static frame, no listeners, no scheduling.
    Static,
    /// Unmounted for good; all events are ignored.
    TornDown,
}

/// An input event routed into the host by its embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer moved over the surface, logical coordinates.
    PointerMoved(Vec2),
    /// Pointer left the surface.
    PointerLeft,
    /// Absolute scroll offset of the embedding.
    Scrolled(f32),
    /// The surface was measured or re-measured.
    Resized(Viewport),
}

/// Drives one particle field through its full lifecycle.
pub struct SurfaceHost<S: FrameScheduler, R: ListenerRegistry> {
    field: ParticleField,
    clock: FrameClock,
    governor: FpsGovernor,
    scheduler: S,
    registry: R,
    state: HostState,
    reduced_motion: bool,
    /// The configured population before any quality scaling.
    design_count: usize,
    attached: Vec<ListenerKind>,
}

impl<S: FrameScheduler, R: ListenerRegistry> SurfaceHost<S, R> {
    /// Build a host. The device profile picks the starting quality
    /// tier, which immediately scales the configured population.
    pub fn new(config: FieldConfig, profile: DeviceProfile, scheduler: S, registry: R) -> Self {
        let tier = profile.quality_tier();
        let design_count = config.count;
        let config = config.with_count(tier.scale_count(design_count));
        Self {
            field: ParticleField::new(config),
            clock: FrameClock::new(),
            governor: FpsGovernor::new(tier),
            scheduler,
            registry,
            state: HostState::Unmounted,
            reduced_motion: profile.reduced_motion,
            design_count,
            attached: Vec::new(),
        }
    }

    /// Same, but with a deterministic field seed for reproducible runs.
    pub fn seeded(
        config: FieldConfig,
        profile: DeviceProfile,
        scheduler: S,
        registry: R,
        seed: u64,
    ) -> Self {
        let mut host = Self::new(config, profile, scheduler, registry);
        let config = host.field.config().clone();
        host.field = ParticleField::seeded(config, seed);
        host
    }

    #[inline]
    pub fn state(&self) -> HostState {
        self.state
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[inline]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    #[inline]
    pub fn quality_tier(&self) -> QualityTier {
        self.governor.tier()
    }

    /// Last measured fps.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.governor.fps()
    }

    /// Scale playback speed (1.0 = normal).
    pub fn set_speed(&mut self, speed: f32) {
        self.clock.set_speed(speed);
    }

    /// Pin the frame delta for deterministic runs.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.clock.set_fixed_delta(delta);
    }

    /// Bring the surface up.
    ///
    /// Normal path: size the population (deferred while the viewport is
    /// invalid), attach listeners and request the first frame. Reduced
    /// motion path: become [`HostState::Static`] without attaching or
    /// scheduling anything; the embedding renders once via
    /// [`frame`](Self::frame).
    pub fn mount(&mut self, viewport: Viewport) {
        if self.state != HostState::Unmounted {
            debug!("mount ignored in state {:?}", self.state);
            return;
        }

        if self.reduced_motion {
            info!("reduced motion requested, mounting static surface");
            self.field.resize(viewport);
            self.state = HostState::Static;
            return;
        }

        self.field.resize(viewport);

        self.attach(ListenerKind::Resize);
        if self.field.config().interactive {
            self.attach(ListenerKind::PointerMove);
            self.attach(ListenerKind::PointerLeave);
        }
        self.attach(ListenerKind::Scroll);

        self.scheduler.request();
        self.state = if viewport.is_valid() {
            HostState::Running
        } else {
            debug!("surface not measurable yet, waiting for a resize");
            HostState::Initialized
        };
        info!(
            "mounted {} field with {} particles",
            self.field.config().mode,
            self.field.len()
        );
    }

    /// Route an input event. Events outside the live states are
    /// ignored, including everything after teardown.
    pub fn dispatch(&mut self, event: HostEvent) {
        match self.state {
            HostState::Running | HostState::Initialized => {}
            state => {
                debug!("event {:?} ignored in state {:?}", event, state);
                return;
            }
        }

        match event {
            HostEvent::PointerMoved(position) => self.field.pointer_moved(position),
            HostEvent::PointerLeft => self.field.pointer_left(),
            HostEvent::Scrolled(offset) => self.field.scrolled(offset),
            HostEvent::Resized(viewport) => {
                self.field.resize(viewport);
                if self.state == HostState::Initialized && viewport.is_valid() {
                    self.state = HostState::Running;
                }
            }
        }
    }

    /// Produce one frame.
    ///
    /// Running: advance the clock, step and render the field, feed the
    /// governor and re-request the next frame. Static: paint the
    /// gradient fallback and request nothing.
    pub fn frame(&mut self, canvas: &mut Canvas) {
        match self.state {
            HostState::Running | HostState::Initialized => {
                let (_, dt) = self.clock.update();
                self.field.step(dt);
                canvas.clear(Color::TRANSPARENT);
                self.field.render(canvas);

                if let Some(tier) = self.governor.sample(dt) {
                    self.field.set_count(tier.scale_count(self.design_count));
                }

                self.scheduler.request();
            }
            HostState::Static => {
                canvas.clear(Color::TRANSPARENT);
                self.field.render_static(canvas);
            }
            state => debug!("frame ignored in state {:?}", state),
        }
    }

    /// Tear the surface down: cancel the pending frame and detach every
    /// listener. Idempotent; events afterwards are ignored.
    pub fn unmount(&mut self) {
        if self.state == HostState::TornDown {
            return;
        }
        self.scheduler.cancel();
        while let Some(kind) = self.attached.pop() {
            self.registry.detach(kind);
        }
        info!("surface host torn down");
        self.state = HostState::TornDown;
    }

    fn attach(&mut self, kind: ListenerKind) {
        self.registry.attach(kind);
        self.attached.push(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_host(config: FieldConfig, profile: DeviceProfile) -> SurfaceHost<ManualScheduler, RecordingRegistry> {
        SurfaceHost::seeded(config, profile, ManualScheduler::new(), RecordingRegistry::new(), 7)
    }

    fn desktop() -> DeviceProfile {
        DeviceProfile::default().with_cpu_cores(16).with_memory_gb(16)
    }

    #[test]
    fn test_mount_attaches_listeners_and_schedules() {
        let mut host = test_host(FieldConfig::new(), desktop());
        host.mount(Viewport::new(1440.0, 900.0));

        assert_eq!(host.state(), HostState::Running);
        assert!(host.scheduler().pending());
        assert_eq!(host.scheduler().requests(), 1);
        assert_eq!(
            host.registry().attached(),
            &[
                ListenerKind::Resize,
                ListenerKind::PointerMove,
                ListenerKind::PointerLeave,
                ListenerKind::Scroll,
            ]
        );
    }

    #[test]
    fn test_non_interactive_mount_skips_pointer_listeners() {
        let mut host = test_host(FieldConfig::new().with_interactive(false), desktop());
        host.mount(Viewport::new(800.0, 600.0));
        assert_eq!(
            host.registry().attached(),
            &[ListenerKind::Resize, ListenerKind::Scroll]
        );
    }

    #[test]
    fn test_reduced_motion_never_schedules_or_listens() {
        let profile = desktop().with_reduced_motion(true);
        let mut host = test_host(FieldConfig::new(), profile);
        host.mount(Viewport::new(800.0, 600.0));

        assert_eq!(host.state(), HostState::Static);
        assert_eq!(host.scheduler().requests(), 0);
        assert!(host.registry().is_empty());

        let mut canvas = Canvas::new(80, 60);
        host.frame(&mut canvas);
        host.frame(&mut canvas);
        assert_eq!(host.scheduler().requests(), 0);
        assert!(canvas.pixels().iter().any(|p| p.a > 0.0));
    }

    #[test]
    fn test_frame_steps_and_reschedules() {
        let mut host = test_host(FieldConfig::new(), desktop());
        host.set_fixed_delta(Some(1.0 / 60.0));
        host.mount(Viewport::new(1440.0, 900.0));
        let mut canvas = Canvas::new(144, 90);

        assert!(host.scheduler_mut().take());
        host.frame(&mut canvas);
        assert!(host.scheduler().pending(), "frame re-requests itself");
        assert_eq!(host.scheduler().requests(), 2);
    }

    #[test]
    fn test_invalid_mount_waits_for_resize() {
        let mut host = test_host(FieldConfig::new(), desktop());
        host.mount(Viewport::new(0.0, 0.0));
        assert_eq!(host.state(), HostState::Initialized);
        assert!(host.field().is_empty());
        assert!(host.scheduler().pending(), "idle frames keep the loop alive");

        host.dispatch(HostEvent::Resized(Viewport::new(1440.0, 900.0)));
        assert_eq!(host.state(), HostState::Running);
        assert!(!host.field().is_empty());
    }

    #[test]
    fn test_unmount_cancels_and_detaches_idempotently() {
        let mut host = test_host(FieldConfig::new(), desktop());
        host.mount(Viewport::new(800.0, 600.0));
        host.unmount();

        assert_eq!(host.state(), HostState::TornDown);
        assert!(!host.scheduler().pending());
        assert_eq!(host.scheduler().cancels(), 1);
        assert!(host.registry().is_empty());

        host.unmount();
        assert_eq!(host.scheduler().cancels(), 1, "second unmount is a no-op");
    }

    #[test]
    fn test_events_after_teardown_are_ignored() {
        let mut host = test_host(FieldConfig::new(), desktop());
        host.mount(Viewport::new(800.0, 600.0));
        host.unmount();

        host.dispatch(HostEvent::PointerMoved(Vec2::new(10.0, 10.0)));
        host.dispatch(HostEvent::Scrolled(500.0));
        assert!(!host.field().pointer_active());
        assert_eq!(host.field().scroll_velocity(), 0.0);

        let mut canvas = Canvas::new(16, 16);
        host.frame(&mut canvas);
        assert!(canvas.pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn test_device_tier_scales_population_at_build() {
        let low_end = DeviceProfile::default().with_cpu_cores(2);
        let host = test_host(
            FieldConfig::new().with_count(300).with_responsive(false),
            low_end,
        );
        assert_eq!(host.quality_tier(), QualityTier::Low);
        assert_eq!(host.field().config().count, 90);
    }

    #[test]
    fn test_governor_shrinks_population_on_slow_frames() {
        let mut host = test_host(
            FieldConfig::new().with_count(300).with_responsive(false),
            desktop(),
        );
        host.set_fixed_delta(Some(1.0 / 20.0));
        host.mount(Viewport::new(800.0, 600.0));
        assert_eq!(host.field().len(), 300);

        let mut canvas = Canvas::new(80, 60);
        for _ in 0..21 {
            host.frame(&mut canvas);
        }
        assert_eq!(host.quality_tier(), QualityTier::Medium);
        assert_eq!(host.field().len(), 180);
    }
}

// Per-view simulation state and its lifecycle

use crate::canvas::TrailCanvas;
use crate::config::WindConfig;
use crate::error::FieldError;
use crate::field::FieldPayload;
use crate::integrator::IntegratorConfig;
use crate::pool::ParticlePool;
use crate::projection::Projector;
use crate::renderer::{FrameStats, TrailRenderer};
use crate::sampler::FieldStore;
use crate::scheduler::{FrameScheduler, SchedulerHandle};
use crate::tools::seeded_rng;
use crate::viewport::{GeoBounds, ViewportState};
use log::{debug, info, warn};

/// Result of one frame tick. A tick never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, detached or inside a transition
    Stopped,
    /// No usable field loaded yet
    EmptyField,
    /// Viewport was never set
    NoViewport,
    Rendered(FrameStats),
}

/// Everything one map view needs to animate wind.
///
/// The host owns one of these per view and passes it explicitly; nothing is
/// shared between views.
pub struct SimulationContext {
    config: WindConfig,
    integrator: IntegratorConfig,
    store: Option<FieldStore>,
    pool: ParticlePool,
    renderer: TrailRenderer,
    scheduler: FrameScheduler,
    viewport: Option<ViewportState>,
    density: f64,
    pending_size: Option<(u32, u32)>,
    in_transition: bool,
    resume_after_transition: bool,
    needs_clear: bool,
}

impl SimulationContext {
    pub fn new(config: WindConfig) -> Self {
        let pool = ParticlePool::new(config.pool_config(), seeded_rng(config.particles.seed));
        Self {
            integrator: config.integrator_config(),
            renderer: TrailRenderer::new(config.render_config()),
            density: config.particles.density,
            config,
            store: None,
            pool,
            scheduler: FrameScheduler::new(),
            viewport: None,
            pending_size: None,
            in_transition: false,
            resume_after_transition: false,
            needs_clear: false,
        }
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&FieldStore> {
        self.store.as_ref()
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn viewport(&self) -> Option<&ViewportState> {
        self.viewport.as_ref()
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Replace the active field.
    ///
    /// On failure the previous field and particles stay untouched. On success
    /// particles are reseeded from the new field and the canvas is cleared on
    /// the next tick.
    pub fn load_field(&mut self, payload: FieldPayload) -> Result<(), FieldError> {
        let store = match FieldStore::from_payload(payload, self.config.sampling.bucket_size_deg) {
            Ok(store) => store,
            Err(err) => {
                warn!("rejected wind field: {}", err);
                return Err(err);
            }
        };
        info!("loaded {:?} wind field with {} samples", store.shape(), store.field().len());

        self.store = Some(store);
        self.reinitialize();
        Ok(())
    }

    pub fn load_field_json(&mut self, text: &str) -> Result<(), FieldError> {
        match FieldPayload::from_json(text) {
            Ok(payload) => self.load_field(payload),
            Err(err) => {
                warn!("rejected wind field: {}", err);
                Err(err)
            }
        }
    }

    /// Update the view snapshot. Existing particles keep their positions;
    /// the pool is grown or truncated to the new target.
    pub fn set_viewport(&mut self, bounds: GeoBounds, size: (u32, u32)) {
        self.viewport = Some(ViewportState::new(bounds, size));
        self.pending_size = None;
        if self.pool.is_empty() {
            self.reinitialize();
        } else {
            self.rebalance();
        }
    }

    pub fn start(&mut self) {
        if self.in_transition {
            self.resume_after_transition = true;
            return;
        }
        self.scheduler.start();
    }

    /// Stop ticking; particles stay where they are
    pub fn pause(&mut self) {
        self.resume_after_transition = false;
        self.scheduler.stop();
    }

    /// New canvas size. Deferred while a transition is in progress.
    pub fn resize(&mut self, size: (u32, u32)) {
        if self.in_transition {
            debug!("deferring resize to {}x{}", size.0, size.1);
            self.pending_size = Some(size);
            return;
        }
        // without a viewport the size arrives with the first set_viewport
        if let Some(viewport) = self.viewport {
            self.set_viewport(viewport.bounds, size);
        }
    }

    /// Zoom, pan animation or resize started; stop ticking until it ends
    pub fn begin_transition(&mut self) {
        if !self.in_transition {
            self.resume_after_transition = self.scheduler.is_running();
            self.in_transition = true;
        }
        self.scheduler.stop();
    }

    /// Transition settled on `bounds`; apply any deferred size and resume
    /// if the animation was running before.
    pub fn end_transition(&mut self, bounds: GeoBounds) {
        self.in_transition = false;
        let size = self
            .pending_size
            .take()
            .or_else(|| self.viewport.map(|v| v.size_px()))
            .unwrap_or((0, 0));
        self.set_viewport(bounds, size);
        if std::mem::take(&mut self.resume_after_transition) {
            self.scheduler.start();
        }
    }

    pub fn set_density(&mut self, particles_per_px: f64) {
        self.density = if particles_per_px.is_finite() { particles_per_px.max(0.0) } else { 0.0 };
        self.rebalance();
    }

    /// Run one frame: fade, advance every particle and draw
    pub fn tick<P, C>(&mut self, projector: &P, canvas: &mut C) -> TickOutcome
    where
        P: Projector + ?Sized,
        C: TrailCanvas + ?Sized,
    {
        if !self.scheduler.begin_frame() {
            return TickOutcome::Stopped;
        }
        let Some(store) = self.store.as_ref().filter(|s| !s.is_empty()) else {
            return TickOutcome::EmptyField;
        };
        let Some(viewport) = self.viewport else {
            return TickOutcome::NoViewport;
        };

        let (width, height) = viewport.size_px();
        if canvas.size() != (width, height) {
            canvas.resize(width, height);
            self.needs_clear = true;
        }
        if self.needs_clear {
            self.renderer.reset(canvas);
            self.needs_clear = false;
        }

        let stats = self.renderer.render_frame(
            &mut self.pool,
            store.field(),
            store,
            projector,
            canvas,
            &viewport,
            &self.integrator,
        );
        TickOutcome::Rendered(stats)
    }

    fn reinitialize(&mut self) {
        let (Some(store), Some(viewport)) = (self.store.as_ref(), self.viewport.as_ref()) else {
            self.pool.clear();
            return;
        };
        self.pool.initialize(store.field(), viewport, self.density);
        self.needs_clear = true;
        info!("seeded {} particles", self.pool.len());
    }

    fn rebalance(&mut self) {
        if let (Some(store), Some(viewport)) = (self.store.as_ref(), self.viewport.as_ref()) {
            self.pool.rebalance(store.field(), viewport, self.density);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PixelCanvas, Segment, StrokeStyle};
    use crate::field::GridPayload;
    use crate::projection::Equirectangular;
    use crate::renderer::BlendMode;
    use glam::DVec2;

    fn config() -> WindConfig {
        let mut config = WindConfig::default();
        config.particles.seed = Some(42);
        config
    }

    fn patch() -> FieldPayload {
        FieldPayload::Grid(GridPayload {
            lats: vec![10.0, 0.0],
            lons: vec![0.0, 10.0],
            u: vec![vec![10.0, 10.0], vec![10.0, 10.0]],
            v: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        })
    }

    fn running(size: (u32, u32)) -> (SimulationContext, Equirectangular, PixelCanvas) {
        let mut ctx = SimulationContext::new(config());
        ctx.load_field(patch()).unwrap();
        ctx.set_viewport(GeoBounds::WORLD, size);
        ctx.start();
        (ctx, Equirectangular::new(GeoBounds::WORLD, size), PixelCanvas::new(size.0, size.1))
    }

    #[test]
    fn test_resize_before_viewport_is_dropped() {
        let mut ctx = SimulationContext::new(config());
        ctx.load_field(patch()).unwrap();
        ctx.resize((800, 600));
        assert!(ctx.viewport().is_none());

        ctx.set_viewport(GeoBounds::WORLD, (360, 180));
        ctx.begin_transition();
        ctx.end_transition(GeoBounds::WORLD);

        assert_eq!(ctx.viewport().map(|v| v.size_px()), Some((360, 180)));
    }

    #[test]
    fn test_tick_before_start_is_stopped() {
        let mut ctx = SimulationContext::new(config());
        ctx.load_field(patch()).unwrap();
        ctx.set_viewport(GeoBounds::WORLD, (360, 180));
        let projector = Equirectangular::new(GeoBounds::WORLD, (360, 180));
        let mut canvas = PixelCanvas::new(360, 180);

        assert_eq!(ctx.tick(&projector, &mut canvas), TickOutcome::Stopped);
        assert_eq!(ctx.frames(), 0);
    }

    #[test]
    fn test_idles_without_field_or_viewport() {
        let projector = Equirectangular::new(GeoBounds::WORLD, (360, 180));
        let mut canvas = PixelCanvas::new(360, 180);

        let mut ctx = SimulationContext::new(config());
        ctx.start();
        assert_eq!(ctx.tick(&projector, &mut canvas), TickOutcome::EmptyField);

        ctx.load_field(FieldPayload::Points(Vec::new())).unwrap();
        assert_eq!(ctx.tick(&projector, &mut canvas), TickOutcome::EmptyField);

        ctx.load_field(patch()).unwrap();
        assert_eq!(ctx.tick(&projector, &mut canvas), TickOutcome::NoViewport);
        assert!(ctx.pool().is_empty());
    }

    #[test]
    fn test_tick_renders_and_keeps_ages_bounded() {
        let (mut ctx, projector, mut canvas) = running((360, 180));
        assert_eq!(ctx.pool().len(), 200);

        for _ in 0..300 {
            let TickOutcome::Rendered(stats) = ctx.tick(&projector, &mut canvas) else {
                panic!("expected a rendered frame");
            };
            assert_eq!(stats.particles, 200);
            assert!(ctx.pool().particles().iter().all(|p| p.age <= 120));
        }
        assert!(canvas.coverage() > 0);
    }

    #[test]
    fn test_pause_keeps_particles_and_resume_continues() {
        let (mut ctx, projector, mut canvas) = running((360, 180));
        ctx.tick(&projector, &mut canvas);
        ctx.pause();
        let frozen = ctx.pool().particles().to_vec();

        assert_eq!(ctx.tick(&projector, &mut canvas), TickOutcome::Stopped);
        assert_eq!(ctx.pool().particles(), frozen.as_slice());

        ctx.start();
        assert!(matches!(ctx.tick(&projector, &mut canvas), TickOutcome::Rendered(_)));
        assert_ne!(ctx.pool().particles(), frozen.as_slice());
    }

    #[test]
    fn test_malformed_load_keeps_previous_field() {
        let (mut ctx, _, _) = running((360, 180));
        let before = ctx.pool().particles().to_vec();

        let bad = FieldPayload::Grid(GridPayload {
            lats: vec![10.0, 0.0],
            lons: vec![0.0, 10.0],
            u: vec![vec![1.0, 1.0]],
            v: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        });
        assert!(matches!(ctx.load_field(bad), Err(FieldError::DimensionMismatch { .. })));
        assert!(ctx.load_field_json("{\"lats\": [1.0").is_err());

        assert_eq!(ctx.store().map(|s| s.field().len()), Some(4));
        assert_eq!(ctx.pool().particles(), before.as_slice());
    }

    #[test]
    fn test_resize_deferred_until_transition_ends() {
        let (mut ctx, _, _) = running((360, 180));

        ctx.begin_transition();
        assert!(!ctx.is_running());
        ctx.resize((720, 360));
        assert_eq!(ctx.viewport().map(|v| v.size_px()), Some((360, 180)));

        ctx.end_transition(GeoBounds::WORLD);
        assert_eq!(ctx.viewport().map(|v| v.size_px()), Some((720, 360)));
        assert!(ctx.is_running());
        assert_eq!(ctx.pool().len(), 336);
    }

    #[test]
    fn test_transition_while_paused_stays_paused() {
        let (mut ctx, _, _) = running((360, 180));
        ctx.pause();
        ctx.begin_transition();
        ctx.end_transition(GeoBounds::new(-45.0, 45.0, -90.0, 90.0));
        assert!(!ctx.is_running());
    }

    #[test]
    fn test_resize_keeps_particle_positions() {
        let (mut ctx, _, _) = running((360, 180));
        let before = ctx.pool().particles().to_vec();

        ctx.resize((400, 200));

        assert_eq!(&ctx.pool().particles()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_density_rebalances_pool() {
        let (mut ctx, _, _) = running((1000, 1000));
        ctx.set_density(0.001);
        assert_eq!(ctx.pool().len(), 1000);
        ctx.set_density(-1.0);
        assert_eq!(ctx.pool().len(), 200);
    }

    #[test]
    fn test_new_field_clears_old_trails() {
        let (mut ctx, projector, mut canvas) = running((360, 180));
        ctx.tick(&projector, &mut canvas);
        let style = StrokeStyle {
            color: [255, 255, 255, 255],
            line_width: 1.0,
            blend: BlendMode::Normal,
        };
        let corner = DVec2::new(1.0, 1.0);
        canvas.stroke_segments(&[Segment { from: corner, to: corner }], &style);

        ctx.load_field(patch()).unwrap();
        ctx.tick(&projector, &mut canvas);

        assert_eq!(canvas.pixel(1, 1).map(|px| px[3]), Some(0));
    }
}

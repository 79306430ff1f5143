// Map overlay lifecycle

use crate::canvas::TrailCanvas;
use crate::context::{SimulationContext, TickOutcome};
use crate::projection::Projector;
use log::debug;

/// Lifecycle a map host drives for an overlay.
///
/// `render_tick` is called once per display refresh while attached.
pub trait OverlayLayer {
    fn attach(&mut self, projector: &dyn Projector);
    fn detach(&mut self);
    fn resize(&mut self, size: (u32, u32));
    fn render_tick(&mut self, projector: &dyn Projector) -> TickOutcome;
}

/// Wind trail overlay: one simulation context drawing on one canvas
pub struct WindLayer<C: TrailCanvas> {
    context: SimulationContext,
    canvas: C,
    attached: bool,
}

impl<C: TrailCanvas> WindLayer<C> {
    pub fn new(context: SimulationContext, canvas: C) -> Self {
        Self {
            context,
            canvas,
            attached: false,
        }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.context
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Zoom or pan animation started
    pub fn move_start(&mut self) {
        self.context.begin_transition();
    }

    /// View settled; pick up the new bounds and any deferred size
    pub fn move_end(&mut self, projector: &dyn Projector) {
        self.context.end_transition(projector.current_bounds());
    }
}

impl<C: TrailCanvas> OverlayLayer for WindLayer<C> {
    fn attach(&mut self, projector: &dyn Projector) {
        let (width, height) = projector.current_size_px();
        self.canvas.resize(width, height);
        self.context.set_viewport(projector.current_bounds(), (width, height));
        self.context.start();
        self.attached = true;
        debug!("wind layer attached at {}x{}", width, height);
    }

    fn detach(&mut self) {
        self.context.pause();
        self.canvas.clear();
        self.attached = false;
    }

    fn resize(&mut self, size: (u32, u32)) {
        self.context.resize(size);
    }

    fn render_tick(&mut self, projector: &dyn Projector) -> TickOutcome {
        if !self.attached {
            return TickOutcome::Stopped;
        }
        self.context.tick(projector, &mut self.canvas)
    }
}

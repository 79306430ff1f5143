// Per-frame trail rendering

use crate::canvas::{Segment, StrokeStyle, TrailCanvas};
use crate::field::Field;
use crate::integrator::{IntegratorConfig, advance};
use crate::pool::ParticlePool;
use crate::projection::Projector;
use crate::sampler::VectorSampler;
use crate::viewport::ViewportState;
use glam::DVec2;

pub use crate::canvas::{BlendMode, FadeMode};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Opacity of the per-frame fade; lower keeps trails visible longer
    pub fade_alpha: f64,
    pub fade_mode: FadeMode,
    pub blend_mode: BlendMode,
    pub line_width: f64,
    pub color: [u8; 4],
    pub cull_margin_px: f64,
    /// Max segment length as a fraction of the larger viewport side
    pub teleport_fraction: f64,
}

impl RenderConfig {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            line_width: self.line_width,
            blend: self.blend_mode,
        }
    }
}

/// Whether a projected segment gets drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentVerdict {
    Draw,
    /// A projected coordinate is NaN or infinite
    InvalidGeometry,
    /// End point outside the viewport plus margin
    OffViewport,
    /// Too long to be real motion (antimeridian wrap or projection seam)
    Teleport,
}

pub fn classify_segment(from: DVec2, to: DVec2, viewport: &ViewportState, config: &RenderConfig) -> SegmentVerdict {
    if !(from.is_finite() && to.is_finite()) {
        return SegmentVerdict::InvalidGeometry;
    }
    if !viewport.contains_px(to, config.cull_margin_px) {
        return SegmentVerdict::OffViewport;
    }
    let limit = config.teleport_fraction * viewport.max_side_px();
    if from.distance_squared(to) > limit * limit {
        return SegmentVerdict::Teleport;
    }
    SegmentVerdict::Draw
}

/// Counters for one rendered tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub drawn: usize,
    pub reseeded: usize,
    pub invalid_geometry: usize,
    pub off_viewport: usize,
    pub teleports: usize,
}

impl FrameStats {
    pub fn skipped(&self) -> usize {
        self.invalid_geometry + self.off_viewport + self.teleports
    }
}

/// Draws fading particle trails.
///
/// Rather than clearing, each frame fades what is already on the canvas and
/// adds one segment per particle from its previous to its new position.
pub struct TrailRenderer {
    config: RenderConfig,
    first_frame: bool,
    segments: Vec<Segment>,
}

impl TrailRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            first_frame: true,
            segments: Vec::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Clear the canvas and skip the fade on the next frame
    pub fn reset<C: TrailCanvas + ?Sized>(&mut self, canvas: &mut C) {
        canvas.clear();
        self.first_frame = true;
    }

    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }

    /// Advance every particle once and draw the resulting segments
    #[allow(clippy::too_many_arguments)]
    pub fn render_frame<S, P, C>(
        &mut self,
        pool: &mut ParticlePool,
        field: &Field,
        sampler: &S,
        projector: &P,
        canvas: &mut C,
        viewport: &ViewportState,
        integrator: &IntegratorConfig,
    ) -> FrameStats
    where
        S: VectorSampler + ?Sized,
        P: Projector + ?Sized,
        C: TrailCanvas + ?Sized,
    {
        if !self.first_frame {
            canvas.fade(self.config.fade_alpha, self.config.fade_mode);
        }
        self.first_frame = false;

        let mut stats = FrameStats {
            particles: pool.len(),
            ..FrameStats::default()
        };
        let mut retired = Vec::new();
        self.segments.clear();

        for (index, particle) in pool.particles_mut().iter_mut().enumerate() {
            let (lat0, lon0) = (particle.lat, particle.lon);
            let outcome = advance(particle, sampler, integrator);
            if outcome.needs_reseed() {
                retired.push(index);
                continue;
            }

            let from = projector.project(lat0, lon0);
            let to = projector.project(particle.lat, particle.lon);
            match classify_segment(from, to, viewport, &self.config) {
                SegmentVerdict::Draw => self.segments.push(Segment { from, to }),
                SegmentVerdict::InvalidGeometry => stats.invalid_geometry += 1,
                SegmentVerdict::OffViewport => stats.off_viewport += 1,
                SegmentVerdict::Teleport => stats.teleports += 1,
            }
        }

        for index in retired {
            if pool.reseed(index, field) {
                stats.reseeded += 1;
            }
        }

        stats.drawn = self.segments.len();
        canvas.stroke_segments(&self.segments, &self.config.stroke_style());
        stats
    }
}

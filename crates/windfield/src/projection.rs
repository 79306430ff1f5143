//! Projection contract supplied by the host map, plus a plate carrée
//! implementation used by the viewer and tests.

use crate::tools::wrap_lon;
use crate::viewport::{GeoBounds, ViewportState};
use glam::DVec2;

/// Host projection service.
///
/// Screen coordinates are pixels from the top-left corner of the overlay.
/// Implementations may return non-finite coordinates for positions they
/// cannot project; the renderer skips those segments.
pub trait Projector {
    fn project(&self, lat: f64, lon: f64) -> DVec2;
    fn unproject(&self, point: DVec2) -> (f64, f64);
    fn current_bounds(&self) -> GeoBounds;
    fn current_size_px(&self) -> (u32, u32);

    fn viewport(&self) -> ViewportState {
        ViewportState::new(self.current_bounds(), self.current_size_px())
    }
}

/// Equirectangular projection of `bounds` onto a `size` pixel canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    bounds: GeoBounds,
    size: (u32, u32),
    pixel_ratio: f64,
}

impl Equirectangular {
    pub fn new(bounds: GeoBounds, size: (u32, u32)) -> Self {
        Self {
            bounds,
            size,
            pixel_ratio: 1.0,
        }
    }

    /// Scale output coordinates for high-DPI canvases
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = if ratio > 0.0 { ratio } else { 1.0 };
        self
    }

    pub fn set_bounds(&mut self, bounds: GeoBounds) {
        self.bounds = bounds;
    }

    pub fn set_size(&mut self, size: (u32, u32)) {
        self.size = size;
    }

    fn scale(&self) -> DVec2 {
        DVec2::new(
            self.size.0 as f64 / self.bounds.lon_span(),
            self.size.1 as f64 / self.bounds.lat_span(),
        )
    }
}

impl Projector for Equirectangular {
    fn project(&self, lat: f64, lon: f64) -> DVec2 {
        let mut dlon = lon - self.bounds.west;
        if self.bounds.crosses_antimeridian() && dlon < 0.0 {
            dlon += 360.0;
        }
        let scale = self.scale();
        DVec2::new(dlon * scale.x, (self.bounds.north - lat) * scale.y) * self.pixel_ratio
    }

    fn unproject(&self, point: DVec2) -> (f64, f64) {
        let scale = self.scale();
        let point = point / self.pixel_ratio;
        let lat = self.bounds.north - point.y / scale.y;
        let lon = wrap_lon(self.bounds.west + point.x / scale.x);
        (lat, lon)
    }

    fn current_bounds(&self) -> GeoBounds {
        self.bounds
    }

    fn current_size_px(&self) -> (u32, u32) {
        let width = (self.size.0 as f64 * self.pixel_ratio).round() as u32;
        let height = (self.size.1 as f64 * self.pixel_ratio).round() as u32;
        (width, height)
    }
}

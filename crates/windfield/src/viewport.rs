use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geographic bounds of the visible map, in degrees.
///
/// `west > east` means the view crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl GeoBounds {
    pub const WORLD: GeoBounds = GeoBounds {
        south: -90.0,
        north: 90.0,
        west: -180.0,
        east: 180.0,
    };

    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitude extent, accounting for antimeridian crossing
    pub fn lon_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east + 360.0 - self.west
        } else {
            self.east - self.west
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Whether a position lies inside the bounds grown by `margin` degrees
    pub fn contains_expanded(&self, lat: f64, lon: f64, margin: f64) -> bool {
        if lat < self.south - margin || lat > self.north + margin {
            return false;
        }
        if self.crosses_antimeridian() {
            (lon >= self.west - margin && lon <= 180.0) || (lon >= -180.0 && lon <= self.east + margin)
        } else {
            lon >= self.west - margin && lon <= self.east + margin
        }
    }
}

/// Snapshot of the host view for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub bounds: GeoBounds,
    pub width_px: u32,
    pub height_px: u32,
}

impl ViewportState {
    pub fn new(bounds: GeoBounds, size: (u32, u32)) -> Self {
        Self {
            bounds,
            width_px: size.0,
            height_px: size.1,
        }
    }

    pub fn size_px(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    pub fn area_px(&self) -> f64 {
        self.width_px as f64 * self.height_px as f64
    }

    pub fn max_side_px(&self) -> f64 {
        self.width_px.max(self.height_px) as f64
    }

    /// Whether a screen point lies inside the viewport grown by `margin` pixels
    pub fn contains_px(&self, point: DVec2, margin: f64) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x <= self.width_px as f64 + margin
            && point.y <= self.height_px as f64 + margin
    }
}

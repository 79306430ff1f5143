//! Vector field snapshots
//!
//! A field is either an unstructured point set or a regular lat/lon lattice.
//! Fields are immutable once built; a data refresh replaces the whole
//! [`FieldStore`](crate::sampler::FieldStore).

pub mod grid;
pub mod index;
pub mod payload;
pub mod points;

pub use grid::GridField;
pub use index::SpatialBucketIndex;
pub use payload::{FieldPayload, GridPayload};
pub use points::PointField;

use serde::{Deserialize, Serialize};

/// One wind observation. `u` is eastward, `v` northward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSample {
    pub lat: f64,
    pub lon: f64,
    pub u: f64,
    pub v: f64,
}

impl VectorSample {
    pub const fn new(lat: f64, lon: f64, u: f64, v: f64) -> Self {
        Self { lat, lon, u, v }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Points,
    Grid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Points(PointField),
    Grid(GridField),
}

impl Field {
    pub fn shape(&self) -> FieldShape {
        match self {
            Field::Points(_) => FieldShape::Points,
            Field::Grid(_) => FieldShape::Grid,
        }
    }

    /// Number of seedable samples (points, or grid nodes)
    pub fn len(&self) -> usize {
        match self {
            Field::Points(points) => points.len(),
            Field::Grid(grid) => grid.node_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the sample at `index`, in the same order as `len`
    pub fn position(&self, index: usize) -> Option<(f64, f64)> {
        match self {
            Field::Points(points) => points.get(index).map(|s| (s.lat, s.lon)),
            Field::Grid(grid) => grid.node_position(index),
        }
    }
}

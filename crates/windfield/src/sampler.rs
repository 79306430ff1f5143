// Vector sampling over the active field

use crate::field::{Field, FieldPayload, FieldShape, SpatialBucketIndex};
use crate::error::FieldError;
use glam::DVec2;

/// Anything that can report a wind vector at a position.
///
/// `None` means no coverage at that position.
pub trait VectorSampler {
    fn sample(&self, lat: f64, lon: f64) -> Option<DVec2>;
}

/// The active field together with its spatial index.
///
/// Point fields get a bucket index at construction; grid fields need none.
/// A store is replaced wholesale on refresh, never edited in place.
#[derive(Debug, Clone)]
pub struct FieldStore {
    field: Field,
    index: Option<SpatialBucketIndex>,
}

impl FieldStore {
    pub fn new(field: Field, bucket_size: f64) -> Self {
        let index = match &field {
            Field::Points(points) => Some(SpatialBucketIndex::build(points, bucket_size)),
            Field::Grid(_) => None,
        };
        Self { field, index }
    }

    pub fn from_payload(payload: FieldPayload, bucket_size: f64) -> Result<Self, FieldError> {
        Ok(Self::new(payload.into_field()?, bucket_size))
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn index(&self) -> Option<&SpatialBucketIndex> {
        self.index.as_ref()
    }

    pub fn shape(&self) -> FieldShape {
        self.field.shape()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }
}

impl VectorSampler for FieldStore {
    fn sample(&self, lat: f64, lon: f64) -> Option<DVec2> {
        // the declared shape picks the strategy
        match &self.field {
            Field::Grid(grid) => grid.sample(lat, lon),
            Field::Points(points) => {
                let nearest = match &self.index {
                    Some(index) => index.nearest(points, lat, lon),
                    None => points.nearest_linear(lat, lon),
                }?;
                points.get(nearest).map(|s| DVec2::new(s.u, s.v))
            }
        }
    }
}

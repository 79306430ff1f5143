use super::VectorSample;

/// Unstructured samples in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointField {
    samples: Vec<VectorSample>,
}

impl PointField {
    pub(crate) fn new(samples: Vec<VectorSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[VectorSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&VectorSample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the nearest sample by squared lat/lon distance, scanning
    /// every sample. Ties keep the earliest sample.
    pub fn nearest_linear(&self, lat: f64, lon: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, sample) in self.samples.iter().enumerate() {
            let d2 = squared_distance(sample, lat, lon);
            if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                best = Some((index, d2));
            }
        }
        best.map(|(index, _)| index)
    }
}

pub(crate) fn squared_distance(sample: &VectorSample, lat: f64, lon: f64) -> f64 {
    let dlat = sample.lat - lat;
    let dlon = sample.lon - lon;
    dlat * dlat + dlon * dlon
}

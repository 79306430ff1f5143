use super::PointField;
use super::points::squared_distance;
use std::collections::HashMap;

/// Coarse lat/lon buckets over a point field for nearest-neighbour lookups.
///
/// Built once per field load and never mutated afterwards. Buckets keep the
/// order in which they were first filled, samples keep load order within a
/// bucket; queries visit candidates in that order so ties are stable.
#[derive(Debug, Clone)]
pub struct SpatialBucketIndex {
    bucket_size: f64,
    lookup: HashMap<(i64, i64), usize>,
    buckets: Vec<Vec<usize>>,
}

impl SpatialBucketIndex {
    pub fn build(field: &PointField, bucket_size: f64) -> Self {
        let bucket_size = if bucket_size > 0.0 { bucket_size } else { crate::constants::BUCKET_SIZE_DEG };
        let mut lookup = HashMap::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();

        for (index, sample) in field.samples().iter().enumerate() {
            let key = bucket_key(sample.lat, sample.lon, bucket_size);
            let slot = *lookup.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(index);
        }

        Self {
            bucket_size,
            lookup,
            buckets,
        }
    }

    pub fn bucket_size(&self) -> f64 {
        self.bucket_size
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Nearest sample to a position.
    ///
    /// Scans the 3x3 bucket neighbourhood first. Falls back to a full scan
    /// when the neighbourhood is empty, or when its best candidate is farther
    /// than one bucket side (a closer sample could then sit outside it).
    pub fn nearest(&self, field: &PointField, lat: f64, lon: f64) -> Option<usize> {
        let (lat_key, lon_key) = bucket_key(lat, lon, self.bucket_size);

        let mut slots: Vec<usize> = Vec::with_capacity(9);
        for dlat in -1..=1 {
            for dlon in -1..=1 {
                if let Some(&slot) = self.lookup.get(&(lat_key + dlat, lon_key + dlon)) {
                    slots.push(slot);
                }
            }
        }
        slots.sort_unstable();

        let mut best: Option<(usize, f64)> = None;
        for slot in slots {
            for &index in &self.buckets[slot] {
                let d2 = squared_distance(&field.samples()[index], lat, lon);
                if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                    best = Some((index, d2));
                }
            }
        }

        match best {
            Some((index, d2)) if d2 < self.bucket_size * self.bucket_size => Some(index),
            _ => field.nearest_linear(lat, lon),
        }
    }
}

fn bucket_key(lat: f64, lon: f64, bucket_size: f64) -> (i64, i64) {
    ((lat / bucket_size).round() as i64, (lon / bucket_size).round() as i64)
}

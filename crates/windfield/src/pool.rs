// Particle storage, seeding and density control

use crate::field::Field;
use crate::tools::wrap_lon;
use crate::viewport::ViewportState;
use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub lat: f64,
    pub lon: f64,
    /// Full ticks survived since the last reseed
    pub age: u32,
    /// Sample index in the field this particle was seeded from.
    /// Only meaningful while that field is active.
    pub origin: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub max_age: u32,
    pub jitter_deg: f64,
    pub viewport_margin_deg: f64,
    pub min_particles: usize,
    pub max_particles: usize,
}

/// Build a fresh particle around a randomly chosen sample.
///
/// Picks from `candidates` (indices into the field) when non-empty, from the
/// whole field otherwise. `age` is `None` for a fresh particle (age 0) or
/// `Some(max)` to draw a random age in `[0, max)`.
pub fn spawn(field: &Field, candidates: &[usize], config: &PoolConfig, rng: &mut impl Rng, age: Option<u32>) -> Option<Particle> {
    let index = if candidates.is_empty() {
        if field.is_empty() {
            return None;
        }
        rng.random_range(0..field.len())
    } else {
        candidates[rng.random_range(0..candidates.len())]
    };
    let (lat, lon) = field.position(index)?;

    let half = config.jitter_deg * 0.5;
    let (dlat, dlon) = if half > 0.0 {
        (rng.random_range(-half..=half), rng.random_range(-half..=half))
    } else {
        (0.0, 0.0)
    };

    let age = match age {
        Some(max) if max > 0 => rng.random_range(0..max),
        _ => 0,
    };

    Some(Particle {
        lat: (lat + dlat).clamp(-90.0, 90.0),
        lon: wrap_lon(lon + dlon),
        age,
        origin: Some(index),
    })
}

/// Indices of field samples inside the viewport grown by `margin` degrees
pub fn viewport_candidates(field: &Field, viewport: &ViewportState, margin: f64) -> Vec<usize> {
    (0..field.len())
        .filter(|&index| {
            field
                .position(index)
                .is_some_and(|(lat, lon)| viewport.bounds.contains_expanded(lat, lon, margin))
        })
        .collect()
}

/// Target particle count for a viewport and a density in particles per pixel
pub fn desired_count(viewport: &ViewportState, density: f64, config: &PoolConfig) -> usize {
    let raw = (viewport.area_px() * density.max(0.0)).floor();
    let raw = if raw.is_finite() { raw as usize } else { config.max_particles };
    raw.clamp(config.min_particles, config.max_particles.max(config.min_particles))
}

pub struct ParticlePool {
    particles: Vec<Particle>,
    candidates: Vec<usize>,
    config: PoolConfig,
    rng: StdRng,
}

impl ParticlePool {
    pub fn new(config: PoolConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            candidates: Vec::new(),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.candidates.clear();
    }

    /// Size of the viewport subset seeds are currently drawn from
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Recompute the viewport subset used for seeding
    pub fn refresh_candidates(&mut self, field: &Field, viewport: &ViewportState) {
        self.candidates = viewport_candidates(field, viewport, self.config.viewport_margin_deg);
    }

    /// Replace all particles with a fresh, age-staggered population
    pub fn initialize(&mut self, field: &Field, viewport: &ViewportState, density: f64) {
        self.particles.clear();
        self.refresh_candidates(field, viewport);
        let target = desired_count(viewport, density, &self.config);
        let max_age = Some(self.config.max_age);
        for _ in 0..target {
            match spawn(field, &self.candidates, &self.config, &mut self.rng, max_age) {
                Some(particle) => self.particles.push(particle),
                None => break,
            }
        }
        debug!(
            "initialized {} particles from {} viewport samples",
            self.particles.len(),
            self.candidates.len()
        );
    }

    /// New particle for slot `index`; the caller stores it back
    pub fn respawn(&mut self, field: &Field) -> Option<Particle> {
        spawn(field, &self.candidates, &self.config, &mut self.rng, None)
    }

    /// Reseed the particle at `index` in place. Returns false when the field
    /// has nothing to seed from.
    pub fn reseed(&mut self, index: usize, field: &Field) -> bool {
        if index >= self.particles.len() {
            return false;
        }
        match self.respawn(field) {
            Some(particle) => {
                self.particles[index] = particle;
                true
            }
            None => false,
        }
    }

    /// Grow or truncate the pool to the target count for the viewport
    pub fn rebalance(&mut self, field: &Field, viewport: &ViewportState, density: f64) {
        self.refresh_candidates(field, viewport);
        let target = desired_count(viewport, density, &self.config);
        let before = self.particles.len();

        if before > target {
            self.particles.truncate(target);
        } else {
            while self.particles.len() < target {
                match self.respawn(field) {
                    Some(particle) => self.particles.push(particle),
                    None => break,
                }
            }
        }

        if before != self.particles.len() {
            debug!("rebalanced particles {} -> {}", before, self.particles.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldPayload, GridPayload, VectorSample};
    use crate::tools::seeded_rng;
    use crate::viewport::GeoBounds;
    use rstest::rstest;

    fn config() -> PoolConfig {
        PoolConfig {
            max_age: 100,
            jitter_deg: 0.6,
            viewport_margin_deg: 1.0,
            min_particles: 200,
            max_particles: 3000,
        }
    }

    fn scattered_field() -> Field {
        let mut samples = Vec::new();
        for lat in (-80..=80).step_by(10) {
            for lon in (-180..180).step_by(10) {
                samples.push(VectorSample::new(lat as f64, lon as f64, 1.0, 0.0));
            }
        }
        FieldPayload::Points(samples).into_field().unwrap()
    }

    fn viewport(bounds: GeoBounds, size: (u32, u32)) -> ViewportState {
        ViewportState::new(bounds, size)
    }

    #[rstest]
    #[case((10, 10), 0.5, 200)] // below the floor
    #[case((1024, 1024), 0.0009765625, 1024)]
    #[case((1024, 1024), 0.001953125, 2048)]
    #[case((4000, 4000), 0.01, 3000)] // above the ceiling
    fn test_desired_count(#[case] size: (u32, u32), #[case] density: f64, #[case] expected: usize) {
        let view = viewport(GeoBounds::WORLD, size);
        assert_eq!(desired_count(&view, density, &config()), expected);
    }

    #[test]
    fn test_initialize_staggers_ages() {
        let field = scattered_field();
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(1)));
        pool.initialize(&field, &viewport(GeoBounds::WORLD, (1000, 1000)), 0.001);

        assert_eq!(pool.len(), 1000);
        assert!(pool.particles().iter().all(|p| p.age < 100));
        let distinct: std::collections::HashSet<u32> = pool.particles().iter().map(|p| p.age).collect();
        assert!(distinct.len() > 10);
    }

    #[test]
    fn test_spawn_jitters_within_half_width() {
        let field = FieldPayload::Points(vec![VectorSample::new(10.0, 20.0, 1.0, 0.0)]).into_field().unwrap();
        let mut rng = seeded_rng(Some(3));
        for _ in 0..500 {
            let particle = spawn(&field, &[], &config(), &mut rng, None).unwrap();
            assert!((particle.lat - 10.0).abs() <= 0.3 + 1e-12);
            assert!((particle.lon - 20.0).abs() <= 0.3 + 1e-12);
            assert_eq!(particle.age, 0);
            assert_eq!(particle.origin, Some(0));
        }
    }

    #[test]
    fn test_spawn_from_grid_nodes() {
        let field = FieldPayload::Grid(GridPayload {
            lats: vec![10.0, 0.0],
            lons: vec![0.0, 10.0],
            u: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            v: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        })
        .into_field()
        .unwrap();
        let mut rng = seeded_rng(Some(4));
        for _ in 0..100 {
            let particle = spawn(&field, &[], &config(), &mut rng, None).unwrap();
            let (lat, lon) = field.position(particle.origin.unwrap()).unwrap();
            assert!((particle.lat - lat).abs() <= 0.3 + 1e-12);
            assert!((particle.lon - lon).abs() <= 0.3 + 1e-12);
        }
    }

    #[test]
    fn test_spawn_from_empty_field() {
        let field = FieldPayload::Points(Vec::new()).into_field().unwrap();
        let mut rng = seeded_rng(Some(3));
        assert!(spawn(&field, &[], &config(), &mut rng, None).is_none());
    }

    #[test]
    fn test_seeds_prefer_viewport_samples() {
        let field = scattered_field();
        let bounds = GeoBounds::new(0.0, 20.0, 0.0, 20.0);
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(5)));
        pool.initialize(&field, &viewport(bounds, (500, 500)), 0.001);

        assert!(pool.candidate_count() > 0);
        for particle in pool.particles() {
            assert!(bounds.contains_expanded(particle.lat, particle.lon, 1.0 + 0.3));
        }
    }

    #[test]
    fn test_empty_viewport_subset_falls_back_to_whole_field() {
        let field = FieldPayload::Points(vec![VectorSample::new(-50.0, -50.0, 1.0, 0.0)]).into_field().unwrap();
        let bounds = GeoBounds::new(0.0, 20.0, 0.0, 20.0);
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(5)));
        pool.initialize(&field, &viewport(bounds, (500, 500)), 0.001);

        assert_eq!(pool.candidate_count(), 0);
        assert_eq!(pool.len(), 250);
        assert!(pool.particles().iter().all(|p| (p.lat + 50.0).abs() <= 0.3 + 1e-12));
    }

    #[test]
    fn test_antimeridian_viewport_candidates() {
        let field = FieldPayload::Points(vec![
            VectorSample::new(0.0, 175.0, 1.0, 0.0),
            VectorSample::new(0.0, -175.0, 1.0, 0.0),
            VectorSample::new(0.0, 0.0, 1.0, 0.0),
        ])
        .into_field()
        .unwrap();
        let view = viewport(GeoBounds::new(-10.0, 10.0, 170.0, -170.0), (100, 100));
        assert_eq!(viewport_candidates(&field, &view, 1.0), vec![0, 1]);
    }

    #[test]
    fn test_rebalance_is_idempotent() {
        let field = scattered_field();
        let view = viewport(GeoBounds::WORLD, (800, 600));
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(9)));
        pool.initialize(&field, &view, 0.001);

        pool.rebalance(&field, &view, 0.002);
        let first = pool.particles().to_vec();
        pool.rebalance(&field, &view, 0.002);

        assert_eq!(first.len(), 960);
        assert_eq!(pool.particles(), first.as_slice());
    }

    #[test]
    fn test_rebalance_truncates_keeping_prefix() {
        let field = scattered_field();
        let view = viewport(GeoBounds::WORLD, (1000, 1000));
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(11)));
        pool.initialize(&field, &view, 0.002);
        let before = pool.particles().to_vec();

        pool.rebalance(&field, &view, 0.0005);

        assert_eq!(pool.len(), 500);
        assert_eq!(pool.particles(), &before[..500]);
    }

    #[test]
    fn test_rebalance_appends_fresh_particles() {
        let field = scattered_field();
        let view = viewport(GeoBounds::WORLD, (1000, 1000));
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(12)));
        pool.initialize(&field, &view, 0.0005);

        pool.rebalance(&field, &view, 0.001);

        assert_eq!(pool.len(), 1000);
        assert!(pool.particles()[500..].iter().all(|p| p.age == 0));
    }

    #[test]
    fn test_reseed_replaces_slot() {
        let field = scattered_field();
        let view = viewport(GeoBounds::WORLD, (1000, 1000));
        let mut pool = ParticlePool::new(config(), seeded_rng(Some(13)));
        pool.initialize(&field, &view, 0.001);
        pool.particles_mut()[3].age = 99;

        assert!(pool.reseed(3, &field));
        assert_eq!(pool.particles()[3].age, 0);
        assert!(!pool.reseed(5000, &field));
    }
}

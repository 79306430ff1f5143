// Particle advection in degree space

use crate::pool::Particle;
use crate::sampler::VectorSampler;
use crate::tools::wrap_lon;

#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorConfig {
    /// Degrees moved per tick per unit of field speed
    pub velocity_scale: f64,
    pub substeps: u32,
    pub max_age: u32,
    /// Floor for cos(lat) so eastward steps stay finite near the poles
    pub pole_epsilon: f64,
}

/// What happened to a particle during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved,
    /// A sub-step found no field value; the partial advance is kept
    NoCoverage,
    /// Latitude left [-90, 90]
    LeftRange,
    /// Age went past the configured maximum
    Expired,
}

impl AdvanceOutcome {
    pub fn needs_reseed(self) -> bool {
        !matches!(self, AdvanceOutcome::Moved)
    }
}

/// Advance one particle by a full tick.
///
/// Each sub-step resamples at the partially advanced position. Longitude
/// steps are divided by cos(lat) so particles cover the right ground
/// distance away from the equator.
pub fn advance<S: VectorSampler + ?Sized>(particle: &mut Particle, sampler: &S, config: &IntegratorConfig) -> AdvanceOutcome {
    let substeps = config.substeps.max(1);
    let step = config.velocity_scale / substeps as f64;

    for _ in 0..substeps {
        let Some(wind) = sampler.sample(particle.lat, particle.lon) else {
            return AdvanceOutcome::NoCoverage;
        };
        let cos_lat = particle.lat.to_radians().cos().max(config.pole_epsilon);
        particle.lat += wind.y * step;
        particle.lon = wrap_lon(particle.lon + wind.x * step / cos_lat);
    }

    if !(-90.0..=90.0).contains(&particle.lat) {
        return AdvanceOutcome::LeftRange;
    }

    particle.age += 1;
    if particle.age > config.max_age {
        return AdvanceOutcome::Expired;
    }
    AdvanceOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rstest::rstest;
    use std::cell::RefCell;

    /// Same vector everywhere inside a latitude band
    struct Uniform {
        wind: DVec2,
        max_lat: f64,
    }

    impl VectorSampler for Uniform {
        fn sample(&self, lat: f64, _lon: f64) -> Option<DVec2> {
            (lat.abs() <= self.max_lat).then_some(self.wind)
        }
    }

    /// Records every position it is sampled at
    struct Recording {
        wind: DVec2,
        calls: RefCell<Vec<(f64, f64)>>,
    }

    impl VectorSampler for Recording {
        fn sample(&self, lat: f64, lon: f64) -> Option<DVec2> {
            self.calls.borrow_mut().push((lat, lon));
            Some(self.wind)
        }
    }

    fn particle(lat: f64, lon: f64) -> Particle {
        Particle {
            lat,
            lon,
            age: 0,
            origin: None,
        }
    }

    fn config(substeps: u32) -> IntegratorConfig {
        IntegratorConfig {
            velocity_scale: 0.01,
            substeps,
            max_age: 100,
            pole_epsilon: 0.01,
        }
    }

    #[test]
    fn test_eastward_step_at_equator() {
        let sampler = Uniform { wind: DVec2::new(10.0, 0.0), max_lat: 90.0 };
        let mut p = particle(0.0, 0.0);

        let outcome = advance(&mut p, &sampler, &config(1));

        assert_eq!(outcome, AdvanceOutcome::Moved);
        assert!((p.lon - 0.1).abs() < 1e-12);
        assert_eq!(p.lat, 0.0);
        assert_eq!(p.age, 1);
    }

    #[test]
    fn test_longitude_step_grows_with_latitude() {
        let sampler = Uniform { wind: DVec2::new(10.0, 0.0), max_lat: 90.0 };
        let mut p = particle(60.0, 0.0);

        advance(&mut p, &sampler, &config(1));

        // cos(60°) = 0.5
        assert!((p.lon - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_pole_epsilon_bounds_step() {
        let sampler = Uniform { wind: DVec2::new(1.0, 0.0), max_lat: 90.0 };
        let mut p = particle(90.0, 0.0);

        advance(&mut p, &sampler, &config(1));

        assert!((p.lon - 1.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn test_substeps_split_the_tick(#[case] substeps: u32) {
        let sampler = Recording { wind: DVec2::new(0.0, 30.0), calls: RefCell::new(Vec::new()) };
        let mut p = particle(0.0, 0.0);

        advance(&mut p, &sampler, &config(substeps));

        let calls = sampler.calls.borrow();
        assert_eq!(calls.len(), substeps as usize);
        // each sub-step samples where the previous one ended
        for (k, &(lat, _)) in calls.iter().enumerate() {
            assert!((lat - 0.3 * k as f64 / substeps as f64).abs() < 1e-12);
        }
        assert!((p.lat - 0.3).abs() < 1e-12);
        assert_eq!(p.age, 1);
    }

    #[test]
    fn test_wraps_past_antimeridian() {
        let sampler = Uniform { wind: DVec2::new(10.0, 0.0), max_lat: 90.0 };
        let mut p = particle(0.0, 179.95);

        let outcome = advance(&mut p, &sampler, &config(1));

        assert_eq!(outcome, AdvanceOutcome::Moved);
        assert!((p.lon - (180.05 - 360.0)).abs() < 1e-9);
    }

    #[test]
    fn test_wraps_westward() {
        let sampler = Uniform { wind: DVec2::new(-10.0, 0.0), max_lat: 90.0 };
        let mut p = particle(0.0, -179.95);

        advance(&mut p, &sampler, &config(1));

        assert!((p.lon - 179.95).abs() < 1e-9);
    }

    #[test]
    fn test_huge_eastward_wind_stays_in_range() {
        let sampler = Uniform { wind: DVec2::new(1e25, 0.0), max_lat: 90.0 };
        let mut p = particle(10.0, 20.0);

        let outcome = advance(&mut p, &sampler, &config(3));

        assert_eq!(outcome, AdvanceOutcome::Moved);
        assert!(p.lon.is_finite());
        assert!((-180.0..=180.0).contains(&p.lon));
    }

    #[test]
    fn test_no_coverage_keeps_partial_advance() {
        // coverage ends at lat 0.15; second of three sub-steps starts at 0.1,
        // third at 0.2 which is uncovered
        let sampler = Uniform { wind: DVec2::new(0.0, 30.0), max_lat: 0.15 };
        let mut p = particle(0.0, 0.0);

        let outcome = advance(&mut p, &sampler, &config(3));

        assert_eq!(outcome, AdvanceOutcome::NoCoverage);
        assert!(outcome.needs_reseed());
        assert!((p.lat - 0.2).abs() < 1e-12);
        assert_eq!(p.age, 0);
    }

    #[test]
    fn test_leaving_latitude_range() {
        let sampler = Uniform { wind: DVec2::new(0.0, 50.0), max_lat: 90.0 };
        let mut p = particle(89.8, 0.0);

        assert_eq!(advance(&mut p, &sampler, &config(1)), AdvanceOutcome::LeftRange);
    }

    #[test]
    fn test_expires_after_max_age() {
        let sampler = Uniform { wind: DVec2::new(1.0, 0.0), max_lat: 90.0 };
        let mut p = particle(0.0, 0.0);
        p.age = 100;

        let outcome = advance(&mut p, &sampler, &config(3));

        assert_eq!(outcome, AdvanceOutcome::Expired);
        assert_eq!(p.age, 101);
    }

    #[test]
    fn test_age_increments_once_per_tick() {
        let sampler = Uniform { wind: DVec2::new(1.0, 0.0), max_lat: 90.0 };
        let mut p = particle(0.0, 0.0);
        for _ in 0..10 {
            advance(&mut p, &sampler, &config(4));
        }
        assert_eq!(p.age, 10);
    }
}

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seeded generator for reproducible runs, OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(code) => StdRng::seed_from_u64(splitmix64(code)),
        None => StdRng::from_os_rng(),
    }
}

/// Spreads small user seeds (1, 2, 3...) across the full 64-bit state
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Wrap a longitude into [-180, 180]. Constant time for any finite input;
/// an eastward 180 stays 180 instead of flipping to -180.
pub fn wrap_lon(lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped.min(180.0) }
}

/// Degrees per bucket side in the spatial index
pub const BUCKET_SIZE_DEG: f64 = 2.0;

/// Full width of the uniform jitter applied around a seed sample
pub const SEED_JITTER_DEG: f64 = 0.6;
/// Margin added around the viewport when picking seed samples
pub const SEED_VIEWPORT_MARGIN_DEG: f64 = 1.0;

pub const MIN_PARTICLES: usize = 200;
pub const MAX_PARTICLES: usize = 3000;
/// Particles per square pixel; ~1200 particles on a 1280x720 view
pub const DEFAULT_DENSITY: f64 = 0.0013;

pub const MAX_AGE_CLASSIC: u32 = 120;
pub const MAX_AGE_BRISK: u32 = 80;

pub const VELOCITY_SCALE: f64 = 0.015;
pub const SUBSTEPS: u32 = 3;
/// Lower bound for cos(lat) when converting eastward speed to degrees
pub const POLE_EPSILON: f64 = 0.01;

pub const FADE_ALPHA: f64 = 0.08;
pub const CULL_MARGIN_PX: f64 = 50.0;
/// Segments longer than this fraction of the larger viewport side are dropped
pub const TELEPORT_FRACTION: f64 = 0.5;
pub const LINE_WIDTH: f64 = 1.1;
pub const TRAIL_COLOR: [u8; 4] = [200, 255, 255, 204];

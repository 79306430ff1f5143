use crate::constants::*;
use crate::error::ConfigError;
use crate::integrator::IntegratorConfig;
use crate::pool::PoolConfig;
use crate::renderer::{BlendMode, FadeMode, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named default sets. Particle lifetime is the main difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Long trails, slow turnover
    Classic,
    /// Short-lived particles and a stronger fade
    Brisk,
}

/// Missing sections fall back to the classic profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub sampling: SamplingConfig,
    pub particles: ParticleConfig,
    pub integration: IntegrationConfig,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub bucket_size_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub max_age: u32,
    pub jitter_deg: f64,
    pub viewport_margin_deg: f64,
    pub min_particles: usize,
    pub max_particles: usize,
    pub density: f64,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub velocity_scale: f64,
    pub substeps: u32,
    pub pole_epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub fade_alpha: f64,
    pub fade_mode: FadeMode,
    pub blend_mode: BlendMode,
    pub line_width: f64,
    pub color: [u8; 4],
    pub cull_margin_px: f64,
    pub teleport_fraction: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self::profile(Profile::Classic)
    }
}

impl WindConfig {
    pub fn profile(profile: Profile) -> Self {
        let (max_age, fade_alpha) = match profile {
            Profile::Classic => (MAX_AGE_CLASSIC, FADE_ALPHA),
            Profile::Brisk => (MAX_AGE_BRISK, 0.1),
        };
        Self {
            sampling: SamplingConfig {
                bucket_size_deg: BUCKET_SIZE_DEG,
            },
            particles: ParticleConfig {
                max_age,
                jitter_deg: SEED_JITTER_DEG,
                viewport_margin_deg: SEED_VIEWPORT_MARGIN_DEG,
                min_particles: MIN_PARTICLES,
                max_particles: MAX_PARTICLES,
                density: DEFAULT_DENSITY,
                seed: None,
            },
            integration: IntegrationConfig {
                velocity_scale: VELOCITY_SCALE,
                substeps: SUBSTEPS,
                pole_epsilon: POLE_EPSILON,
            },
            render: RenderSettings {
                fade_alpha,
                fade_mode: FadeMode::Erase,
                blend_mode: BlendMode::Additive,
                line_width: LINE_WIDTH,
                color: TRAIL_COLOR,
                cull_margin_px: CULL_MARGIN_PX,
                teleport_fraction: TELEPORT_FRACTION,
            },
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_age: self.particles.max_age,
            jitter_deg: self.particles.jitter_deg,
            viewport_margin_deg: self.particles.viewport_margin_deg,
            min_particles: self.particles.min_particles,
            max_particles: self.particles.max_particles,
        }
    }

    pub fn integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig {
            velocity_scale: self.integration.velocity_scale,
            substeps: self.integration.substeps.max(1),
            max_age: self.particles.max_age,
            pole_epsilon: self.integration.pole_epsilon,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            fade_alpha: self.render.fade_alpha.clamp(0.0, 1.0),
            fade_mode: self.render.fade_mode,
            blend_mode: self.render.blend_mode,
            line_width: self.render.line_width,
            color: self.render.color,
            cull_margin_px: self.render.cull_margin_px,
            teleport_fraction: self.render.teleport_fraction,
        }
    }
}

pub use crate::canvas::{PixelCanvas, TrailCanvas};
pub use crate::catalog::FieldCatalog;
pub use crate::config::{Profile, WindConfig};
pub use crate::context::{SimulationContext, TickOutcome};
pub use crate::error::{ConfigError, FieldError};
pub use crate::field::{Field, FieldPayload, GridPayload, VectorSample};
pub use crate::layer::{OverlayLayer, WindLayer};
pub use crate::projection::{Equirectangular, Projector};
pub use crate::renderer::FrameStats;
pub use crate::sampler::{FieldStore, VectorSampler};
pub use crate::viewport::{GeoBounds, ViewportState};

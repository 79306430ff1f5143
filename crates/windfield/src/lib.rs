pub mod canvas;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod field;
pub mod integrator;
pub mod layer;
pub mod pool;
pub mod prelude;
pub mod projection;
pub mod renderer;
pub mod sampler;
pub mod scheduler;
pub mod tools;
pub mod viewport;

pub use config::{Profile, WindConfig};
pub use context::{SimulationContext, TickOutcome};
pub use error::{ConfigError, FieldError};

//! Headless driver for the flocking core. A fixed-step clock advances a
//! scene built from config and emits one frame per tick.

pub mod config;
pub mod driver;
pub mod scene;

pub use config::{load_config, validate, Overrides};
pub use driver::{RunStats, Simulation};
pub use scene::{FlockEntity, FlockSummary, Marker, Scene, SceneObject};

extern crate nalgebra as na;

pub mod geometry;
pub mod model;
pub mod config;
pub mod region;
pub mod registry;
pub mod engine;
pub mod snapshot;
mod error;

pub use config::EngineConfig;
pub use engine::{GraphEngine, PointerMode, PointerOutcome, RegionChange};
pub use error::GraphError;
pub use snapshot::GraphSnapshot;

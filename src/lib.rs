//! Flocking and predator-prey simulation on a bounded, toroidal 2D plane.
//!
//! Build a [`SimulationState`] from a [`SimulationConfig`], call
//! [`SimulationState::step`] once per frame and read
//! [`SimulationState::snapshot`] to draw.

pub mod agent;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod forces;
pub mod integrator;
pub mod predation;
pub mod simulation;
pub mod spatial;
mod utils;

pub use agent::Agent;
pub use config::{BoidConfig, Hotzone, PredatorConfig, SimulationConfig};
pub use error::ConfigError;
pub use field::{FieldRaster, FieldSample, generate_field};
pub use predation::CatchEvent;
pub use simulation::{SimulationSnapshot, SimulationState, StepReport};
pub use spatial::SpatialGrid;

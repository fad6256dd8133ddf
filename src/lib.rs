//! Boids flocking on a toroidal plane.
//!
//! - `heading`: the per-step, data-parallel heading computation
//! - `driver`: owns the agent arrays and advances them step by step
//! - `neighborhood`: wrapped-plane geometry
//! - `params` / `config`: run parameters and their JSON form

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod heading;
pub mod neighborhood;
pub mod params;

pub use components::{Point2, Vector2};
pub use config::RunConfig;
pub use driver::{Flock, Frame, FrameSink, NullSink};
pub use error::{BoidsError, Result};
pub use heading::{compute_step, compute_step_sequential, rule_vectors, RuleVectors};
pub use params::SimulationParameters;

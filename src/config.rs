//! Run settings, loaded from JSON.
//!
//! Every field has a default, so a file only lists what it overrides:
//!
//! ```json
//! { "agent_count": 400, "parameters": { "view_angle": 300.0, "radius_avoid": 12.0 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BoidsError, Result};
use crate::params::SimulationParameters;

pub const AGENT_COUNT: usize = 20;
pub const STEPS: u64 = 1000;
pub const THREADS: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent_count: usize,
    pub steps: u64,
    /// Seed for the initial positions and headings.
    pub seed: u64,
    /// Worker threads for the heading computation; 0 leaves rayon's default.
    pub threads: usize,
    /// Log progress every this many steps; 0 disables.
    pub progress_every: u64,
    pub parameters: SimulationParameters,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            agent_count: AGENT_COUNT,
            steps: STEPS,
            seed: 0,
            threads: THREADS,
            progress_every: 0,
            parameters: SimulationParameters::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| BoidsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

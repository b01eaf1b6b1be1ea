//! # Hyperparameters
//!
//! The immutable configuration an agent is built from. Field names follow the
//! keys used by existing training configs (`Rand_Seed`, `GAMMA`,
//! `learning_rate_adam`, ...), so a JSON document like
//!
//! ```json
//! {
//!     "Rand_Seed": 42,
//!     "hidden_size": 64,
//!     "input_size": 4,
//!     "num_actions": 2,
//!     "adam_eps": 1e-7,
//!     "learning_rate_adam": 0.001,
//!     "GAMMA": 0.99,
//!     "epsilon": 1.0
//! }
//! ```
//!
//! loads directly with [`Hyperparams::from_json_str`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Network shape, optimiser and learning-rule settings for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    /// Seed for the agent's own random generator
    #[serde(rename = "Rand_Seed")]
    pub rand_seed: u64,

    /// Width of each of the three hidden layers
    pub hidden_size: usize,

    /// Length of a state vector
    pub input_size: usize,

    /// Size of the discrete action space
    pub num_actions: usize,

    /// Numerical-stability term of Adam
    pub adam_eps: f64,

    /// Step size of Adam
    #[serde(rename = "learning_rate_adam")]
    pub learning_rate: f64,

    /// Discount factor
    #[serde(rename = "GAMMA")]
    pub gamma: f64,

    /// Initial exploration probability
    pub epsilon: f64,
}

impl Hyperparams {
    /// Check every value is in range before it reaches numeric code.
    pub fn validate(&self) -> Result<()> {
        positive_size("hidden_size", self.hidden_size)?;
        positive_size("input_size", self.input_size)?;
        positive_size("num_actions", self.num_actions)?;

        if !(self.adam_eps.is_finite() && self.adam_eps > 0.0) {
            return Err(PolicyError::invalid_parameter(
                "adam_eps".to_string(),
                format!("must be a positive finite number, got {}", self.adam_eps),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PolicyError::invalid_parameter(
                "learning_rate_adam".to_string(),
                format!("must be a positive finite number, got {}", self.learning_rate),
            ));
        }
        unit_interval("GAMMA", self.gamma)?;
        unit_interval("epsilon", self.epsilon)?;
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let hparams: Hyperparams = serde_json::from_str(json)?;
        hparams.validate()?;
        Ok(hparams)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Layer widths from input to output: input, three hidden layers, actions.
    pub fn layer_sizes(&self) -> [usize; 5] {
        [
            self.input_size,
            self.hidden_size,
            self.hidden_size,
            self.hidden_size,
            self.num_actions,
        ]
    }
}

fn positive_size(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(PolicyError::invalid_parameter(
            name.to_string(),
            "must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PolicyError::invalid_parameter(
            name.to_string(),
            format!("must be in [0, 1], got {}", value),
        ));
    }
    Ok(())
}

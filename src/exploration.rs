//! Epsilon-greedy exploration schedule.
//!
//! The agent holds exactly one [`EpsilonSchedule`]. Action selection reads
//! [`EpsilonSchedule::value`] and every replay step calls
//! [`EpsilonSchedule::decay`], so the probability of a random action shrinks
//! geometrically towards `epsilon_min` as training proceeds.

use serde::{Serialize, Deserialize};

use crate::error::{PolicyError, Result};

/// Geometric epsilon decay with a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    epsilon: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
}

impl EpsilonSchedule {
    pub fn new(epsilon: f64, epsilon_min: f64, epsilon_decay: f64) -> Result<Self> {
        for (name, value) in [("epsilon", epsilon), ("epsilon_min", epsilon_min)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::invalid_parameter(
                    name.to_string(),
                    format!("must be in [0, 1], got {}", value),
                ));
            }
        }
        if !(epsilon_decay > 0.0 && epsilon_decay <= 1.0) {
            return Err(PolicyError::invalid_parameter(
                "epsilon_decay".to_string(),
                format!("must be in (0, 1], got {}", epsilon_decay),
            ));
        }
        Ok(EpsilonSchedule { epsilon, epsilon_min, epsilon_decay })
    }

    /// Current probability of taking a random action.
    pub fn value(&self) -> f64 {
        self.epsilon
    }

    /// Multiply epsilon by the decay factor, never going below the floor.
    ///
    /// A schedule that starts below its floor is left where it is.
    pub fn decay(&mut self) -> f64 {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }
        self.epsilon
    }

    /// Log-shaped alternative: `max(min, min(epsilon, 1 - log10((t + 1) * decay)))`.
    ///
    /// Pure; does not change the schedule.
    pub fn log_epsilon(&self, t: usize) -> f64 {
        let log_value = 1.0 - ((t as f64 + 1.0) * self.epsilon_decay).log10();
        self.epsilon_min.max(self.epsilon.min(log_value))
    }
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        EpsilonSchedule {
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
        }
    }
}

//! The contract an environment must satisfy to be driven by the agent.
//!
//! The agent itself only ever touches [`Environment::action_space`], to draw a
//! random action while exploring. `reset` and `step` are what a training loop
//! uses to produce the transitions fed to `remember`.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A discrete set of actions that can be sampled uniformly.
pub trait ActionSpace {
    /// Number of actions, indexed `0..n`
    fn n(&self) -> usize;

    /// A uniformly random action index
    fn sample(&mut self) -> usize;
}

/// Result of advancing an environment by one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Array1<f64>,
    pub reward: f64,
    pub done: bool,
}

pub trait Environment {
    type Space: ActionSpace;

    fn action_space(&mut self) -> &mut Self::Space;

    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Array1<f64>;

    fn step(&mut self, action: usize) -> Step;
}

/// `n` actions sampled from an owned, seedable generator.
#[derive(Debug, Clone)]
pub struct Discrete {
    n: usize,
    rng: StdRng,
}

impl Discrete {
    pub fn new(n: usize, seed: u64) -> Self {
        Discrete {
            n,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ActionSpace for Discrete {
    fn n(&self) -> usize {
        self.n
    }

    /// Always 0 for an empty space, which the agent then rejects as invalid.
    fn sample(&mut self) -> usize {
        if self.n == 0 {
            return 0;
        }
        self.rng.gen_range(0..self.n)
    }
}

use ndarray::Array1;
use rand::Rng;
use rand::seq::index;
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;

/// Default number of transitions an agent keeps.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// One observed step of environment interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f64>,
    pub action: usize,
    pub reward: f64,
    pub next_state: Array1<f64>,
    pub done: bool,
}

/// Bounded FIFO store of transitions with uniform sampling.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    /// A zero capacity buffer keeps nothing; builders reject it before it gets here.
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn push(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `min(len, batch_size)` distinct transitions uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&Transition> {
        let amount = batch_size.min(self.buffer.len());
        index::sample(rng, self.buffer.len(), amount)
            .into_iter()
            .map(|i| &self.buffer[i])
            .collect()
    }

    /// Transitions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

pub mod test_replay_buffer;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::config::Hyperparams;
use crate::environment::{ActionSpace, Environment, Step};
use crate::error::Result;
use crate::network::ValueNetwork;

pub fn hparams(input_size: usize, num_actions: usize) -> Hyperparams {
    Hyperparams {
        rand_seed: 42,
        hidden_size: 8,
        input_size,
        num_actions,
        adam_eps: 1e-7,
        learning_rate: 1e-3,
        gamma: 0.9,
        epsilon: 0.0,
    }
}

/// Network with hand-written outputs: exact state matches come from `table`,
/// everything else gets `default`. Training steps are recorded, not applied.
pub struct TableNetwork {
    pub input_size: usize,
    pub table: Vec<(Array1<f64>, Array1<f64>)>,
    pub default: Array1<f64>,
    pub recorded: Vec<(Array2<f64>, Array2<f64>)>,
}

impl TableNetwork {
    pub fn new(input_size: usize, default: Array1<f64>) -> Self {
        TableNetwork {
            input_size,
            table: Vec::new(),
            default,
            recorded: Vec::new(),
        }
    }

    pub fn with_entry(mut self, state: Array1<f64>, values: Array1<f64>) -> Self {
        self.table.push((state, values));
        self
    }

    fn lookup(&self, state: ArrayView1<f64>) -> Array1<f64> {
        self.table
            .iter()
            .find(|(s, _)| s.view() == state)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

impl ValueNetwork for TableNetwork {
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn num_actions(&self) -> usize {
        self.default.len()
    }

    fn predict(&self, states: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut out = Array2::zeros((states.nrows(), self.default.len()));
        for (i, row) in states.rows().into_iter().enumerate() {
            out.row_mut(i).assign(&self.lookup(row));
        }
        Ok(out)
    }

    fn train_step(&mut self, states: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
        self.recorded.push((states.to_owned(), targets.to_owned()));
        Ok(0.5)
    }
}

/// Action space that always answers `action` and counts how often it was asked.
pub struct CountingSpace {
    pub n: usize,
    pub action: usize,
    pub calls: usize,
}

impl ActionSpace for CountingSpace {
    fn n(&self) -> usize {
        self.n
    }

    fn sample(&mut self) -> usize {
        self.calls += 1;
        self.action
    }
}

pub struct CountingEnv {
    pub space: CountingSpace,
    pub input_size: usize,
}

impl CountingEnv {
    pub fn new(input_size: usize, n: usize, action: usize) -> Self {
        CountingEnv {
            space: CountingSpace { n, action, calls: 0 },
            input_size,
        }
    }
}

impl Environment for CountingEnv {
    type Space = CountingSpace;

    fn action_space(&mut self) -> &mut CountingSpace {
        &mut self.space
    }

    fn reset(&mut self) -> Array1<f64> {
        Array1::zeros(self.input_size)
    }

    fn step(&mut self, _action: usize) -> Step {
        Step {
            observation: Array1::zeros(self.input_size),
            reward: 0.0,
            done: true,
        }
    }
}

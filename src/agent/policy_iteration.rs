use std::path::Path;

use log::{debug, info, trace};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Hyperparams;
use crate::environment::{ActionSpace, Environment};
use crate::error::{PolicyError, Result};
use crate::exploration::EpsilonSchedule;
use crate::network::{NeuralNetwork, ValueNetwork};
use crate::replay_buffer::{ReplayBuffer, Transition, DEFAULT_CAPACITY};

/// Deep Q-learning agent with experience replay and epsilon-greedy exploration.
///
/// The agent owns its random generator, so two agents built from the same
/// seed make the same decisions. Nothing here touches global random state.
///
/// # Example
///
/// ```rust
/// use policy_iteration::agent::PolicyIterationAgent;
/// use policy_iteration::config::Hyperparams;
/// use ndarray::array;
///
/// let hparams = Hyperparams {
///     rand_seed: 7,
///     hidden_size: 16,
///     input_size: 2,
///     num_actions: 3,
///     adam_eps: 1e-7,
///     learning_rate: 1e-3,
///     gamma: 0.9,
///     epsilon: 0.5,
/// };
/// let mut agent = PolicyIterationAgent::from_hyperparams(hparams).unwrap();
///
/// agent.remember(array![0.1, -0.2], 1, 1.0, array![0.2, -0.1], false).unwrap();
/// let loss = agent.replay(32).unwrap();
/// assert!(loss >= 0.0);
/// ```
pub struct PolicyIterationAgent<N: ValueNetwork = NeuralNetwork, R: Rng = StdRng> {
    hparams: Hyperparams,

    /// Function approximator mapping states to action values
    pub network: N,

    memory: ReplayBuffer,

    exploration: EpsilonSchedule,

    rng: R,

    /// Number of replay steps performed
    pub train_steps: usize,
}

impl PolicyIterationAgent<NeuralNetwork, StdRng> {
    /// Build the default network and seed the generator from `Rand_Seed`.
    pub fn from_hyperparams(hparams: Hyperparams) -> Result<Self> {
        PolicyIterationAgentBuilder::new().hyperparams(hparams).build()
    }
}

impl<R: Rng> PolicyIterationAgent<NeuralNetwork, R> {
    /// Build the default network, drawing its initial weights from `rng`.
    pub fn new(hparams: Hyperparams, rng: R) -> Result<Self> {
        PolicyIterationAgentBuilder::new().hyperparams(hparams).build_with_rng(rng)
    }

    pub fn save_network<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.network.save(path)
    }

    /// Replace the network with one loaded from disk. Its shape must match the
    /// hyperparameters this agent was built with.
    pub fn load_network<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let network = NeuralNetwork::load(path)?;
        check_network_shape(&self.hparams, &network)?;
        self.network = network;
        Ok(())
    }
}

impl<N: ValueNetwork, R: Rng> PolicyIterationAgent<N, R> {
    /// Assemble an agent around an existing network.
    pub fn with_network(
        hparams: Hyperparams,
        network: N,
        exploration: EpsilonSchedule,
        memory_capacity: usize,
        rng: R,
    ) -> Result<Self> {
        hparams.validate()?;
        check_network_shape(&hparams, &network)?;
        if memory_capacity == 0 {
            return Err(PolicyError::invalid_parameter(
                "memory_capacity".to_string(),
                "Capacity must be greater than 0".to_string(),
            ));
        }

        info!(
            "Created agent: input_size={}, num_actions={}, hidden_size={}, gamma={}, epsilon={}, memory_capacity={}",
            hparams.input_size,
            hparams.num_actions,
            hparams.hidden_size,
            hparams.gamma,
            exploration.value(),
            memory_capacity,
        );

        Ok(PolicyIterationAgent {
            hparams,
            network,
            memory: ReplayBuffer::new(memory_capacity),
            exploration,
            rng,
            train_steps: 0,
        })
    }

    /// Epsilon-greedy action for `state`.
    ///
    /// With probability epsilon the action comes from the environment's own
    /// sampler, otherwise it is the highest-valued action (lowest index on ties).
    pub fn get_action<E: Environment>(&mut self, state: ArrayView1<f64>, env: &mut E) -> Result<usize> {
        self.check_state("state", state)?;

        if self.rng.gen::<f64>() < self.exploration.value() {
            let action = env.action_space().sample();
            trace!("Exploring: sampled action {}", action);
            self.check_action(action)?;
            Ok(action)
        } else {
            let action = self.greedy_action(state)?;
            trace!("Exploiting: greedy action {}", action);
            Ok(action)
        }
    }

    /// The action with the highest predicted value, ignoring exploration.
    pub fn greedy_action(&self, state: ArrayView1<f64>) -> Result<usize> {
        let q_values = self.q_values(state)?;
        argmax(q_values.view())
    }

    /// Predicted value of every action in `state`.
    pub fn q_values(&self, state: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_state("state", state)?;
        self.network.predict_one(state)
    }

    /// Store one transition, evicting the oldest when the memory is full.
    pub fn remember(
        &mut self,
        state: Array1<f64>,
        action: usize,
        reward: f64,
        next_state: Array1<f64>,
        done: bool,
    ) -> Result<()> {
        self.check_state("state", state.view())?;
        self.check_state("next_state", next_state.view())?;
        self.check_action(action)?;
        if !reward.is_finite() {
            return Err(PolicyError::NumericalError(format!("reward is {}", reward)));
        }
        for (name, values) in [("state", &state), ("next_state", &next_state)] {
            if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                return Err(PolicyError::NumericalError(format!("{} contains {}", name, v)));
            }
        }

        self.memory.push(Transition {
            state,
            action,
            reward,
            next_state,
            done,
        });
        Ok(())
    }

    /// Fit the network on up to `batch_size` remembered transitions, then decay epsilon.
    ///
    /// Returns the training loss of the minibatch.
    pub fn replay(&mut self, batch_size: usize) -> Result<f64> {
        if batch_size == 0 {
            return Err(PolicyError::invalid_parameter(
                "batch_size".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        if self.memory.is_empty() {
            return Err(PolicyError::EmptyBuffer("No transitions to replay".to_string()));
        }

        let batch = self.memory.sample(batch_size, &mut self.rng);
        let (states, targets) = bootstrapped_targets(&self.network, &batch, self.hparams.gamma)?;
        let loss = self.network.train_step(states.view(), targets.view())?;

        let epsilon = self.exploration.decay();
        self.train_steps += 1;
        debug!(
            "Replay step {}: batch={}, loss={:.6}, epsilon={:.4}",
            self.train_steps,
            states.nrows(),
            loss,
            epsilon,
        );

        Ok(loss)
    }

    /// Current exploration probability.
    pub fn epsilon(&self) -> f64 {
        self.exploration.value()
    }

    /// Log-shaped epsilon for step `t`; see [`EpsilonSchedule::log_epsilon`].
    pub fn get_epsilon(&self, t: usize) -> f64 {
        self.exploration.log_epsilon(t)
    }

    pub fn exploration(&self) -> &EpsilonSchedule {
        &self.exploration
    }

    pub fn memory(&self) -> &ReplayBuffer {
        &self.memory
    }

    pub fn hyperparams(&self) -> &Hyperparams {
        &self.hparams
    }

    fn check_state(&self, name: &str, state: ArrayView1<f64>) -> Result<()> {
        if state.len() != self.hparams.input_size {
            return Err(PolicyError::dimension_mismatch(
                format!("{} of length {}", name, self.hparams.input_size),
                format!("length {}", state.len()),
            ));
        }
        Ok(())
    }

    fn check_action(&self, action: usize) -> Result<()> {
        if action >= self.hparams.num_actions {
            return Err(PolicyError::InvalidAction {
                action,
                max_actions: self.hparams.num_actions,
            });
        }
        Ok(())
    }
}

/// Stack a batch into `(states, targets)` for one training step.
///
/// Targets start as the network's own predictions, so only the taken action's
/// entry differs: the reward for terminal transitions, otherwise the reward plus
/// `gamma` times the best predicted value of the next state.
fn bootstrapped_targets<N: ValueNetwork>(
    network: &N,
    batch: &[&Transition],
    gamma: f64,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let input_size = network.input_size();
    let mut states = Array2::zeros((batch.len(), input_size));
    for (i, transition) in batch.iter().enumerate() {
        states.row_mut(i).assign(&transition.state);
    }

    let mut targets = network.predict(states.view())?;
    for (i, transition) in batch.iter().enumerate() {
        let value = if transition.done {
            transition.reward
        } else {
            let next_values = network.predict_one(transition.next_state.view())?;
            transition.reward + gamma * max_value(next_values.view())?
        };
        targets[[i, transition.action]] = value;
    }

    Ok((states, targets))
}

/// Index of the first maximum.
fn argmax(values: ArrayView1<f64>) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return Err(PolicyError::NumericalError(format!("action value {} is NaN", i)));
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
        .ok_or_else(|| PolicyError::NumericalError("No action values".to_string()))
}

fn max_value(values: ArrayView1<f64>) -> Result<f64> {
    let i = argmax(values)?;
    Ok(values[i])
}

fn check_network_shape<N: ValueNetwork>(hparams: &Hyperparams, network: &N) -> Result<()> {
    let expected = (hparams.input_size, hparams.num_actions);
    let actual = (network.input_size(), network.num_actions());
    if expected != actual {
        return Err(PolicyError::dimension_mismatch(
            format!("network (input, actions) = {:?}", expected),
            format!("{:?}", actual),
        ));
    }
    Ok(())
}

/// Builder pattern for PolicyIterationAgent
pub struct PolicyIterationAgentBuilder {
    hparams: Option<Hyperparams>,
    epsilon: Option<f64>,
    epsilon_min: f64,
    epsilon_decay: f64,
    memory_capacity: usize,
}

impl PolicyIterationAgentBuilder {
    pub fn new() -> Self {
        let schedule = EpsilonSchedule::default();
        PolicyIterationAgentBuilder {
            hparams: None,
            epsilon: None,
            epsilon_min: schedule.epsilon_min,
            epsilon_decay: schedule.epsilon_decay,
            memory_capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn hyperparams(mut self, hparams: Hyperparams) -> Self {
        self.hparams = Some(hparams);
        self
    }

    /// Starting epsilon; defaults to the hyperparameters' `epsilon`.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn epsilon_min(mut self, epsilon_min: f64) -> Self {
        self.epsilon_min = epsilon_min;
        self
    }

    /// Multiplicative decay applied after each replay step; `1.0` keeps epsilon fixed.
    pub fn epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    /// Build with the default network and a generator seeded from `Rand_Seed`.
    pub fn build(self) -> Result<PolicyIterationAgent<NeuralNetwork, StdRng>> {
        let seed = self.require_hparams()?.rand_seed;
        self.build_with_rng(StdRng::seed_from_u64(seed))
    }

    /// Build with the default network, initialised from `rng`.
    pub fn build_with_rng<R: Rng>(self, mut rng: R) -> Result<PolicyIterationAgent<NeuralNetwork, R>> {
        let network = NeuralNetwork::from_hyperparams(self.require_hparams()?, &mut rng)?;
        self.build_with_network(network, rng)
    }

    /// Build around a caller-supplied network.
    pub fn build_with_network<N: ValueNetwork, R: Rng>(self, network: N, rng: R) -> Result<PolicyIterationAgent<N, R>> {
        let hparams = self.hparams.ok_or_else(missing_hparams)?;
        let exploration = EpsilonSchedule::new(
            self.epsilon.unwrap_or(hparams.epsilon),
            self.epsilon_min,
            self.epsilon_decay,
        )?;
        PolicyIterationAgent::with_network(hparams, network, exploration, self.memory_capacity, rng)
    }

    fn require_hparams(&self) -> Result<&Hyperparams> {
        self.hparams.as_ref().ok_or_else(missing_hparams)
    }
}

fn missing_hparams() -> PolicyError {
    PolicyError::invalid_parameter(
        "hyperparams".to_string(),
        "Hyperparameters must be specified".to_string(),
    )
}

impl Default for PolicyIterationAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

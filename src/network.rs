//! # Value Network
//!
//! The agent only talks to its function approximator through [`ValueNetwork`]:
//! batched prediction and a single supervised training step. [`NeuralNetwork`] is
//! the built-in implementation, a dense ReLU network trained with Adam on mean
//! squared error, but any backend with the same two operations can be dropped in.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use bincode::{serialize, deserialize};
use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::config::Hyperparams;
use crate::error::{PolicyError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, MeanSquaredError};
use crate::optimizer::{Adam, Optimizer};

/// A differentiable map from state vectors to one value per discrete action.
pub trait ValueNetwork {
    /// Length of the state vectors the network accepts
    fn input_size(&self) -> usize;

    /// Number of action values produced per state
    fn num_actions(&self) -> usize;

    /// Evaluate a `(batch, input_size)` matrix into `(batch, num_actions)` values.
    fn predict(&self, states: ArrayView2<f64>) -> Result<Array2<f64>>;

    /// One gradient step pulling `predict(states)` towards `targets`, returning the
    /// mean squared error measured before the step.
    fn train_step(&mut self, states: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64>;

    /// Evaluate a single state.
    fn predict_one(&self, state: ArrayView1<f64>) -> Result<Array1<f64>> {
        let batch = self.predict(state.insert_axis(Axis(0)))?;
        Ok(batch.index_axis_move(Axis(0), 0))
    }
}

/// A feed-forward network of dense layers with its optimizer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: Adam,
}

impl NeuralNetwork {
    /// Create a network with the given layer sizes and activations.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        init: WeightInit,
        learning_rate: f64,
        adam_eps: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(PolicyError::invalid_parameter(
                "layer_sizes".to_string(),
                "Must have at least 2 layers".to_string(),
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(PolicyError::invalid_parameter(
                "activations".to_string(),
                "Number of activations must match number of layers - 1".to_string(),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, init, &mut *rng))
            .collect::<Result<Vec<_>>>()?;
        let optimizer = Adam::with_defaults(&layers, learning_rate, adam_eps);

        Ok(NeuralNetwork { layers, optimizer })
    }

    /// Three He-initialised ReLU layers of `hidden_size` and a linear output per action.
    pub fn from_hyperparams<R: Rng + ?Sized>(hparams: &Hyperparams, rng: &mut R) -> Result<Self> {
        hparams.validate()?;
        let activations = [
            Activation::Relu,
            Activation::Relu,
            Activation::Relu,
            Activation::Linear,
        ];
        Self::new(
            &hparams.layer_sizes(),
            &activations,
            WeightInit::HeNormal,
            hparams.learning_rate,
            hparams.adam_eps,
            rng,
        )
    }

    fn check_input(&self, inputs: ArrayView2<f64>) -> Result<()> {
        if inputs.nrows() == 0 {
            return Err(PolicyError::EmptyBuffer("batch has no rows".to_string()));
        }
        if inputs.ncols() != ValueNetwork::input_size(self) {
            return Err(PolicyError::dimension_mismatch(
                format!("(_, {})", ValueNetwork::input_size(self)),
                format!("{:?}", inputs.dim()),
            ));
        }
        Ok(())
    }

    /// Forward pass that caches activations in every layer.
    pub(crate) fn forward_batch(&mut self, inputs: ArrayView2<f64>) -> Array2<f64> {
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        current_output
    }

    /// Backpropagate output errors, returning `(weight, bias)` gradients in layer order.
    pub(crate) fn backward_batch(&self, output_errors: ArrayView2<f64>) -> Result<Vec<(Array2<f64>, Array1<f64>)>> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// Save the network, weights and optimizer state, to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path.as_ref())?;
        file.write_all(&serialized)?;
        info!("Saved value network to {:?}", path.as_ref());
        Ok(())
    }

    /// Load a network previously written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path.as_ref())?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let network: Self = deserialize(&buffer)?;
        info!("Loaded value network from {:?}", path.as_ref());
        Ok(network)
    }
}

impl ValueNetwork for NeuralNetwork {
    fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    fn num_actions(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }

    fn predict(&self, states: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_input(states)?;
        let mut current_output = states.to_owned();
        for layer in &self.layers {
            current_output = layer.predict_batch(current_output.view());
        }
        Ok(current_output)
    }

    fn train_step(&mut self, states: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
        self.check_input(states)?;
        let expected = (states.nrows(), ValueNetwork::num_actions(self));
        if targets.dim() != expected {
            return Err(PolicyError::dimension_mismatch(
                format!("{:?}", expected),
                format!("{:?}", targets.dim()),
            ));
        }

        let outputs = self.forward_batch(states);
        let loss = MeanSquaredError.compute_batch(outputs.view(), targets);
        if !loss.is_finite() {
            return Err(PolicyError::NumericalError(format!("loss is {}", loss)));
        }
        let output_errors = MeanSquaredError.gradient_batch(outputs.view(), targets);
        let gradients = self.backward_batch(output_errors.view())?;

        self.optimizer.begin_step();
        for (i, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(i, &mut layer.weights, &weight_gradients)?;
            self.optimizer.update_biases(i, &mut layer.biases, &bias_gradients)?;
        }

        Ok(loss)
    }
}

//! Gradient-descent optimisers for the value network.

pub mod adam;

use ndarray::{Array1, Array2};

use crate::error::Result;

pub use adam::Adam;

/// A per-layer parameter update rule.
///
/// `begin_step` is called once per training step, before the layer updates, so
/// stateful optimisers can advance their time step exactly once per batch.
pub trait Optimizer {
    fn begin_step(&mut self);
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f64>, gradients: &Array2<f64>) -> Result<()>;
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f64>, gradients: &Array1<f64>) -> Result<()>;
}

use ndarray::{Array2, ArrayView2};
use serde::{Serialize, Deserialize};

/// An enumeration of the activation functions a dense layer can apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function to a batch in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f64>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    /// Compute the derivative of the activation function for a batch of pre-activations.
    pub fn derivative_batch(&self, inputs: ArrayView2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => {
                inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
            }
            Activation::Linear => {
                Array2::ones(inputs.dim())
            }
        }
    }
}

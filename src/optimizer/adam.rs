use ndarray::{Array1, Array2, Dimension, Array, Zip};
use serde::{Serialize, Deserialize};

use crate::error::{PolicyError, Result};
use crate::layers::DenseLayer;
use super::Optimizer;

/// Adam with bias-corrected first and second moment estimates, one moment pair
/// per layer parameter.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    m_weights: Vec<Array2<f64>>,
    v_weights: Vec<Array2<f64>>,
    m_biases: Vec<Array1<f64>>,
    v_biases: Vec<Array1<f64>>,
    /// Number of training steps taken so far
    pub t: usize,
}

impl Adam {
    pub fn new(layers: &[DenseLayer], learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        let m_weights = layers
            .iter()
            .map(|layer| Array2::<f64>::zeros(layer.weights.dim()))
            .collect();
        let v_weights = layers
            .iter()
            .map(|layer| Array2::<f64>::zeros(layer.weights.dim()))
            .collect();
        let m_biases = layers
            .iter()
            .map(|layer| Array1::<f64>::zeros(layer.biases.dim()))
            .collect();
        let v_biases = layers
            .iter()
            .map(|layer| Array1::<f64>::zeros(layer.biases.dim()))
            .collect();

        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m_weights,
            v_weights,
            m_biases,
            v_biases,
            t: 0,
        }
    }

    /// Adam with the usual beta defaults.
    pub fn with_defaults(layers: &[DenseLayer], learning_rate: f64, epsilon: f64) -> Self {
        Self::new(layers, learning_rate, 0.9, 0.999, epsilon)
    }
}

/// Bias-corrected step size terms for the current time step.
#[derive(Clone, Copy)]
struct StepCoefficients {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    bias_correction1: f64,
    bias_correction2: f64,
}

impl Adam {
    fn coefficients(&self) -> Result<StepCoefficients> {
        if self.t == 0 {
            return Err(PolicyError::NumericalError(
                "begin_step() must be called before applying updates".to_string(),
            ));
        }
        Ok(StepCoefficients {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
            bias_correction1: 1.0 - self.beta1.powi(self.t as i32),
            bias_correction2: 1.0 - self.beta2.powi(self.t as i32),
        })
    }
}

fn apply_update<D: Dimension>(
    c: StepCoefficients,
    params: &mut Array<f64, D>,
    gradients: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
) -> Result<()> {
    for other in [gradients.shape(), m.shape(), v.shape()] {
        if params.shape() != other {
            return Err(PolicyError::dimension_mismatch(
                format!("{:?}", params.shape()),
                format!("{:?}", other),
            ));
        }
    }

    Zip::from(params)
        .and(gradients)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = c.beta1 * *m + (1.0 - c.beta1) * g;
            *v = c.beta2 * *v + (1.0 - c.beta2) * g * g;
            let m_hat = *m / c.bias_correction1;
            let v_hat = *v / c.bias_correction2;
            *p -= c.learning_rate * m_hat / (v_hat.sqrt() + c.epsilon);
        });
    Ok(())
}

fn missing_layer(layer: usize) -> PolicyError {
    PolicyError::invalid_parameter("layer".to_string(), format!("no optimizer state for layer {}", layer))
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f64>, gradients: &Array2<f64>) -> Result<()> {
        let c = self.coefficients()?;
        let m = self.m_weights.get_mut(layer).ok_or_else(|| missing_layer(layer))?;
        let v = self.v_weights.get_mut(layer).ok_or_else(|| missing_layer(layer))?;
        apply_update(c, weights, gradients, m, v)
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f64>, gradients: &Array1<f64>) -> Result<()> {
        let c = self.coefficients()?;
        let m = self.m_biases.get_mut(layer).ok_or_else(|| missing_layer(layer))?;
        let v = self.v_biases.get_mut(layer).ok_or_else(|| missing_layer(layer))?;
        apply_update(c, biases, gradients, m, v)
    }
}

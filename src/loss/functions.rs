use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64;

    /// Compute the gradient of the loss with respect to the predictions
    fn gradient_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Array2<f64>;
}

/// Mean squared error averaged over every element of the batch.
///
/// Entries where prediction and target agree contribute neither loss nor gradient,
/// which is what lets a Q-learning target touch only the taken action.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Loss for MeanSquaredError {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        let diff = &predictions - &targets;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    fn gradient_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Array2<f64> {
        let n = predictions.len().max(1) as f64;
        (&predictions - &targets) * (2.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_only_counts_differing_entries() {
        let predictions = array![[1.0, 2.0], [3.0, 4.0]];
        let targets = array![[1.0, 4.0], [3.0, 4.0]];

        let loss = MeanSquaredError.compute_batch(predictions.view(), targets.view());
        assert!((loss - 1.0).abs() < 1e-12);

        let grad = MeanSquaredError.gradient_batch(predictions.view(), targets.view());
        assert_eq!(grad, array![[0.0, -1.0], [0.0, 0.0]]);
    }
}

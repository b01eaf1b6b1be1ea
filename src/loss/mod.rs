//! Loss functions used by the value network's training step.

pub mod functions;

pub use functions::{Loss, MeanSquaredError};

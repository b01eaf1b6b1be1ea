//! # Activation Functions
//!
//! The value network only needs two activations:
//!
//! - **ReLU**: `max(0, x)` on every hidden layer
//! - **Linear**: identity on the output layer, so action values are unbounded
//!
//! Both work on whole minibatches (`Array2<f64>`, one row per example).

pub mod functions;

pub use functions::Activation;

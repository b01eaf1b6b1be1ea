//! # Policy Iteration - Deep Q-Learning Agent
//!
//! A single reinforcement-learning agent that learns to act in an environment
//! with a discrete action space. It pairs a feed-forward value network with an
//! experience replay buffer and an epsilon-greedy exploration schedule, and
//! trains by regressing the network onto bootstrapped one-step targets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use policy_iteration::agent::PolicyIterationAgent;
//! use policy_iteration::config::Hyperparams;
//!
//! let hparams = Hyperparams::from_json_file("hparams.json").unwrap();
//! let mut agent = PolicyIterationAgent::from_hyperparams(hparams).unwrap();
//!
//! // for each environment step:
//! //     let action = agent.get_action(state.view(), &mut env)?;
//! //     agent.remember(state, action, reward, next_state, done)?;
//! // and periodically:
//! //     let loss = agent.replay(64)?;
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - ReLU and linear activations
//! - [`agent`] - The agent and its builder
//! - [`config`] - Hyperparameters and their JSON form
//! - [`environment`] - Environment and action-space contracts
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon decay schedule
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Mean squared error
//! - [`network`] - The value network trait and its dense implementation
//! - [`optimizer`] - Adam
//! - [`replay_buffer`] - Bounded transition memory

pub mod activations;
pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod exploration;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;

#[cfg(test)]
mod tests;

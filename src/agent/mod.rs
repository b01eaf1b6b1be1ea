//! # Policy Iteration Agent
//!
//! A Deep Q-Network style agent built from three parts:
//!
//! - **Value network**: predicts one value per action for a state
//! - **Replay buffer**: the most recent transitions, sampled uniformly for training
//! - **Exploration schedule**: epsilon-greedy, decayed after every replay step
//!
//! A driver calls [`PolicyIterationAgent::get_action`], feeds the resulting
//! transition back with [`PolicyIterationAgent::remember`], and every so often
//! calls [`PolicyIterationAgent::replay`] to fit the network on a minibatch of
//! bootstrapped targets.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use policy_iteration::agent::PolicyIterationAgentBuilder;
//! use policy_iteration::config::Hyperparams;
//!
//! let hparams = Hyperparams {
//!     rand_seed: 42,
//!     hidden_size: 64,
//!     input_size: 4,
//!     num_actions: 2,
//!     adam_eps: 1e-7,
//!     learning_rate: 1e-3,
//!     gamma: 0.99,
//!     epsilon: 1.0,
//! };
//!
//! let mut agent = PolicyIterationAgentBuilder::new()
//!     .hyperparams(hparams)
//!     .epsilon_decay(0.995)
//!     .build()
//!     .unwrap();
//!
//! // ... get_action / remember against an environment ...
//! let loss = agent.replay(32);
//! ```

mod policy_iteration;

pub use policy_iteration::{PolicyIterationAgent, PolicyIterationAgentBuilder};

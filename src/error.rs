use thiserror::Error;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors raised by the agent, its network and its configuration
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Array shapes do not line up with the configured network
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// A hyperparameter or argument is outside its valid range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Nothing to sample or train on
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// Action index outside the discrete action space
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// NaN or otherwise unusable numeric values
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Malformed configuration document
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for PolicyError {
    fn from(err: bincode::Error) -> Self {
        PolicyError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::Config(err.to_string())
    }
}

// Helper functions for common error patterns
impl PolicyError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        PolicyError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        PolicyError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

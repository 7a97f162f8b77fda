//! Error types for the core.

use thiserror::Error;

/// Precondition failures of [`crate::selector::weighted_random`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    #[error("no candidates to select from")]
    Empty,
    #[error("{items} items but {weights} weights")]
    LengthMismatch { items: usize, weights: usize },
    #[error("weight at index {index} is invalid: {weight}")]
    InvalidWeight { index: usize, weight: f64 },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewport must have positive finite size, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f64),
}

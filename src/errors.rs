//! Errors
//!
//! Custom error types used throughout the `boostloss` crate.
use thiserror::Error;

/// Errors that can occur when computing objective gradients.
#[derive(Debug, Error)]
pub enum ObjectiveError {
    /// The objective was queried before being bound to a dataset.
    #[error("Objective is not bound to a dataset, `init` must be called first.")]
    NotInitialized,
    /// First value is the name of the buffer, second is the expected length, third is the actual length.
    #[error("Expected {1} values for {0}, but {2} were provided.")]
    LengthMismatch(String, usize, usize),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
}

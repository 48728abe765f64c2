//! Errors in the cube environment.
use thiserror::Error;

/// Errors raised by [`EpisodeController`](crate::EpisodeController) and its configuration.
///
/// Every error is returned before any episode state is written, so a failed call
/// leaves the controller exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeGymError {
    /// Action id outside `[0, 4]`.
    #[error("Invalid action id: {0}, expected a value in [0, 4]")]
    InvalidAction(i64),

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// State id outside `[1, size^3]`.
    #[error("Invalid state id: {0}")]
    InvalidStateId(u64),
}

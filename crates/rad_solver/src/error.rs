//! Solver errors.

use thiserror::Error;

use crate::radiosity::SolverState;

/// Errors that can occur while driving a radiosity solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver transition from {from:?} to {to:?}")]
    InvalidTransition { from: SolverState, to: SolverState },

    #[error("Form factor matrix for {patches} patches needs {bytes} bytes, limit is {limit}")]
    MatrixTooLarge { patches: usize, bytes: u64, limit: u64 },

    #[error("Form factor matrix covers {actual} patches, scene has {expected}")]
    PatchCountMismatch { expected: usize, actual: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;

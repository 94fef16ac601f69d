use thiserror::Error;

/// Errors surfaced by gain synthesis, the plant interface and the exporters.
#[derive(Debug, Error)]
pub enum QuadrotorError {
    #[error("Riccati iteration did not converge after {iterations} iterations (residual {residual:e})")]
    Convergence { iterations: usize, residual: f64 },
    #[error("R + B'PB is singular at Riccati iteration {iteration}")]
    SingularMatrix { iteration: usize },
    #[error("Invalid {what} dimension: expected {expected}, got {got}")]
    Dimension {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuadrotorError>;

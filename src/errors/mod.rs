use anyhow::Context as _;
use thiserror::Error;

/// Failures surfaced by `compute_pairings`. No partial pairing accompanies any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairingError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Solver failure: {message}")]
    SolverFailure { message: String },
}

impl PairingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PairingError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        PairingError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn solver_failure(message: impl Into<String>) -> Self {
        PairingError::SolverFailure {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PairingError>;

/// Add context to read/write errors
pub fn io_context(operation: &str, path: &std::path::Path) -> String {
    format!("Failed to {} {}", operation, path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Wrap result with read/write context
pub fn with_io_context<T, E>(
    result: std::result::Result<T, E>,
    operation: &str,
    path: &std::path::Path,
) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.with_context(|| io_context(operation, path))
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(
    result: std::result::Result<T, E>,
    data_type: &str,
) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}

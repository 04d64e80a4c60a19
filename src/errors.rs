/// Domain-specific error types for the calculator service.
/// The engine itself is total and never returns these; they only arise
/// at the config and HTTP boundary:
/// - Startup aborts on config or bind failures
/// - Request-level problems are reported back to the caller as JSON
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("network error: {0}")]
    Network(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

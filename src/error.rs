use thiserror::Error;

/// Main error type for Afina
#[derive(Error, Debug)]
pub enum AfinaError {
    /// Client-fault input errors, reported before any persistence or engine call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failures raised while persisting uploads or committing staged files
    #[error("Failed to process files: {0}")]
    Processing(String),

    /// Opaque failures from the RAG engine collaborator
    #[error("Engine error: {0}")]
    Engine(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient Result type using AfinaError
pub type Result<T> = std::result::Result<T, AfinaError>;

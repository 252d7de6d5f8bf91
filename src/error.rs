//! Error types.
//!
//! - `EngineError`: validation failures raised by the radiobiology engine.
//! - `AppError`: what the binary reports (message + process exit code).

/// Validation failures of the calculation engine.
///
/// Every variant means the caller supplied malformed input; none of them are
/// transient, so nothing is retried. `InvalidConfig` covers the engine
/// constants and dose axis rather than a request field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid fractionation scheme: {0}")]
    InvalidScheme(String),

    #[error("invalid response model: {0}")]
    InvalidModel(String),

    #[error("invalid risk threshold: {0}")]
    InvalidRisk(String),

    #[error("invalid treatment gap: {0}")]
    InvalidGap(String),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Stable machine-readable kind, used in JSON error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidScheme(_) => "InvalidScheme",
            EngineError::InvalidModel(_) => "InvalidModel",
            EngineError::InvalidRisk(_) => "InvalidRisk",
            EngineError::InvalidGap(_) => "InvalidGap",
            EngineError::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

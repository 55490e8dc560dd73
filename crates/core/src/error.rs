use http::StatusCode;
use thiserror::Error;
use toolgate_tools::ValidationError;

/// Normalized outcome of a failed invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid tool: {0}")]
    InvalidTool(String),

    #[error("{0}")]
    InvalidInput(ValidationError),

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Tool execution timed out")]
    Timeout,

    /// Detail is logged where the failure is classified, never carried here.
    #[error("Tool execution failed")]
    InternalFailure,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTool(_)
            | Self::InvalidInput(_)
            | Self::ExecutionFailed(_)
            | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTool(_) => "INVALID_TOOL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ExecutionFailed(_) => "EXECUTION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Timeout => "TIMEOUT",
            Self::InternalFailure => "INTERNAL_FAILURE",
        }
    }

    /// Field-level diagnostics for rejected input.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }
}

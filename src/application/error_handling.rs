// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-facing responses
// - Provides consistent error format for the front end
// - Validation and submission messages are shown verbatim
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::{AppError, SubmissionErrorKind};

/// Standard error response for the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The user's selection cannot be used
    Validation,

    /// Operation not allowed in the current phase
    DomainError,

    /// The compression service declined the batch
    ServerRejected,

    /// No usable answer from the compression service
    ExternalService,

    /// Local file system error
    FileSystem,

    /// Bad configuration
    Configuration,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::Validation(validation) => Self::validation(validation.to_string()),

            AppError::Domain(domain_error) => Self {
                success: false,
                error_type: ErrorType::DomainError,
                message: "Action not available right now".to_string(),
                details: Some(domain_error.to_string()),
            },

            AppError::Submission(submission) => Self {
                success: false,
                error_type: match submission.kind {
                    SubmissionErrorKind::ServerRejected => ErrorType::ServerRejected,
                    SubmissionErrorKind::Transport => ErrorType::ExternalService,
                },
                message: submission.message,
                details: None,
            },

            AppError::Network(message) => {
                log::error!("Network error: {}", message);

                Self {
                    success: false,
                    error_type: ErrorType::ExternalService,
                    message: "Could not reach the compression service".to_string(),
                    details: Some(message),
                }
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message: "Data serialization failed".to_string(),
                    details: None,
                }
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);

                Self {
                    success: false,
                    error_type: ErrorType::FileSystem,
                    message: "File system operation failed".to_string(),
                    details: Some(io_error.to_string()),
                }
            }

            AppError::Config(message) => Self {
                success: false,
                error_type: ErrorType::Configuration,
                message: "Invalid configuration".to_string(),
                details: Some(message),
            },

            AppError::Other(message) => {
                log::error!("Other error: {}", message);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message,
                    details: None,
                }
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self {
            success: false,
            error_type: ErrorType::Validation,
            message,
            details: None,
        }
    }

    /// Text for an error area: the message, plus details when present
    pub fn display_text(&self) -> String {
        match &self.details {
            Some(details) => format!("{}: {}", self.message, details),
            None => self.message.clone(),
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

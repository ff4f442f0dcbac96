// src/error.rs

use crate::{client::BoxError, core::projection::ProjectionError, models::ParameterType};
use thiserror::Error;

/// Every way an invocation can fail. Binding, context and prompt errors are raised
/// before any request exists; the rest come from the backend call.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Parameter '{name}' is not recognized by '{command}'.")]
    UnknownParameter { command: &'static str, name: String },

    #[error("Cannot convert '{value}' to {expected} for parameter '{parameter}': {reason}")]
    TypeMismatch {
        parameter: &'static str,
        expected: ParameterType,
        value: String,
        reason: String,
    },

    #[error("Parameter '{0}' was supplied more than once.")]
    DuplicateParameter(&'static str),

    #[error("Missing value for required parameter '{parameter}' of '{command}'.")]
    MissingRequiredParameter {
        command: &'static str,
        parameter: &'static str,
    },

    #[error("Invalid select expression: {0}")]
    InvalidProjection(#[from] ProjectionError),

    #[error("Could not read confirmation from the terminal: {0}")]
    Prompt(String),

    #[error("{source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    #[error("{message}")]
    NameResolution {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Operation was cancelled by the user.")]
    Cancelled,

    #[error("{operation} failed: [{code}] {message}")]
    Backend {
        operation: &'static str,
        code: String,
        message: String,
    },
}

impl CommandError {
    /// Whether the error was raised before any backend request was built.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::TypeMismatch { .. }
                | Self::DuplicateParameter(_)
                | Self::MissingRequiredParameter { .. }
                | Self::InvalidProjection(_)
                | Self::Prompt(_)
        )
    }
}

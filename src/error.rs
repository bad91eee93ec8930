use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving the configuration.
///
/// Variants map one-to-one onto the error kinds a caller can act on. The
/// `reason` strings are user-facing and name the offending option by the form
/// the user wrote it in (e.g. `pg7-path`, not the internal id).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{reason}")]
    CommandInvalid { reason: String },

    #[error("no command found")]
    CommandRequired,

    #[error("command does not allow parameters")]
    ParamInvalid,

    #[error("{reason}")]
    OptionInvalid { reason: String },

    #[error("{reason}")]
    OptionInvalidValue { reason: String },

    #[error("{command} command requires option: {option}{hint}")]
    OptionRequired {
        command: String,
        option: String,
        hint: String,
    },

    #[error("unable to open missing file '{path}' for read")]
    FileMissing { path: String },

    #[error("unable to list missing path '{path}'")]
    PathMissing { path: String },

    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{reason}")]
    Format { reason: String },
}

impl ConfigError {
    pub(crate) fn option_invalid(reason: impl Into<String>) -> Self {
        ConfigError::OptionInvalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn option_invalid_value(reason: impl Into<String>) -> Self {
        ConfigError::OptionInvalidValue {
            reason: reason.into(),
        }
    }

    pub(crate) fn command_invalid(reason: impl Into<String>) -> Self {
        ConfigError::CommandInvalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn format(reason: impl Into<String>) -> Self {
        ConfigError::Format {
            reason: reason.into(),
        }
    }
}

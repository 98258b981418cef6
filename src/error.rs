//! Resolution and rendering errors.
//!
//! Both kinds are terminal for the current render: no partial artifact is
//! ever returned alongside them.

use thiserror::Error;

/// Malformed signature or argument combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A directory flag reached the batch renderer without a `direction`.
    #[error("Missing direction for '{flag}' flag")]
    MissingDirection { flag: String },

    /// Host-to-container input staging is not implemented.
    #[error("Host path flag '{flag}' has direction 'in', which is not supported; publish inputs to a location reachable from the container")]
    UnsupportedInputDirection { flag: String },

    /// A blank positional argument is followed by a non-blank one.
    #[error("Empty positional argument is followed by non-empty argument '{name}'")]
    NonContiguousPositional { name: String },
}

/// Errors returned by render backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The backend deliberately lacks this capability.
    #[error("{backend}: {operation} not supported")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

impl RenderError {
    /// Short machine-readable kind, used in log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            RenderError::Configuration(ConfigurationError::MissingDirection { .. }) => {
                "missing_direction"
            }
            RenderError::Configuration(ConfigurationError::UnsupportedInputDirection { .. }) => {
                "unsupported_input_direction"
            }
            RenderError::Configuration(ConfigurationError::NonContiguousPositional { .. }) => {
                "non_contiguous_positional"
            }
            RenderError::Unsupported { .. } => "unsupported_operation",
        }
    }
}

//! Error types for the conditioning block

use sigconv_convert_core::ConvertError;
use thiserror::Error;

/// Result type alias for conditioner operations
pub type Result<T> = std::result::Result<T, ConditionerError>;

/// Errors raised while configuring or running the conditioner
#[derive(Error, Debug)]
pub enum ConditionerError {
    /// Configuration values are out of range
    #[error("Invalid conditioner configuration: {details}")]
    InvalidConfig {
        /// What is wrong
        details: String,
    },

    /// Item type is known but has no conversion path here
    #[error("Unsupported item type: {item_type}")]
    UnsupportedItemType {
        /// Configured item type name
        item_type: String,
    },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Dump file or configuration file I/O failed
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Logging could not be installed
    #[error("Logging setup failed: {reason}")]
    Logging {
        /// Subscriber error text
        reason: String,
    },

    /// Conversion layer error
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl ConditionerError {
    /// Create a new invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Whether the error comes from configuration rather than from running
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::UnsupportedItemType { .. } | Self::Parse(_)
        )
    }
}

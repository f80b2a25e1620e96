//! Error handling for the conversion library
//!
//! The kernels themselves never fail. Errors only come from the layers
//! around them: building alignment-tagged views, sizing buffers and
//! selecting an implementation.

use std::fmt;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error type for conversion support operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Buffer start address does not satisfy the vector alignment boundary
    #[error("Misaligned buffer: address {address:#x} is not a multiple of {required} bytes")]
    Misaligned {
        /// Start address of the offending buffer
        address: usize,
        /// Required alignment in bytes
        required: usize,
    },

    /// Buffer holds fewer complex samples than the requested count
    #[error("Buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall {
        /// Samples required by the call
        needed: usize,
        /// Samples available in the buffer
        actual: usize,
    },

    /// No registered kernel carries this name
    #[error("Unsupported kernel: {name}")]
    UnsupportedKernel {
        /// Requested kernel name
        name: String,
    },

    /// Kernel exists but the host CPU lacks the capability it needs
    #[error("Capability not available on this host: {capability}")]
    UnsupportedCapability {
        /// Name of the missing capability
        capability: String,
    },
}

impl ConvertError {
    /// Create a new misaligned buffer error for `ptr`
    pub fn misaligned<T>(ptr: *const T, required: usize) -> Self {
        Self::Misaligned {
            address: ptr as usize,
            required,
        }
    }

    /// Create a new unsupported kernel error
    pub fn unsupported_kernel(name: impl Into<String>) -> Self {
        Self::UnsupportedKernel { name: name.into() }
    }

    /// Create a new unsupported capability error
    pub fn unsupported_capability(capability: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            capability: capability.into(),
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Misaligned { .. } | Self::BufferTooSmall { .. } => ErrorCategory::Memory,
            Self::UnsupportedKernel { .. } | Self::UnsupportedCapability { .. } => {
                ErrorCategory::Selection
            }
        }
    }
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Buffer layout errors (alignment, size)
    Memory,
    /// Implementation selection errors
    Selection,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "Memory"),
            Self::Selection => write!(f, "Selection"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ConvertError::misaligned(0x1003 as *const u8, 16).category(),
            ErrorCategory::Memory
        );
        assert_eq!(
            ConvertError::BufferTooSmall { needed: 8, actual: 4 }.category(),
            ErrorCategory::Memory
        );
        assert_eq!(
            ConvertError::unsupported_kernel("avx512").category(),
            ErrorCategory::Selection
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConvertError::misaligned(0x1004 as *const u8, 16);
        let display = format!("{}", err);
        assert!(display.contains("0x1004"));
        assert!(display.contains("16 bytes"));

        let err = ConvertError::BufferTooSmall { needed: 10, actual: 3 };
        assert_eq!(format!("{}", err), "Buffer too small: need 10 samples, got 3");
    }
}

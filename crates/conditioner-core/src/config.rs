//! Conditioner configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! role = "SignalConditioner"
//! internal_fs_sps = 2048000.0
//! sample_freq_in = 4000000.0
//! sample_freq_out = 2048000.0   # defaults to internal_fs_sps
//! item_type = "gr_complex"
//! dump = false
//! dump_filename = "./data/signal_conditioner.dat"
//! log_level = "info"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{ConditionerError, Result};
use crate::logging::{parse_log_level, LoggingConfig};

/// Default receiver-internal sample rate in samples per second
pub const DEFAULT_INTERNAL_FS_SPS: f64 = 2_048_000.0;

/// Default front-end sample rate in samples per second
pub const DEFAULT_SAMPLE_FREQ_IN: f64 = 4_000_000.0;

/// Default item type name
pub const DEFAULT_ITEM_TYPE: &str = "gr_complex";

/// Default dump file location
pub const DEFAULT_DUMP_FILENAME: &str = "./data/signal_conditioner.dat";

/// Default log level name
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration of one conditioning block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// Block role, used as a log prefix
    pub role: String,
    /// Receiver-internal sample rate
    #[serde(alias = "internal_fs_hz")]
    pub internal_fs_sps: f64,
    /// Sample rate entering the block
    pub sample_freq_in: f64,
    /// Sample rate leaving the block, `internal_fs_sps` when unset
    pub sample_freq_out: Option<f64>,
    /// Input item type name
    pub item_type: String,
    /// Write every converted buffer to `dump_filename`
    pub dump: bool,
    /// Raw dump destination
    pub dump_filename: PathBuf,
    /// Log level for [`setup_logging`](crate::logging::setup_logging)
    pub log_level: String,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            role: "SignalConditioner".to_string(),
            internal_fs_sps: DEFAULT_INTERNAL_FS_SPS,
            sample_freq_in: DEFAULT_SAMPLE_FREQ_IN,
            sample_freq_out: None,
            item_type: DEFAULT_ITEM_TYPE.to_string(),
            dump: false,
            dump_filename: PathBuf::from(DEFAULT_DUMP_FILENAME),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ConditionerConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConditionerError::Parse`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Effective output sample rate
    pub fn sample_freq_out(&self) -> f64 {
        self.sample_freq_out.unwrap_or(self.internal_fs_sps)
    }

    /// Logging setup for an application hosting this block
    ///
    /// Uses `log_level` as the level and `role` as the application name.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionerError::InvalidConfig`] if `log_level` is not a
    /// level name.
    pub fn logging_config(&self) -> Result<LoggingConfig> {
        Ok(LoggingConfig::new(parse_log_level(&self.log_level)?, self.role.clone()))
    }

    /// Check value ranges and warn about inconsistent rates
    ///
    /// # Errors
    ///
    /// Returns [`ConditionerError::InvalidConfig`] if a sample rate is not a
    /// positive finite number, dumping is enabled without a filename, or
    /// `log_level` is unknown.
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;

        let rates = [
            ("internal_fs_sps", self.internal_fs_sps),
            ("sample_freq_in", self.sample_freq_in),
            ("sample_freq_out", self.sample_freq_out()),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConditionerError::invalid_config(format!(
                    "{}.{} must be a positive sample rate, got {}",
                    self.role, name, rate
                )));
            }
        }

        if self.dump && self.dump_filename.as_os_str().is_empty() {
            return Err(ConditionerError::invalid_config(format!(
                "{}.dump is set but {}.dump_filename is empty",
                self.role, self.role
            )));
        }

        if (self.internal_fs_sps - self.sample_freq_out()).abs() > f64::EPSILON {
            warn!(
                "CONFIGURATION WARNING: Parameters internal_fs_sps and {}.sample_freq_out are not set to the same value!",
                self.role
            );
        }

        Ok(())
    }
}

/// Sample item type carried on the block's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// Interleaved `f32` I/Q pairs
    ComplexFloat,
}

impl ItemType {
    /// Item types that exist in receiver configurations but have no
    /// float-to-int8 conversion path
    pub const UNSUPPORTED: &'static [&'static str] = &["cshort", "cbyte", "ishort", "ibyte"];

    /// Resolve a configured item type name
    ///
    /// Unknown names log a warning and fall back to complex float. Names in
    /// [`ItemType::UNSUPPORTED`] are rejected outright rather than falling
    /// back, since feeding integer items to a float kernel would silently
    /// reinterpret the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionerError::UnsupportedItemType`] for names in
    /// [`ItemType::UNSUPPORTED`].
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "gr_complex" => Ok(Self::ComplexFloat),
            other if Self::UNSUPPORTED.contains(&other) => {
                Err(ConditionerError::UnsupportedItemType {
                    item_type: other.to_string(),
                })
            }
            other => {
                warn!("{} unrecognized item type for conditioner, using gr_complex", other);
                Ok(Self::ComplexFloat)
            }
        }
    }

    /// Size of one input item in bytes
    pub fn item_size(&self) -> usize {
        match self {
            Self::ComplexFloat => std::mem::size_of::<sigconv_convert_core::Complex32>(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComplexFloat => write!(f, "gr_complex"),
        }
    }
}

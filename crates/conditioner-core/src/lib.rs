//! # Conditioner-Core: Float to Int8 Signal Conditioning Stage
//!
//! The block that owns the conversion kernels in a streaming receiver. It
//! reads its settings from TOML, picks the fastest kernel the host supports,
//! converts each tick's buffer of `Complex<f32>` samples into `Complex<i8>`
//! and optionally captures the converted stream to a raw dump file.
//!
//! ## Usage
//!
//! ```rust
//! use sigconv_conditioner_core::{ConditionerConfig, ConversionConditioner};
//! use sigconv_convert_core::{Complex32, ComplexI8};
//!
//! let config = ConditionerConfig::from_toml_str(r#"
//!     sample_freq_in = 4000000.0
//!     item_type = "gr_complex"
//! "#)?;
//! let mut block = ConversionConditioner::new(config)?;
//! block.connect()?;
//!
//! let out = block.work(&[Complex32::new(130.4, -200.0), Complex32::new(5.5, 127.6)])?;
//! assert_eq!(out, &[ComplexI8::new(127, -128), ComplexI8::new(6, 127)]);
//!
//! block.disconnect()?;
//! # Ok::<(), sigconv_conditioner_core::ConditionerError>(())
//! ```

#![deny(missing_docs)]

pub mod conditioner;
pub mod config;
pub mod error;
pub mod logging;

pub use conditioner::ConversionConditioner;
pub use config::{ConditionerConfig, ItemType};
pub use error::{ConditionerError, Result};
pub use logging::{setup_logging, LoggingConfig};

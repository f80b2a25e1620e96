//! Conversion conditioning block
//!
//! Owns the output buffer, chooses a kernel once at construction and runs it
//! once per scheduling tick. When dumping is enabled, each converted buffer is
//! appended to a raw file as interleaved signed bytes (I, Q, I, Q, ...), one
//! `Complex<i8>` item at a time.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sigconv_convert_core::types::int8_scalars;
use sigconv_convert_core::{AlignedVec, Complex32, ComplexI8, KernelRegistry};
use tracing::{debug, info, trace};

use crate::config::{ConditionerConfig, ItemType};
use crate::error::Result;

/// Raw file sink for converted samples
#[derive(Debug)]
struct DumpSink {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl DumpSink {
    fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            bytes_written: 0,
        })
    }

    fn write(&mut self, samples: &[ComplexI8]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(int8_scalars(samples));
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn close(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.bytes_written)
    }
}

/// Signal-conditioning stage that narrows complex float to complex int8
#[derive(Debug)]
pub struct ConversionConditioner {
    config: ConditionerConfig,
    item_type: ItemType,
    registry: KernelRegistry,
    output: AlignedVec<ComplexI8>,
    dump: Option<DumpSink>,
    samples_processed: u64,
}

impl ConversionConditioner {
    /// Create a conditioner using the detected CPU capabilities
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation or names an
    /// unsupported item type.
    pub fn new(config: ConditionerConfig) -> Result<Self> {
        Self::with_registry(config, KernelRegistry::detect())
    }

    /// Create a conditioner with an explicit kernel registry
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_registry(config: ConditionerConfig, registry: KernelRegistry) -> Result<Self> {
        config.validate()?;
        let item_type = ItemType::parse(&config.item_type)?;

        debug!("{}: sample_freq_in {}", config.role, config.sample_freq_in);
        debug!("{}: sample_freq_out {}", config.role, config.sample_freq_out());
        debug!("{}: item size {}", config.role, item_type.item_size());
        debug!(
            "{}: kernels unaligned={} aligned={}",
            config.role,
            registry.selected_unaligned().name,
            registry.selected_aligned().map_or("none", |k| k.name)
        );
        debug!("{}: dump is {}", config.role, config.dump);

        Ok(Self {
            config,
            item_type,
            registry,
            output: AlignedVec::zeroed(0),
            dump: None,
            samples_processed: 0,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ConditionerConfig {
        &self.config
    }

    /// Resolved input item type
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Kernel registry used for every tick
    pub fn registry(&self) -> &KernelRegistry {
        &self.registry
    }

    /// Ratio of input to output sample rate
    pub fn resample_ratio(&self) -> f64 {
        self.config.sample_freq_in / self.config.sample_freq_out()
    }

    /// Total samples converted since construction
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Whether the dump sink is open
    pub fn is_connected(&self) -> bool {
        self.dump.is_some()
    }

    /// Wire the stage up, opening the dump file if dumping is enabled
    ///
    /// Calling it again while connected does nothing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the dump file or its directory cannot be created.
    pub fn connect(&mut self) -> Result<()> {
        if !self.config.dump {
            debug!("{}: nothing to connect internally", self.config.role);
            return Ok(());
        }
        if self.dump.is_none() {
            info!(
                "{}: dumping output into file {}",
                self.config.role,
                self.config.dump_filename.display()
            );
            self.dump = Some(DumpSink::create(&self.config.dump_filename)?);
        }
        Ok(())
    }

    /// Flush and close the dump file, if open
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the final flush fails.
    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(sink) = self.dump.take() {
            let path = sink.path.clone();
            let bytes = sink.close()?;
            debug!("{}: closed dump {} after {} bytes", self.config.role, path.display(), bytes);
        }
        Ok(())
    }

    /// Convert one tick's worth of samples
    ///
    /// The returned slice borrows the block's own output buffer and stays
    /// valid until the next call. The buffer only reallocates when a tick is
    /// larger than any before it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing to the dump sink fails. The conversion
    /// itself never fails.
    pub fn work(&mut self, input: &[Complex32]) -> Result<&[ComplexI8]> {
        let count = input.len();
        self.output.resize(count);
        self.registry.try_convert(&mut self.output, input, count)?;
        self.samples_processed += count as u64;
        trace!("{}: converted {} samples", self.config.role, count);

        if let Some(sink) = self.dump.as_mut() {
            sink.write(&self.output)?;
        }
        Ok(self.output.as_slice())
    }
}

impl Drop for ConversionConditioner {
    fn drop(&mut self) {
        if let Some(sink) = self.dump.as_mut() {
            let _ = sink.writer.flush();
        }
    }
}

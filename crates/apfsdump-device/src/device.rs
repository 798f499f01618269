//! Read-only source device access
//!
//! A device is an addressable byte range: either a disk-image file or a raw
//! block device. It is opened once at startup, never written, and closed at
//! process exit.

use crate::mmap::MmapStream;
use apfsdump_core::{ReadSeek, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Configuration for opening a device
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Use memory mapping for regular image files
    pub use_mmap: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { use_mmap: true }
    }
}

/// An opened read-only source device
pub struct Device {
    stream: Box<dyn ReadSeek>,
    size: u64,
}

impl Device {
    /// Open a device or disk-image file
    ///
    /// Regular files are memory-mapped when the config allows it; block
    /// devices always use plain file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be opened or its size cannot be
    /// determined.
    pub fn open(path: &Path, config: DeviceConfig) -> Result<Self> {
        let mut file = File::open(path)?;
        let metadata = file.metadata()?;

        let size = if metadata.is_file() {
            metadata.len()
        } else {
            // Block devices report a zero metadata length; seek to the end
            // to learn the addressable size.
            let size = file.seek(SeekFrom::End(0))?;
            file.seek(SeekFrom::Start(0))?;
            size
        };

        let stream: Box<dyn ReadSeek> = if config.use_mmap && metadata.is_file() && size > 0 {
            debug!(path = %path.display(), "memory-mapping image file");
            Box::new(MmapStream::from_file(&file)?)
        } else {
            debug!(path = %path.display(), "using plain file I/O");
            Box::new(file)
        };

        Ok(Self { stream, size })
    }

    /// Create a device from any readable and seekable stream
    pub fn from_stream<R: Read + Seek + Send + 'static>(stream: R, size: u64) -> Self {
        Self {
            stream: Box::new(stream),
            size,
        }
    }

    /// Total addressable size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the underlying stream
    pub fn content(&mut self) -> &mut dyn ReadSeek {
        &mut *self.stream
    }

    /// Consume the device, returning the underlying stream
    pub fn into_content(self) -> Box<dyn ReadSeek> {
        self.stream
    }
}

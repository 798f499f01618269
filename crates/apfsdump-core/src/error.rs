//! Extraction error types

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for apfsdump operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the host filesystem or the source device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device cannot be used as an extraction source (e.g. zero size)
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    /// Partition table structure is corrupted or inconsistent
    #[error("Invalid partition table: {0}")]
    InvalidPartitionTable(String),

    /// A partition table was found but no entry carries the APFS type GUID
    #[error("No APFS partition found: {0}")]
    NoApfsPartition(String),

    /// The APFS container could not be initialized
    #[error("Container initialization failed: {0}")]
    ContainerInit(String),

    /// Unsupported format, feature, or encryption state
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Object or volume not found in the source
    #[error("Not found: {0}")]
    NotFound(String),

    /// Output path already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// An expected extended attribute is absent from an inode
    #[error("Missing attribute {name} on {}", path.display())]
    AttributeMissing { name: &'static str, path: PathBuf },

    /// Transparent decompression failed
    #[error("Decompression failed: {0}")]
    Decompress(String),

    /// Writing an output object failed; carries the OS-level cause
    #[error("Write failed for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source namespace is structurally corrupt (e.g. a directory cycle)
    #[error("Corrupt structure: {0}")]
    Corrupt(String),
}

/// Result type alias for apfsdump operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid device error
    pub fn invalid_device(msg: impl Into<String>) -> Self {
        Error::InvalidDevice(msg.into())
    }

    /// Create an invalid partition table error
    pub fn invalid_partition_table(msg: impl Into<String>) -> Self {
        Error::InvalidPartitionTable(msg.into())
    }

    /// Create a no-APFS-partition error
    pub fn no_apfs_partition(msg: impl Into<String>) -> Self {
        Error::NoApfsPartition(msg.into())
    }

    /// Create a container initialization error
    pub fn container_init(msg: impl Into<String>) -> Self {
        Error::ContainerInit(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Error::AlreadyExists(msg.into())
    }

    /// Create a decompression error
    pub fn decompress(msg: impl Into<String>) -> Self {
        Error::Decompress(msg.into())
    }

    /// Create a corrupt structure error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Error::Corrupt(msg.into())
    }
}

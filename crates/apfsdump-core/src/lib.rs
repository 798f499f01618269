//! # apfsdump core
//!
//! Core traits, types, and error handling for the apfsdump extraction
//! engine.
//!
//! This crate provides the foundational abstractions shared by the rest of
//! the workspace:
//! - **Errors**: one [`Error`] enum covering the whole failure taxonomy,
//!   from startup-fatal conditions to per-object recoverable ones
//! - **Volume access contract**: [`ContainerSource`] and [`VolumeSource`],
//!   the seam behind which the external APFS object-store parser lives
//! - **Data model**: directory entries, inode metadata, and volume
//!   superblock counters
//!
//! ## Example
//!
//! ```rust,no_run
//! use apfsdump_core::{ContainerSource, Result};
//!
//! fn describe(container: &dyn ContainerSource) -> Result<()> {
//!     println!("Container: {}", container.identify());
//!     println!("Volumes:   {}", container.volume_count());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use traits::{ContainerSource, ReadSeek, VolumeSource};
pub use types::{
    DirEntry, EntryKind, InodeInfo, ObjectId, VolumeSuperblock, APFS_FS_UNENCRYPTED, ROOT_DIR_ID,
    XATTR_DECMPFS, XATTR_SYMLINK,
};

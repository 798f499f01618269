//! # apfsdump extract
//!
//! The extraction engine: walks every volume of an opened APFS container
//! and materializes its namespace as a plain directory tree.
//!
//! - [`VolumeExtractor`] drives one container end to end
//! - [`walk::TreeWalker`] recursively enumerates a volume's directories
//! - [`materialize`] turns individual objects into files, directories, and
//!   symbolic links
//! - [`progress`] renders the bounded-width progress bar
//!
//! The engine is single-threaded and synchronous: one device, one volume,
//! one output file handle at a time. It never writes to the source.
//!
//! ## Example
//!
//! ```rust,no_run
//! use apfsdump_core::ContainerSource;
//! use apfsdump_extract::{ExtractOptions, VolumeExtractor};
//!
//! fn dump(container: &mut dyn ContainerSource) -> apfsdump_core::Result<()> {
//!     let options = ExtractOptions { strict: false, progress: true };
//!     let mut extractor = VolumeExtractor::new(container, "/tmp/dump", options);
//!     let report = extractor.extract_all()?;
//!     println!("extracted {} volume(s)", report.volumes.len());
//!     Ok(())
//! }
//! ```

pub mod materialize;
pub mod options;
pub mod progress;
pub mod volume;
pub mod walk;

pub use options::ExtractOptions;
pub use volume::{ExtractReport, VolumeExtractor, VolumeReport};
pub use walk::{TreeWalker, WalkStats};

//! # apfsdump gpt
//!
//! GUID Partition Table parsing and the container locator.
//!
//! The locator answers one question: at what byte range of the source
//! device does the APFS container live? A device with no valid GPT is
//! treated as a bare container; a device with a GPT must carry at least one
//! APFS-typed partition, and the first one in table order wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use apfsdump_device::{Device, DeviceConfig};
//! use apfsdump_gpt::locate_container;
//! use std::path::Path;
//!
//! let mut device = Device::open(Path::new("disk.dmg"), DeviceConfig::default()).unwrap();
//! let span = locate_container(&mut device).unwrap();
//! println!("container at offset {} ({} bytes)", span.offset, span.length);
//! ```

pub mod locate;
pub mod table;
pub mod types;

#[cfg(any(test, feature = "testimage"))]
pub mod testimage;

pub use locate::{locate_container, ContainerSpan, SECTOR_SIZE};
pub use table::{GptTable, Partition};
pub use types::{GptHeader, GptPartitionEntry, PartitionTypeGuid};

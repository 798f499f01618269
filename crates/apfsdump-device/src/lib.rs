//! # apfsdump device
//!
//! Read-only access to the source device or disk image:
//! - [`Device`]: an opened file or block device with a known total size
//! - [`MmapStream`]: memory-mapped stream over a regular image file
//! - [`DeviceWindow`]: a bounded `Read + Seek` view of a byte range, used to
//!   present the located APFS container span as an independent stream
//!
//! ## Example
//!
//! ```rust,no_run
//! use apfsdump_device::{Device, DeviceConfig};
//! use std::path::Path;
//!
//! let device = Device::open(Path::new("disk.dmg"), DeviceConfig::default()).unwrap();
//! println!("Device size: {} bytes", device.size());
//! ```

pub mod device;
pub mod mmap;
pub mod window;

pub use device::{Device, DeviceConfig};
pub use mmap::MmapStream;
pub use window::DeviceWindow;

//! Container Locator
//!
//! Determines the byte range of the APFS container within a raw device:
//! the whole device when no valid GPT is present, or the first APFS-typed
//! partition when one is.

use crate::table::GptTable;
use apfsdump_core::{Error, Result};
use apfsdump_device::Device;
use tracing::{debug, info};

/// Sector size assumed when reading the partition table
pub const SECTOR_SIZE: u32 = 512;

/// Byte range of the located APFS container within the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSpan {
    /// Offset from the start of the device in bytes
    pub offset: u64,

    /// Length of the container in bytes
    pub length: u64,
}

/// Locate the APFS container on an opened device
///
/// # Errors
///
/// - [`Error::InvalidDevice`] if the device reports a size of zero
/// - [`Error::NoApfsPartition`] if a valid GPT is present but no entry
///   carries the APFS partition type
pub fn locate_container(device: &mut Device) -> Result<ContainerSpan> {
    let size = device.size();
    if size == 0 {
        return Err(Error::invalid_device(
            "device reports a size of 0; it is probably invalid",
        ));
    }

    info!(size_mb = size / (1024 * 1024), "found device");

    match GptTable::parse(device.content(), SECTOR_SIZE) {
        Ok(table) => {
            info!("found GPT table, looking for an APFS partition");
            match table.find_first_apfs() {
                Some(part) => {
                    debug!(%part, "selected APFS partition");
                    Ok(ContainerSpan {
                        offset: part.offset,
                        length: part.length,
                    })
                }
                None => Err(Error::no_apfs_partition(format!(
                    "GPT holds {} partition(s), none typed as APFS",
                    table.partitions().len()
                ))),
            }
        }
        Err(err) => {
            // Absent or invalid table: the whole device is the container
            debug!(%err, "no valid GPT, treating whole device as container");
            Ok(ContainerSpan {
                offset: 0,
                length: size,
            })
        }
    }
}

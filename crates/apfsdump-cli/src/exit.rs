//! Stable exit codes, so scripts can branch on failure class

use apfsdump_core::Error;

pub const SUCCESS: i32 = 0;
pub const USAGE: i32 = 1;
pub const OUTPUT_EXISTS: i32 = 2;
pub const DEVICE_OPEN: i32 = 3;
pub const ZERO_SIZE_DEVICE: i32 = 4;
pub const NO_CONTAINER: i32 = 5;
pub const UNSUPPORTED_VOLUME: i32 = 6;
pub const EXTRACTION_FAILED: i32 = 7;

/// Map an error to its exit code
///
/// `Io` surfaces here only before extraction begins (device open); write
/// failures during extraction carry their own variant.
pub fn code_for(err: &Error) -> i32 {
    match err {
        Error::AlreadyExists(_) => OUTPUT_EXISTS,
        Error::Io(_) => DEVICE_OPEN,
        Error::InvalidDevice(_) => ZERO_SIZE_DEVICE,
        Error::NoApfsPartition(_) | Error::ContainerInit(_) | Error::InvalidPartitionTable(_) => {
            NO_CONTAINER
        }
        Error::Unsupported(_) => UNSUPPORTED_VOLUME,
        _ => EXTRACTION_FAILED,
    }
}

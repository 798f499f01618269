//! Object-store backend seam
//!
//! The APFS object store itself (checksummed B-trees, object maps, extent
//! resolution) is parsed by an external volume access library implementing
//! [`ContainerSource`]. This module is the single point where a build wires
//! one in.

use apfsdump_core::{ContainerSource, Error, ReadSeek, Result};
use apfsdump_device::DeviceWindow;

/// Open the located container span through the object-store backend
pub fn open_container(
    container: DeviceWindow<Box<dyn ReadSeek>>,
) -> Result<Box<dyn ContainerSource>> {
    let _ = container;
    Err(Error::unsupported(
        "this build carries no APFS object-store backend; it can validate devices \
         and partition tables but cannot read volume contents",
    ))
}

//! The volume access contract
//!
//! The APFS object store itself (checksummed B-trees, object maps, extent
//! resolution, decmpfs decoding) is parsed by an external library. These
//! traits pin down the operations the extraction engine consumes from it,
//! so the engine can be driven by a real backend or a synthetic one.

use crate::error::Result;
use crate::types::{DirEntry, InodeInfo, ObjectId, VolumeSuperblock};
use std::io::{Read, Seek};

/// An opened APFS container and the volumes it owns
pub trait ContainerSource {
    /// Human-readable identifier for this container backend
    fn identify(&self) -> &str;

    /// Number of volumes in the container
    fn volume_count(&self) -> u32;

    /// Read the superblock of the volume at `index`
    fn volume_superblock(&self, index: u32) -> Result<VolumeSuperblock>;

    /// Open the volume at `index` for namespace access
    fn open_volume(&mut self, index: u32) -> Result<Box<dyn VolumeSource + '_>>;
}

/// Namespace and content access for one opened volume
pub trait VolumeSource {
    /// List all directory entries of a directory object, in the library's
    /// native order
    fn list_directory(&mut self, dir_id: ObjectId) -> Result<Vec<DirEntry>>;

    /// Resolve the inode for an object id
    fn inode(&mut self, object_id: ObjectId) -> Result<InodeInfo>;

    /// Read file content from the content store
    ///
    /// Reads up to `buf.len()` bytes at `offset` of the content keyed by
    /// `private_id`, returning the number of bytes read.
    fn read_file_range(
        &mut self,
        private_id: ObjectId,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize>;

    /// Fetch an extended attribute, or `None` if the inode does not carry it
    fn extended_attribute(&mut self, object_id: ObjectId, name: &str) -> Result<Option<Vec<u8>>>;

    /// Decode a transparently compressed file to its full plaintext
    ///
    /// `decmpfs` is the raw `com.apple.decmpfs` attribute describing the
    /// compression scheme.
    fn decompress_file(&mut self, object_id: ObjectId, decmpfs: &[u8]) -> Result<Vec<u8>>;
}

impl<V: VolumeSource + ?Sized> VolumeSource for &mut V {
    fn list_directory(&mut self, dir_id: ObjectId) -> Result<Vec<DirEntry>> {
        (**self).list_directory(dir_id)
    }

    fn inode(&mut self, object_id: ObjectId) -> Result<InodeInfo> {
        (**self).inode(object_id)
    }

    fn read_file_range(
        &mut self,
        private_id: ObjectId,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize> {
        (**self).read_file_range(private_id, offset, buf)
    }

    fn extended_attribute(&mut self, object_id: ObjectId, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).extended_attribute(object_id, name)
    }

    fn decompress_file(&mut self, object_id: ObjectId, decmpfs: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress_file(object_id, decmpfs)
    }
}

/// Combined trait for Read + Seek
pub trait ReadSeek: Read + Seek + Send {}

/// Blanket implementation for any type that implements Read + Seek
impl<T: Read + Seek + Send> ReadSeek for T {}

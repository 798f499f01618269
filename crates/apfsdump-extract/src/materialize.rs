//! Object materializers
//!
//! Turn one source object into a native filesystem object. Each function
//! fails only the object it is materializing; continuation policy belongs to
//! the walker.

use apfsdump_core::{
    Error, InodeInfo, ObjectId, Result, VolumeSource, XATTR_DECMPFS, XATTR_SYMLINK,
};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

/// Fixed read size for uncompressed file content; bounds peak memory to one
/// chunk regardless of file size
pub const CHUNK_SIZE: usize = 4096;

/// Materialize a regular file at `output_path`
pub fn regular_file(
    volume: &mut dyn VolumeSource,
    object_id: ObjectId,
    output_path: &Path,
) -> Result<()> {
    let inode = volume.inode(object_id)?;

    if inode.compressed {
        return compressed_file(volume, &inode, output_path);
    }

    let mut output = File::create(output_path).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    let mut chunk = [0u8; CHUNK_SIZE];
    let mut pos = 0u64;
    while pos < inode.size {
        let want = (inode.size - pos).min(CHUNK_SIZE as u64) as usize;
        let n = volume.read_file_range(inode.private_id, pos, &mut chunk[..want])?;
        if n == 0 {
            return Err(Error::corrupt(format!(
                "content store ended at offset {} of {} for {}",
                pos,
                inode.size,
                output_path.display()
            )));
        }
        output
            .write_all(&chunk[..n])
            .map_err(|source| Error::Write {
                path: output_path.to_path_buf(),
                source,
            })?;
        pos += n as u64;
    }

    drop(output);
    restore_permissions(output_path, &inode)
}

/// Materialize a transparently compressed file
///
/// Unlike the chunked plain path, decompression materializes the whole
/// plaintext buffer at once; the decoder needs the complete stream.
fn compressed_file(
    volume: &mut dyn VolumeSource,
    inode: &InodeInfo,
    output_path: &Path,
) -> Result<()> {
    let decmpfs = volume
        .extended_attribute(inode.object_id, XATTR_DECMPFS)?
        .ok_or_else(|| Error::AttributeMissing {
            name: XATTR_DECMPFS,
            path: output_path.to_path_buf(),
        })?;

    debug!(path = %output_path.display(), "decompressing file content");
    let contents = volume.decompress_file(inode.object_id, &decmpfs)?;

    fs::write(output_path, &contents).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    restore_permissions(output_path, inode)
}

/// Materialize a symbolic link at `output_path`
///
/// The target is taken verbatim from the symlink attribute: no
/// normalization, no existence check.
pub fn symlink(
    volume: &mut dyn VolumeSource,
    object_id: ObjectId,
    output_path: &Path,
) -> Result<()> {
    let target = volume
        .extended_attribute(object_id, XATTR_SYMLINK)?
        .ok_or_else(|| Error::AttributeMissing {
            name: XATTR_SYMLINK,
            path: output_path.to_path_buf(),
        })?;

    // The attribute value may carry a trailing NUL; everything before it is
    // the target, byte for byte, UTF-8 or not
    let end = target.iter().position(|&b| b == 0).unwrap_or(target.len());
    let target = OsStr::from_bytes(&target[..end]);

    std::os::unix::fs::symlink(target, output_path).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Create a directory (and missing intermediate segments) at `output_path`
pub fn directory(output_path: &Path) -> Result<()> {
    fs::create_dir_all(output_path).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Permission-bits subset only; no special bits, no owner restoration
fn restore_permissions(path: &Path, inode: &InodeInfo) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(inode.permissions())).map_err(
        |source| Error::Write {
            path: path.to_path_buf(),
            source,
        },
    )
}

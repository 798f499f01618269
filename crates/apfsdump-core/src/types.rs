//! Shared data model for APFS extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier used to resolve an inode or directory listing
pub type ObjectId = u64;

/// The inode for `/` on all APFS filesystems
pub const ROOT_DIR_ID: ObjectId = 2;

/// Extended attribute holding the transparent-compression header
pub const XATTR_DECMPFS: &str = "com.apple.decmpfs";

/// Extended attribute holding a symbolic link's target path
pub const XATTR_SYMLINK: &str = "com.apple.fs.symlink";

/// Volume flag bit indicating the volume is not encrypted
pub const APFS_FS_UNENCRYPTED: u64 = 0x01;

/// Classification of a directory entry
///
/// The on-disk type space is fixed and small, so this is a closed variant
/// set; anything the engine does not materialize lands in `Other` with the
/// raw directory-record type code preserved for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    RegularFile,
    Symlink,
    Other(u8),
}

impl EntryKind {
    /// Classify from the directory-record type nibble (`DT_*` values)
    pub fn from_dirent_type(code: u8) -> Self {
        match code {
            4 => EntryKind::Directory,
            8 => EntryKind::RegularFile,
            10 => EntryKind::Symlink,
            other => EntryKind::Other(other),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::RegularFile => write!(f, "regular file"),
            EntryKind::Symlink => write!(f, "symlink"),
            EntryKind::Other(code) => write!(f, "other (type {})", code),
        }
    }
}

/// One entry produced by listing a directory object
///
/// Entries carry the library's native listing order; it is not guaranteed
/// to be alphabetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    /// Name of the child within its parent directory
    pub name: String,

    /// Object id the entry references
    pub object_id: ObjectId,

    /// Classification of the referenced object
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, object_id: ObjectId, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            object_id,
            kind,
        }
    }
}

/// Inode metadata resolved on demand from an object id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InodeInfo {
    /// The object id this inode was resolved from
    pub object_id: ObjectId,

    /// Identifier the content store is keyed by
    pub private_id: ObjectId,

    /// POSIX mode bits
    pub mode: u32,

    /// Logical size of the file content in bytes
    pub size: u64,

    /// True if content is stored transparently compressed
    pub compressed: bool,
}

impl InodeInfo {
    /// Permission-bits subset of the mode (no file-type bits)
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Volume metadata read from the volume superblock
///
/// The object counters are declared aggregates, not live recounts; their sum
/// is used only as a progress denominator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSuperblock {
    /// Volume name
    pub name: String,

    /// Declared number of regular files
    pub num_files: u64,

    /// Declared number of directories
    pub num_directories: u64,

    /// Declared number of symbolic links
    pub num_symlinks: u64,

    /// Declared number of other filesystem objects
    pub num_other_objects: u64,

    /// Feature and encryption flags
    pub fs_flags: u64,
}

impl VolumeSuperblock {
    /// Estimated total object count for progress display
    pub fn total_objects(&self) -> u64 {
        self.num_files + self.num_directories + self.num_symlinks + self.num_other_objects
    }

    /// True if the volume's crypto state is one this engine can handle
    ///
    /// The volume access library does not decrypt, so only volumes carrying
    /// the unencrypted flag can be extracted. FileVault volumes fail loudly.
    pub fn is_unencrypted(&self) -> bool {
        self.fs_flags & APFS_FS_UNENCRYPTED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_classification() {
        assert_eq!(EntryKind::from_dirent_type(4), EntryKind::Directory);
        assert_eq!(EntryKind::from_dirent_type(8), EntryKind::RegularFile);
        assert_eq!(EntryKind::from_dirent_type(10), EntryKind::Symlink);
        assert_eq!(EntryKind::from_dirent_type(12), EntryKind::Other(12));
    }

    #[test]
    fn test_inode_permissions_mask() {
        let inode = InodeInfo {
            object_id: 5,
            private_id: 5,
            mode: 0o100644,
            size: 0,
            compressed: false,
        };
        assert_eq!(inode.permissions(), 0o644);
    }

    #[test]
    fn test_superblock_total_objects() {
        let sb = VolumeSuperblock {
            name: "Macintosh HD".to_string(),
            num_files: 10,
            num_directories: 3,
            num_symlinks: 2,
            num_other_objects: 1,
            fs_flags: APFS_FS_UNENCRYPTED,
        };
        assert_eq!(sb.total_objects(), 16);
        assert!(sb.is_unencrypted());
    }

    #[test]
    fn test_superblock_encrypted_flags() {
        let sb = VolumeSuperblock {
            name: "Encrypted".to_string(),
            num_files: 0,
            num_directories: 0,
            num_symlinks: 0,
            num_other_objects: 0,
            fs_flags: 0,
        };
        assert!(!sb.is_unencrypted());
    }
}

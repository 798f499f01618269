//! # apfsdump testkit
//!
//! Synthetic, in-memory implementations of the volume access contract.
//! Integration tests script a namespace with the builder methods and drive
//! the extraction engine against it, with no real APFS image involved.
//!
//! ## Example
//!
//! ```rust
//! use apfsdump_testkit::{SyntheticContainer, SyntheticVolume};
//! use apfsdump_core::{ContainerSource, ROOT_DIR_ID};
//!
//! let mut vol = SyntheticVolume::new("Demo");
//! let dir = vol.add_directory(ROOT_DIR_ID, "docs");
//! vol.add_file(dir, "readme.txt", 0o644, b"hello");
//! vol.add_symlink(ROOT_DIR_ID, "latest", "docs/readme.txt");
//!
//! let mut container = SyntheticContainer::new(vec![vol]);
//! assert_eq!(container.volume_count(), 1);
//! ```

use apfsdump_core::{
    ContainerSource, DirEntry, EntryKind, Error, InodeInfo, ObjectId, Result, VolumeSource,
    VolumeSuperblock, APFS_FS_UNENCRYPTED, ROOT_DIR_ID, XATTR_DECMPFS, XATTR_SYMLINK,
};
use std::collections::HashMap;

/// Marker bytes standing in for a real decmpfs header
const FAKE_DECMPFS_HEADER: &[u8] = b"fpmc\x03\x00\x00\x00";

#[derive(Debug, Clone)]
enum Node {
    Directory {
        entries: Vec<DirEntry>,
    },
    File {
        mode: u32,
        content: Vec<u8>,
        compressed: bool,
        /// A compressed file normally carries the decmpfs attribute; tests
        /// clear this to simulate an inconsistent source
        decmpfs_attr: bool,
    },
    Symlink {
        /// Raw target bytes; not required to be UTF-8
        target: Vec<u8>,
    },
    /// An object of a type the engine does not materialize
    Other,
}

/// A scriptable in-memory volume
#[derive(Debug, Clone)]
pub struct SyntheticVolume {
    name: String,
    nodes: HashMap<ObjectId, Node>,
    fs_flags: u64,
    next_id: ObjectId,
    num_files: u64,
    num_directories: u64,
    num_symlinks: u64,
    num_other_objects: u64,
}

impl SyntheticVolume {
    /// Create an unencrypted volume with an empty root directory
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_DIR_ID, Node::Directory { entries: Vec::new() });

        Self {
            name: name.into(),
            nodes,
            fs_flags: APFS_FS_UNENCRYPTED,
            next_id: ROOT_DIR_ID + 1,
            num_files: 0,
            num_directories: 0,
            num_symlinks: 0,
            num_other_objects: 0,
        }
    }

    /// Override the superblock flags (e.g. to simulate FileVault)
    pub fn set_fs_flags(&mut self, flags: u64) {
        self.fs_flags = flags;
    }

    /// Superblock as the engine will see it
    pub fn superblock(&self) -> VolumeSuperblock {
        VolumeSuperblock {
            name: self.name.clone(),
            num_files: self.num_files,
            num_directories: self.num_directories,
            num_symlinks: self.num_symlinks,
            num_other_objects: self.num_other_objects,
            fs_flags: self.fs_flags,
        }
    }

    /// Add an empty directory under `parent`, returning its object id
    pub fn add_directory(&mut self, parent: ObjectId, name: &str) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(id, Node::Directory { entries: Vec::new() });
        self.link(parent, name, id, EntryKind::Directory);
        self.num_directories += 1;
        id
    }

    /// Add a regular file under `parent`
    pub fn add_file(&mut self, parent: ObjectId, name: &str, mode: u32, content: &[u8]) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::File {
                mode,
                content: content.to_vec(),
                compressed: false,
                decmpfs_attr: false,
            },
        );
        self.link(parent, name, id, EntryKind::RegularFile);
        self.num_files += 1;
        id
    }

    /// Add a transparently compressed file under `parent`
    ///
    /// `content` is the plaintext the decompressor will yield.
    pub fn add_compressed_file(
        &mut self,
        parent: ObjectId,
        name: &str,
        mode: u32,
        content: &[u8],
    ) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::File {
                mode,
                content: content.to_vec(),
                compressed: true,
                decmpfs_attr: true,
            },
        );
        self.link(parent, name, id, EntryKind::RegularFile);
        self.num_files += 1;
        id
    }

    /// Add a file flagged compressed but missing its decmpfs attribute
    pub fn add_compressed_file_missing_attr(
        &mut self,
        parent: ObjectId,
        name: &str,
        mode: u32,
    ) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::File {
                mode,
                content: Vec::new(),
                compressed: true,
                decmpfs_attr: false,
            },
        );
        self.link(parent, name, id, EntryKind::RegularFile);
        self.num_files += 1;
        id
    }

    /// Add a symbolic link under `parent`
    pub fn add_symlink(&mut self, parent: ObjectId, name: &str, target: &str) -> ObjectId {
        self.add_symlink_bytes(parent, name, target.as_bytes())
    }

    /// Add a symbolic link whose target is arbitrary bytes
    ///
    /// Target paths on real images are byte strings, not UTF-8; this lets a
    /// test script one that is not valid UTF-8.
    pub fn add_symlink_bytes(&mut self, parent: ObjectId, name: &str, target: &[u8]) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::Symlink {
                target: target.to_vec(),
            },
        );
        self.link(parent, name, id, EntryKind::Symlink);
        self.num_symlinks += 1;
        id
    }

    /// Add an object of an unrecognized directory-record type
    pub fn add_other(&mut self, parent: ObjectId, name: &str, type_code: u8) -> ObjectId {
        let id = self.alloc_id();
        self.nodes.insert(id, Node::Other);
        self.link(parent, name, id, EntryKind::Other(type_code));
        self.num_other_objects += 1;
        id
    }

    /// Add a raw directory entry without creating a node
    ///
    /// Lets a test reference an existing object id from a second parent,
    /// e.g. to fabricate a directory cycle.
    pub fn add_entry_raw(&mut self, parent: ObjectId, name: &str, id: ObjectId, kind: EntryKind) {
        self.link(parent, name, id, kind);
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn link(&mut self, parent: ObjectId, name: &str, id: ObjectId, kind: EntryKind) {
        match self.nodes.get_mut(&parent) {
            Some(Node::Directory { entries }) => entries.push(DirEntry::new(name, id, kind)),
            _ => panic!("parent {} is not a directory", parent),
        }
    }
}

impl VolumeSource for SyntheticVolume {
    fn list_directory(&mut self, dir_id: ObjectId) -> Result<Vec<DirEntry>> {
        match self.nodes.get(&dir_id) {
            Some(Node::Directory { entries }) => Ok(entries.clone()),
            Some(_) => Err(Error::not_found(format!("object {} is not a directory", dir_id))),
            None => Err(Error::not_found(format!("no object {}", dir_id))),
        }
    }

    fn inode(&mut self, object_id: ObjectId) -> Result<InodeInfo> {
        let node = self
            .nodes
            .get(&object_id)
            .ok_or_else(|| Error::not_found(format!("no object {}", object_id)))?;

        let (mode, size, compressed) = match node {
            Node::File {
                mode,
                content,
                compressed,
                ..
            } => (*mode, content.len() as u64, *compressed),
            Node::Directory { .. } => (0o755, 0, false),
            Node::Symlink { .. } => (0o777, 0, false),
            Node::Other => (0, 0, false),
        };

        Ok(InodeInfo {
            object_id,
            private_id: object_id,
            mode,
            size,
            compressed,
        })
    }

    fn read_file_range(
        &mut self,
        private_id: ObjectId,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize> {
        match self.nodes.get(&private_id) {
            Some(Node::File { content, .. }) => {
                let offset = offset as usize;
                if offset >= content.len() {
                    return Ok(0);
                }
                let n = buf.len().min(content.len() - offset);
                buf[..n].copy_from_slice(&content[offset..offset + n]);
                Ok(n)
            }
            _ => Err(Error::not_found(format!("no file content for {}", private_id))),
        }
    }

    fn extended_attribute(&mut self, object_id: ObjectId, name: &str) -> Result<Option<Vec<u8>>> {
        let node = self
            .nodes
            .get(&object_id)
            .ok_or_else(|| Error::not_found(format!("no object {}", object_id)))?;

        match (node, name) {
            (Node::File { decmpfs_attr, .. }, XATTR_DECMPFS) if *decmpfs_attr => {
                Ok(Some(FAKE_DECMPFS_HEADER.to_vec()))
            }
            (Node::Symlink { target }, XATTR_SYMLINK) => {
                // Real images store the target with a trailing NUL
                let mut bytes = target.clone();
                bytes.push(0);
                Ok(Some(bytes))
            }
            _ => Ok(None),
        }
    }

    fn decompress_file(&mut self, object_id: ObjectId, decmpfs: &[u8]) -> Result<Vec<u8>> {
        if decmpfs != FAKE_DECMPFS_HEADER {
            return Err(Error::decompress(format!(
                "unrecognized decmpfs header on object {}",
                object_id
            )));
        }

        match self.nodes.get(&object_id) {
            Some(Node::File {
                content,
                compressed: true,
                ..
            }) => Ok(content.clone()),
            _ => Err(Error::decompress(format!(
                "object {} is not a compressed file",
                object_id
            ))),
        }
    }
}

/// A scriptable in-memory container
pub struct SyntheticContainer {
    volumes: Vec<SyntheticVolume>,
}

impl SyntheticContainer {
    pub fn new(volumes: Vec<SyntheticVolume>) -> Self {
        Self { volumes }
    }
}

impl ContainerSource for SyntheticContainer {
    fn identify(&self) -> &str {
        "Synthetic in-memory container"
    }

    fn volume_count(&self) -> u32 {
        self.volumes.len() as u32
    }

    fn volume_superblock(&self, index: u32) -> Result<VolumeSuperblock> {
        self.volumes
            .get(index as usize)
            .map(|v| v.superblock())
            .ok_or_else(|| Error::not_found(format!("no volume {}", index)))
    }

    fn open_volume(&mut self, index: u32) -> Result<Box<dyn VolumeSource + '_>> {
        let volume = self
            .volumes
            .get_mut(index as usize)
            .ok_or_else(|| Error::not_found(format!("no volume {}", index)))?;
        Ok(Box::new(volume))
    }
}

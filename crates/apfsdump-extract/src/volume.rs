//! Volume extraction driver
//!
//! Drains every volume of an opened container into
//! `<output_root>/Volume <index>/out`, sequentially and in ascending index
//! order.

use crate::options::ExtractOptions;
use crate::walk::TreeWalker;
use apfsdump_core::{ContainerSource, Error, Result, ROOT_DIR_ID};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Outcome of one volume's extraction
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub index: u32,
    pub name: String,

    /// Directory entries visited
    pub objects_processed: u64,

    /// Entries skipped under lenient policy
    pub objects_skipped: u64,

    /// Superblock-declared object total used as the progress denominator;
    /// an approximation, not a recount
    pub objects_declared: u64,
}

/// Outcome of a whole container extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub volumes: Vec<VolumeReport>,
}

/// Drives extraction of all volumes in a container
pub struct VolumeExtractor<'c> {
    container: &'c mut dyn ContainerSource,
    output_root: PathBuf,
    options: ExtractOptions,
}

impl<'c> VolumeExtractor<'c> {
    pub fn new(
        container: &'c mut dyn ContainerSource,
        output_root: impl Into<PathBuf>,
        options: ExtractOptions,
    ) -> Self {
        Self {
            container,
            output_root: output_root.into(),
            options,
        }
    }

    /// Extract every volume, in ascending index order
    ///
    /// `output_root` must not already exist; extraction never merges into a
    /// pre-existing tree. Volumes are not isolated: the first per-volume
    /// fatal failure aborts the remaining run.
    pub fn extract_all(&mut self) -> Result<ExtractReport> {
        if self.output_root.exists() {
            return Err(Error::already_exists(format!(
                "output root {} already exists",
                self.output_root.display()
            )));
        }

        let count = self.container.volume_count();
        if count == 0 {
            return Err(Error::container_init("volume count should not be zero"));
        }

        info!(volumes = count, "found APFS filesystem");

        let mut volumes = Vec::with_capacity(count as usize);
        for index in 0..count {
            volumes.push(self.extract_volume(index)?);
        }

        Ok(ExtractReport { volumes })
    }

    /// Extract the volume at `index`
    pub fn extract_volume(&mut self, index: u32) -> Result<VolumeReport> {
        let superblock = self.container.volume_superblock(index)?;

        // The crypto check precedes any output creation, so a refused
        // volume leaves nothing behind
        if !superblock.is_unencrypted() {
            return Err(Error::unsupported(format!(
                "volume {} (\"{}\") carries an encryption state this build cannot read; \
                 FileVault volumes are not supported",
                index, superblock.name
            )));
        }

        let declared = superblock.total_objects();
        info!(
            index,
            name = %superblock.name,
            declared_objects = declared,
            "extracting volume"
        );

        let output_path = self.output_root.join(format!("Volume {}", index)).join("out");
        fs::create_dir_all(&output_path).map_err(|source| Error::Write {
            path: output_path.clone(),
            source,
        })?;

        let options = self.options;
        let mut volume = self.container.open_volume(index)?;
        let mut walker = TreeWalker::new(volume.as_mut(), options, declared);
        let stats = walker.walk(ROOT_DIR_ID, &output_path)?;

        info!(
            index,
            processed = stats.processed,
            skipped = stats.skipped,
            "volume extracted"
        );

        Ok(VolumeReport {
            index,
            name: superblock.name,
            objects_processed: stats.processed,
            objects_skipped: stats.skipped,
            objects_declared: declared,
        })
    }
}

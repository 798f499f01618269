//! Recursive namespace traversal
//!
//! Walks one volume's directory tree depth-first in listing order,
//! dispatching each entry to its materializer and keeping a flat object
//! counter for the whole volume.

use crate::materialize;
use crate::options::ExtractOptions;
use crate::progress::ProgressMeter;
use apfsdump_core::{EntryKind, Error, ObjectId, Result, VolumeSource};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Counters accumulated over one volume walk
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkStats {
    /// Directory entries visited, each exactly once
    pub processed: u64,

    /// Entries skipped under lenient policy (failures and unknown types)
    pub skipped: u64,
}

/// Depth-first walker over one opened volume
pub struct TreeWalker<'v> {
    volume: &'v mut dyn VolumeSource,
    options: ExtractOptions,
    meter: ProgressMeter,
    // Directory ids seen this run; the namespace is a tree by construction,
    // but a corrupted image may say otherwise
    visited: HashSet<ObjectId>,
    skipped: u64,
}

impl<'v> TreeWalker<'v> {
    pub fn new(
        volume: &'v mut dyn VolumeSource,
        options: ExtractOptions,
        total_estimate: u64,
    ) -> Self {
        Self {
            volume,
            options,
            meter: ProgressMeter::new(total_estimate, options.progress),
            visited: HashSet::new(),
            skipped: 0,
        }
    }

    /// Walk the tree rooted at `dir_id`, materializing into `output_path`
    ///
    /// `output_path` must already exist. Under strict policy the first
    /// per-object failure aborts and propagates; under lenient policy
    /// failures are logged, counted, and skipped.
    pub fn walk(&mut self, dir_id: ObjectId, output_path: &Path) -> Result<WalkStats> {
        self.visited.insert(dir_id);
        self.walk_dir(dir_id, output_path)?;
        self.meter.finish();
        Ok(WalkStats {
            processed: self.meter.processed(),
            skipped: self.skipped,
        })
    }

    fn walk_dir(&mut self, dir_id: ObjectId, output_path: &Path) -> Result<()> {
        let entries = self.volume.list_directory(dir_id)?;

        for entry in entries {
            self.meter.advance();

            let child_path = output_path.join(&entry.name);
            let result = match entry.kind {
                EntryKind::Directory => self.enter_directory(entry.object_id, &child_path),
                EntryKind::RegularFile => {
                    materialize::regular_file(self.volume, entry.object_id, &child_path)
                }
                EntryKind::Symlink => {
                    materialize::symlink(self.volume, entry.object_id, &child_path)
                }
                EntryKind::Other(code) => {
                    // Never fatal, regardless of policy
                    warn!(
                        name = %entry.name,
                        parent = %output_path.display(),
                        code,
                        "skipping entry of unrecognized type"
                    );
                    self.skipped += 1;
                    continue;
                }
            };

            if let Err(err) = result {
                warn!(
                    name = %entry.name,
                    parent = %output_path.display(),
                    error = %err,
                    "failed to materialize object"
                );
                if self.options.strict {
                    return Err(err);
                }
                self.skipped += 1;
            }
        }

        Ok(())
    }

    fn enter_directory(&mut self, dir_id: ObjectId, output_path: &Path) -> Result<()> {
        if !self.visited.insert(dir_id) {
            return Err(Error::corrupt(format!(
                "directory object {} appears twice in the namespace; refusing to recurse",
                dir_id
            )));
        }

        materialize::directory(output_path)?;
        self.walk_dir(dir_id, output_path)
    }
}

//! Extraction policy options
//!
//! Threaded explicitly through the extractor and walker; there is no
//! process-wide flag.

/// Policy for one extraction run
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Abort the walk on the first per-object failure instead of skipping it
    pub strict: bool,

    /// Render the progress bar to stderr
    pub progress: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strict: false,
            progress: false,
        }
    }
}

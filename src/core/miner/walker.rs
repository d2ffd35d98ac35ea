//! File system walker.
//!
//! Discovers every regular file under a root, recursively, with no
//! extension filtering. Optional exclude globs prune paths the
//! operator never wants mined. Symlinks are followed; unreadable
//! entries (permission denied, broken links, link loops) are counted
//! and logged, not fatal.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{MineError, Result};

/// Result of walking an input root
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Regular files, in walk order (sorted by file name per directory)
    pub files: Vec<PathBuf>,

    /// Entries that could not be read during the walk
    pub walk_errors: usize,
}

/// File system walker with optional exclude patterns
#[derive(Debug)]
pub struct FileWalker {
    /// Patterns to exclude (e.g., "**/.git/**")
    exclude_patterns: Vec<Pattern>,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Arguments
    ///
    /// * `exclude_patterns` - Glob patterns for paths to skip
    ///
    /// # Returns
    ///
    /// A new `FileWalker` instance or an error if patterns are
    /// invalid
    pub fn new(exclude_patterns: Vec<String>) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    MineError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exclude_patterns: exclude,
        })
    }

    /// Collect all regular files under `root`
    ///
    /// Symlinks are followed, so a link to a file is mined under the
    /// link's path. Walk order is deterministic.
    pub fn collect_files(&self, root: &Path) -> Result<Discovery> {
        if !root.is_dir() {
            return Err(MineError::InvalidPath(format!(
                "Input root {root:?} is not a directory"
            )));
        }

        let mut discovery = Discovery::default();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        discovery.files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    discovery.walk_errors += 1;
                }
            }
        }

        Ok(discovery)
    }

    /// Never filters the root itself; otherwise prunes excluded paths
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        if path == root {
            return true;
        }

        let excluded = self.exclude_patterns.iter().any(|p| p.matches_path(path));
        if excluded {
            tracing::debug!("Skipping excluded path: {:?}", path);
        }
        !excluded
    }
}

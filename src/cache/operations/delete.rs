use log::{debug, trace, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::cache::layout::{CacheLayout, Thumbnail};
use crate::error::Result;

/// Walk behavior shared by path-driven operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Recurse into subdirectories.
    pub recursive: bool,
    /// Include hidden files and directories.
    pub hidden: bool,
}

/// What a delete pass found before anything is removed.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub thumbnails: Vec<Thumbnail>,
    /// Subdirectories skipped because recursion was not enabled.
    pub ignored_directories: u32,
}

/// Trait for finding the thumbnails of a set of files and directories.
///
/// Collection is separate from removal so callers can interpose a
/// confirmation prompt or a dry run.
pub trait Deleter {
    fn collect(
        &self,
        paths: &[PathBuf],
        last_accessed: Option<SystemTime>,
    ) -> Result<DeleteOutcome>;
}

pub struct CacheDeleter<'a> {
    layout: &'a CacheLayout,
    walk: WalkOptions,
}

impl<'a> CacheDeleter<'a> {
    pub fn new(layout: &'a CacheLayout, walk: WalkOptions) -> Self {
        Self { layout, walk }
    }

    fn collect_file(
        &self,
        path: &Path,
        last_accessed: Option<SystemTime>,
        outcome: &mut DeleteOutcome,
    ) -> Result<()> {
        for thumb in self.layout.thumbnails_for(path)? {
            if let Some(cutoff) = last_accessed
                && !accessed_before(&thumb.thumbnail, cutoff)
            {
                debug!(
                    "Keeping '{}': accessed after the cutoff",
                    thumb.thumbnail.display()
                );
                continue;
            }
            outcome.thumbnails.push(thumb);
        }
        Ok(())
    }
}

impl Deleter for CacheDeleter<'_> {
    fn collect(
        &self,
        paths: &[PathBuf],
        last_accessed: Option<SystemTime>,
    ) -> Result<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();

        for path in paths {
            if path.is_file() {
                self.collect_file(path, last_accessed, &mut outcome)?;
            } else if path.is_dir() {
                let mut walk = WalkDir::new(path).min_depth(1);
                if !self.walk.recursive {
                    walk = walk.max_depth(1);
                }
                for entry in walk
                    .into_iter()
                    .filter_entry(|e| self.walk.hidden || !is_hidden(e.file_name()))
                    .filter_map(|e| e.ok())
                {
                    trace!("entry: {}", entry.path().display());
                    if entry.file_type().is_dir() {
                        if !self.walk.recursive {
                            outcome.ignored_directories += 1;
                        }
                    } else {
                        self.collect_file(entry.path(), last_accessed, &mut outcome)?;
                    }
                }
            } else {
                warn!("Skipping '{}': no such file or directory", path.display());
            }
        }

        Ok(outcome)
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn accessed_before(thumbnail: &Path, cutoff: SystemTime) -> bool {
    match std::fs::metadata(thumbnail).and_then(|meta| meta.accessed()) {
        Ok(atime) => atime <= cutoff,
        Err(err) => {
            debug!("No access time for '{}': {err}", thumbnail.display());
            true
        }
    }
}

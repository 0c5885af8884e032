//! Freedesktop thumbnail cache layout.
//!
//! Thumbnails live under `$XDG_CACHE_HOME/thumbnails/<size>/` and are named
//! after the lowercase-hex MD5 digest of the `file://` URI of the source
//! file, with a `.png` extension.

use log::{debug, trace};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{CacheDirNotFoundSnafu, CanonicalizeSnafu, Error, Result};

/// Size buckets defined by the thumbnail managing standard.
const SIZE_DIRS: [&str; 4] = ["normal", "large", "x-large", "xx-large"];

/// The set of directories thumbnails are stored in.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    roots: Vec<PathBuf>,
}

impl CacheLayout {
    /// Locate the cache directories of the current user.
    pub fn discover() -> Result<Self> {
        let base = directories::BaseDirs::new().ok_or_else(|| CacheDirNotFoundSnafu.build())?;
        let layout = Self::with_cache_root(base.cache_dir().join("thumbnails"));
        if log::log_enabled!(log::Level::Debug) {
            debug!("Will look for thumbnails in the following directories:");
            for root in &layout.roots {
                debug!("{}", root.display());
            }
        }
        Ok(layout)
    }

    /// Build a layout rooted at an explicit `thumbnails` directory.
    pub fn with_cache_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let roots = SIZE_DIRS.into_iter().map(|size| root.join(size)).collect();
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Look up the existing thumbnails of one source file across all roots.
    pub fn thumbnails_for(&self, path: &Path) -> Result<Vec<Thumbnail>> {
        let uri = file_uri(path)?;
        let name = thumbnail_file_name(uri.as_str());
        debug!("Processing '{}' ({name})", path.display());

        let mut found = Vec::new();
        for root in &self.roots {
            let candidate = root.join(&name);
            if candidate.exists() {
                debug!("  Found      {}", candidate.display());
                found.push(Thumbnail {
                    thumbnail: candidate,
                    source: path.to_path_buf(),
                });
            } else {
                trace!("  Not found  {}", candidate.display());
            }
        }

        if found.is_empty() {
            debug!("Could not find a thumbnail for '{}'", path.display());
        }

        Ok(found)
    }
}

/// A cached thumbnail paired with the file it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub thumbnail: PathBuf,
    pub source: PathBuf,
}

/// The `file://` URI a thumbnail name is derived from. Relative paths are
/// canonicalized first; absolute paths are used as given.
pub fn file_uri(path: &Path) -> Result<Url> {
    let url = if path.is_absolute() {
        Url::from_file_path(path)
    } else {
        let canonical = path.canonicalize().context(CanonicalizeSnafu { path })?;
        Url::from_file_path(&canonical)
    };
    url.map_err(|_| Error::InvalidFileUri {
        path: path.to_path_buf(),
    })
}

/// Thumbnail file name for a source URI.
pub fn thumbnail_file_name(uri: &str) -> String {
    format!("{:x}.png", md5::compute(uri.as_bytes()))
}

use log::info;
use snafu::ResultExt;
use std::fs;

use crate::error::{DeleteThumbnailSnafu, Result};

pub mod layout;
mod operations;

pub use layout::{CacheLayout, Thumbnail};
pub use operations::cleanup::{CacheCleaner, GlobFilter};
pub use operations::delete::{CacheDeleter, DeleteOutcome, WalkOptions};
pub use operations::locate::CacheLocator;
pub use operations::{Cleaner, Deleter, Locator};

/// Remove the cached files of the given thumbnails.
pub fn remove_thumbnails(thumbnails: &[Thumbnail]) -> Result<()> {
    for thumb in thumbnails {
        info!("Deleting a thumbnail for '{}'", thumb.source.display());
        fs::remove_file(&thumb.thumbnail).context(DeleteThumbnailSnafu {
            path: thumb.thumbnail.as_path(),
        })?;
    }
    Ok(())
}

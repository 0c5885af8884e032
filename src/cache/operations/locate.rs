use std::path::Path;

use crate::cache::layout::{CacheLayout, Thumbnail};
use crate::error::Result;

/// Trait for finding where the thumbnails of one file are cached.
pub trait Locator {
    fn locate(&self, file: &Path) -> Result<Vec<Thumbnail>>;
}

pub struct CacheLocator<'a> {
    layout: &'a CacheLayout,
}

impl<'a> CacheLocator<'a> {
    pub fn new(layout: &'a CacheLayout) -> Self {
        Self { layout }
    }
}

impl Locator for CacheLocator<'_> {
    fn locate(&self, file: &Path) -> Result<Vec<Thumbnail>> {
        // The file itself does not have to exist: locating the thumbnails
        // of an already deleted file is a legitimate use.
        self.layout.thumbnails_for(file)
    }
}

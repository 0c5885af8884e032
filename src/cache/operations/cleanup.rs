use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, trace};
use snafu::ResultExt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

use crate::cache::layout::{CacheLayout, Thumbnail};
use crate::cache::operations::delete::WalkOptions;
use crate::error::{Error, InvalidGlobSnafu, InvalidThumbUriSnafu, Result, ThumbnailReadSnafu};

/// PNG text key pointing at the file a thumbnail was generated for.
const THUMB_URI_KEY: &str = "Thumb::URI";

/// Include/exclude filter over thumbnail source paths.
///
/// Patterns follow gitignore-style globs; a leading `!` excludes. When no
/// positive pattern is given, everything is included.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl GlobFilter {
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut include_all = true;

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if let Some(negated) = pattern.strip_prefix('!') {
                exclude.add(Glob::new(negated).context(InvalidGlobSnafu { pattern })?);
            } else {
                include_all = false;
                include.add(Glob::new(pattern).context(InvalidGlobSnafu { pattern })?);
            }
        }
        if include_all {
            include.add(Glob::new("**").context(InvalidGlobSnafu { pattern: "**" })?);
        }

        Ok(Self {
            include: include.build().context(InvalidGlobSnafu { pattern: "<set>" })?,
            exclude: exclude.build().context(InvalidGlobSnafu { pattern: "<set>" })?,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        !self.exclude.is_match(path) && self.include.is_match(path)
    }
}

/// Trait for finding thumbnails whose source file no longer exists.
pub trait Cleaner {
    fn collect(&self, filter: &GlobFilter) -> Result<Vec<Thumbnail>>;
}

pub struct CacheCleaner<'a> {
    layout: &'a CacheLayout,
    walk: WalkOptions,
}

impl<'a> CacheCleaner<'a> {
    pub fn new(layout: &'a CacheLayout, walk: WalkOptions) -> Self {
        Self { layout, walk }
    }
}

impl Cleaner for CacheCleaner<'_> {
    fn collect(&self, filter: &GlobFilter) -> Result<Vec<Thumbnail>> {
        let mut orphans = Vec::new();

        for root in self.layout.roots() {
            for entry in WalkDir::new(root)
                .min_depth(1)
                .into_iter()
                .filter_entry(|e| {
                    self.walk.hidden || !e.file_name().to_string_lossy().starts_with('.')
                })
                .filter_map(|e| e.ok())
                .filter(|e| {
                    !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "png")
                })
            {
                match orphan_source(entry.path(), filter) {
                    Ok(Some(source)) => orphans.push(Thumbnail {
                        thumbnail: entry.path().to_path_buf(),
                        source,
                    }),
                    Ok(None) => {}
                    // A thumbnail we cannot make sense of is left alone.
                    Err(err) => debug!("{err} for {}", entry.path().display()),
                }
            }
        }

        Ok(orphans)
    }
}

/// The source path of a thumbnail, if that source is gone and passes the
/// filter. Non-`file://` origins are ignored.
fn orphan_source(thumbnail: &Path, filter: &GlobFilter) -> Result<Option<PathBuf>> {
    let uri = thumb_source_uri(thumbnail)?;
    let origin = Url::parse(&uri).context(InvalidThumbUriSnafu { path: thumbnail })?;

    if origin.scheme() != "file" {
        trace!(
            "found a thumbnail origin URI with scheme {}, ignoring",
            origin.scheme()
        );
        return Ok(None);
    }
    let Ok(source) = origin.to_file_path() else {
        return Ok(None);
    };

    if filter.matches(&source) && !source.exists() {
        Ok(Some(source))
    } else {
        Ok(None)
    }
}

/// Read the `Thumb::URI` text record of a thumbnail PNG.
fn thumb_source_uri(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder.read_info().context(ThumbnailReadSnafu { path })?;

    if let Some(uri) = uri_chunk(reader.info()) {
        return Ok(uri);
    }

    // Text chunks are allowed to trail the image data.
    reader.finish().context(ThumbnailReadSnafu { path })?;
    uri_chunk(reader.info()).ok_or_else(|| Error::MissingThumbUri {
        path: path.to_path_buf(),
    })
}

fn uri_chunk(info: &png::Info) -> Option<String> {
    for text in &info.uncompressed_latin1_text {
        if text.keyword == THUMB_URI_KEY {
            return Some(text.text.clone());
        }
    }
    for text in &info.compressed_latin1_text {
        if text.keyword == THUMB_URI_KEY
            && let Ok(value) = text.get_text()
        {
            return Some(value);
        }
    }
    for text in &info.utf8_text {
        if text.keyword == THUMB_URI_KEY
            && let Ok(value) = text.get_text()
        {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::BufWriter;

    fn write_thumbnail(path: &Path, uri: &str) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 1, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .add_text_chunk(THUMB_URI_KEY.to_string(), uri.to_string())
            .unwrap();
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0, 0, 0, 0]).unwrap();
    }

    fn all_included() -> GlobFilter {
        GlobFilter::from_patterns::<&str>(&[]).unwrap()
    }

    #[test]
    fn finds_thumbnails_of_deleted_sources() {
        let temp = tempfile::tempdir().unwrap();
        let cache = temp.path().join("thumbnails");
        fs::create_dir_all(cache.join("normal")).unwrap();

        let live = temp.path().join("live.txt");
        fs::write(&live, b"still here").unwrap();
        let gone = temp.path().join("gone.txt");

        let live_uri = Url::from_file_path(&live).unwrap();
        let gone_uri = Url::from_file_path(&gone).unwrap();
        write_thumbnail(&cache.join("normal/live.png"), live_uri.as_str());
        write_thumbnail(&cache.join("normal/gone.png"), gone_uri.as_str());

        let layout = CacheLayout::with_cache_root(&cache);
        let cleaner = CacheCleaner::new(&layout, WalkOptions::default());
        let orphans = cleaner.collect(&all_included()).unwrap();

        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].source, gone);
        assert!(orphans[0].thumbnail.ends_with("normal/gone.png"));
    }

    #[test]
    fn non_file_origins_and_unreadable_thumbnails_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let cache = temp.path().join("thumbnails");
        fs::create_dir_all(cache.join("large")).unwrap();

        write_thumbnail(&cache.join("large/remote.png"), "https://example.org/x.png");
        // Not a PNG at all.
        fs::write(cache.join("large/garbage.png"), b"not a png").unwrap();

        let layout = CacheLayout::with_cache_root(&cache);
        let cleaner = CacheCleaner::new(&layout, WalkOptions::default());
        assert!(cleaner.collect(&all_included()).unwrap().is_empty());
    }

    #[test]
    fn glob_filter_honors_negated_patterns() {
        let filter =
            GlobFilter::from_patterns(&["!**/*.tmp".to_string(), "**/keep/**".to_string()])
                .unwrap();
        assert!(filter.matches(Path::new("/data/keep/a.jpg")));
        assert!(!filter.matches(Path::new("/data/keep/a.tmp")));
        assert!(!filter.matches(Path::new("/data/other/a.jpg")));
    }

    #[test]
    fn glob_filter_defaults_to_include_all() {
        let filter = GlobFilter::from_patterns(&["!**/skip/**".to_string()]).unwrap();
        assert!(filter.matches(Path::new("/anything/at/all")));
        assert!(!filter.matches(Path::new("/anything/skip/this")));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let err = GlobFilter::from_patterns(&["a{".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidGlob { .. }));
    }

    #[test]
    fn filtered_out_orphans_are_not_collected() {
        let temp = tempfile::tempdir().unwrap();
        let cache = temp.path().join("thumbnails");
        fs::create_dir_all(cache.join("normal")).unwrap();

        let gone = temp.path().join("gone.tmp");
        let gone_uri = Url::from_file_path(&gone).unwrap();
        write_thumbnail(&cache.join("normal/gone.png"), gone_uri.as_str());

        let layout = CacheLayout::with_cache_root(&cache);
        let cleaner = CacheCleaner::new(&layout, WalkOptions::default());

        let filter = GlobFilter::from_patterns(&["!**/*.tmp".to_string()]).unwrap();
        assert!(cleaner.collect(&filter).unwrap().is_empty());
    }
}

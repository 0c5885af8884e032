use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not determine the user cache directory"))]
    CacheDirNotFound,

    #[snafu(display("Path not found: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Failed to resolve '{}': {source}", path.display()))]
    Canonicalize {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Cannot build a file URI for '{}'", path.display()))]
    InvalidFileUri { path: PathBuf },

    #[snafu(display("Failed to delete thumbnail '{}': {source}", path.display()))]
    DeleteThumbnail {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to read thumbnail '{}': {source}", path.display()))]
    ThumbnailRead {
        path: PathBuf,
        source: png::DecodingError,
    },

    #[snafu(display("Thumbnail '{}' carries no Thumb::URI record", path.display()))]
    MissingThumbUri { path: PathBuf },

    #[snafu(display("Thumbnail '{}' stores an invalid origin URI: {source}", path.display()))]
    InvalidThumbUri {
        path: PathBuf,
        source: url::ParseError,
    },

    #[snafu(display("Invalid glob pattern '{pattern}': {source}"))]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("Failed to read config '{}': {source}", path.display()))]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config '{}': {source}", path.display()))]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Failed to launch '{command}': {source}"))]
    CommandLaunch {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

//! Error types for loading configuration and content

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content validation errors
///
/// Every variant names the offending document so a failed build can point
/// the author at the file to fix.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{}: no `date` in front-matter and no YYYY-MM-DD filename prefix", .path.display())]
    MissingDate { path: PathBuf },

    #[error("{}: unparseable date `{value}`", .path.display())]
    InvalidDate { path: PathBuf, value: String },

    #[error("{}: malformed front-matter: {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },

    #[error("{}: URL `{url}` is already used by {}", .path.display(), .other.display())]
    DuplicateUrl {
        path: PathBuf,
        other: PathBuf,
        url: String,
    },

    #[error("{}: URL `{url}` is reserved for the {page} page", .path.display())]
    ReservedUrl {
        path: PathBuf,
        url: String,
        page: &'static str,
    },

    #[error("{}: URL `{url}` must not contain `.` or `..` segments", .path.display())]
    InvalidUrl { path: PathBuf, url: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// The document the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ContentError::MissingDate { path }
            | ContentError::InvalidDate { path, .. }
            | ContentError::FrontMatter { path, .. }
            | ContentError::DuplicateUrl { path, .. }
            | ContentError::ReservedUrl { path, .. }
            | ContentError::InvalidUrl { path, .. }
            | ContentError::Io { path, .. } => path.as_path(),
        }
    }
}

/// Site configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown timezone: {0}")]
    Timezone(String),

    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    Exclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

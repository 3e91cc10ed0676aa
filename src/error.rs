// src/error.rs
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the core can report. None of these abort a batch on their own;
/// callers decide whether to substitute a default, skip, or surface them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("malformed JSON in {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("unexpected cache shape in {}: found {found}", path.display())]
    UnexpectedShape { path: PathBuf, found: &'static str },

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch { url: url.into(), reason: reason.to_string() }
    }
}

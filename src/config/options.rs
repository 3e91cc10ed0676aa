// src/config/options.rs
use std::ffi::OsString;
use std::path::{ Path, PathBuf };
use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub paths: DataPaths,
    pub extract: ExtractOptions,
}

/// Every file the pipeline touches, derived from one data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    dir: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl DataPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn mapping(&self) -> PathBuf { self.dir.join(MAPPING_FILE) }
    pub fn url_cache(&self) -> PathBuf { self.dir.join(URL_CACHE_FILE) }
    pub fn manual_urls(&self) -> PathBuf { self.dir.join(MANUAL_URLS_FILE) }
    pub fn documents(&self) -> PathBuf { self.dir.join(DOCUMENTS_CACHE_FILE) }
    pub fn extracted_companies(&self) -> PathBuf { self.dir.join(EXTRACTED_COMPANIES_FILE) }

    /// Fixed sibling of the document cache: `documents_cache_backup.json`.
    pub fn backup(&self) -> PathBuf {
        backup_path_for(&self.documents())
    }
}

/// `<dir>/<stem>_backup.<ext>` next to `path`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Marketplace root used for synthesized profile URLs and absolutizing listing links.
    pub base_url: String,
    pub workers: usize,
    pub pause_ms: u64,
    /// Restrict a batch to these company ids; empty means all.
    pub only: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            workers: WORKERS,
            pause_ms: REQUEST_PAUSE_MS,
            only: Vec::new(),
        }
    }
}

impl ExtractOptions {
    /// `<base>/lending-companies/<company_id>`
    pub fn profile_url(&self, company_id: &str) -> String {
        join!(self.base_url.trim_end_matches('/'), "/", PROFILE_SEGMENT, "/", company_id)
    }
}

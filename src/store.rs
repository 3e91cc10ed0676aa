// src/store.rs
//
// Persistence collaborator: every disk read/write of the pipeline goes through here.
// Reads degrade to a default and say why; writes report failure to the caller.

use std::{ collections::BTreeMap, fs, io, path::{ Path, PathBuf } };

use serde::{ de::DeserializeOwned, Serialize };
use tracing::{ error, info, warn };

use crate::error::{ Error, Result };

/// Mapping Store: company_id → canonical display name. Read-only ground truth.
pub type Mapping = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    NotFound,
    Malformed(String),
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool { matches!(self, LoadStatus::Loaded) }
}

/// A value read from disk, or the default that stands in for it.
#[derive(Clone, Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub status: LoadStatus,
}

/// Strict read: distinguishes a missing file from undecodable content.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingFile { path: path.to_path_buf() });
        }
        Err(e) => return Err(Error::Io(e)),
    };
    serde_json::from_str(&text).map_err(|e| Error::MalformedData {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Lenient read: missing or malformed input yields `T::default()`.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Loaded<T> {
    match read_json(path) {
        Ok(value) => Loaded { value, status: LoadStatus::Loaded },
        Err(Error::MissingFile { .. }) => {
            warn!("File not found: {}", path.display());
            Loaded { value: T::default(), status: LoadStatus::NotFound }
        }
        Err(e) => {
            error!("{e}");
            Loaded { value: T::default(), status: LoadStatus::Malformed(e.to_string()) }
        }
    }
}

/// Mapping Store Reader. An empty mapping means "no ground truth available".
pub fn load_mapping(path: &Path) -> Loaded<Mapping> {
    let loaded = load_or_default::<Mapping>(path);
    if loaded.status.is_loaded() {
        info!("Loaded {} company names from {}", loaded.value.len(), path.display());
    }
    loaded
}

/// Whole-file overwrite, 2-space indented UTF-8.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let persist = |source: io::Error| Error::Persistence { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent).map_err(persist)?;
        }
    }
    let text = serde_json::to_string_pretty(value).map_err(|e| persist(e.into()))?;
    fs::write(path, text).map_err(persist)?;
    info!("Successfully wrote to {}", path.display());
    Ok(())
}

/// Byte-for-byte copy of `from` to `to`, creating `to`'s directory if needed.
pub fn copy_raw(from: &Path, to: &Path) -> Result<PathBuf> {
    let persist = |source: io::Error| Error::Persistence { path: to.to_path_buf(), source };

    let bytes = fs::read(from).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::MissingFile { path: from.to_path_buf() },
        _ => Error::Io(e),
    })?;
    if let Some(parent) = to.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent).map_err(persist)?;
        }
    }
    fs::write(to, bytes).map_err(persist)?;
    Ok(to.to_path_buf())
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mapping_is_empty_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let got = load_mapping(&dir.path().join("nope.json"));
        assert!(got.value.is_empty());
        assert_eq!(got.status, LoadStatus::NotFound);
    }

    #[test]
    fn malformed_mapping_is_empty_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("company_mapping.json");
        fs::write(&p, "{ \"acme\": ").unwrap();
        let got = load_mapping(&p);
        assert!(got.value.is_empty());
        assert!(matches!(got.status, LoadStatus::Malformed(_)));

        // Valid JSON, wrong shape
        fs::write(&p, "[\"acme\"]").unwrap();
        assert!(matches!(load_mapping(&p).status, LoadStatus::Malformed(_)));
    }

    #[test]
    fn write_then_read_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested/company_mapping.json");
        let mut m = Mapping::new();
        m.insert(s!("acme"), s!("Acme Capital"));
        write_json(&p, &m).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.contains("\n  \"acme\": \"Acme Capital\""));
        assert_eq!(load_mapping(&p).value, m);
    }

    #[test]
    fn write_into_a_file_path_reports_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = write_json(&blocker.join("cache.json"), &Mapping::new()).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn copy_raw_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.json");
        let raw = b"[ {\"x\" : 1} ,\n\n ]  ";
        fs::write(&src, raw).unwrap();
        let dst = copy_raw(&src, &dir.path().join("b.json")).unwrap();
        assert_eq!(fs::read(dst).unwrap(), raw);
    }
}

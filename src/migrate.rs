// src/migrate.rs
//! Format Migrator for the document cache.
//!
//! Legacy shape: `[ {company_name, title, url, ...}, ... ]`
//! Current shape: `{ company_id: [ {...}, ... ], ... }`
//!
//! An existing file is always copied to its backup sibling first, whatever its shape,
//! and nothing touches the primary path until that copy exists.

use std::path::{ Path, PathBuf };

use serde_json::{ Map, Value };
use tracing::{ debug, info, warn };

use crate::config::options::backup_path_for;
use crate::data::DocumentCache;
use crate::error::{ Error, Result };
use crate::identity::{ DropReason, Resolution, Resolver };
use crate::store::{ self, Mapping };

pub const COMPANY_NAME_FIELD: &str = "company_name";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Flat list of document objects.
    Legacy,
    /// Already keyed by company id.
    Current,
    /// Neither list nor object (or not JSON at all); left alone.
    Unrecognized,
    /// No cache file yet; nothing to back up or convert.
    Missing,
}

pub fn detect_shape(value: &Value) -> Shape {
    match value {
        Value::Array(_) => Shape::Legacy,
        Value::Object(_) => Shape::Current,
        _ => Shape::Unrecognized,
    }
}

/// Counts of which resolution path each legacy record took.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub resolved: usize,
    pub synthesized: usize,
    pub dropped: Vec<DropReason>,
}

/// Pure legacy → current conversion. Per-company insertion order is kept;
/// no deduplication happens here.
pub fn migrate_legacy(records: Vec<Value>, mapping: &Mapping) -> (DocumentCache, Tally) {
    let resolver = Resolver::new(mapping);
    let mut out = DocumentCache::new();
    let mut tally = Tally::default();

    for record in records {
        let Value::Object(doc) = record else {
            tally.dropped.push(DropReason::MissingName);
            continue;
        };
        let name = doc.get(COMPANY_NAME_FIELD).and_then(Value::as_str);
        let id = match resolver.resolve(name) {
            Resolution::Resolved(id) => { tally.resolved += 1; id }
            Resolution::Synthesized(id) => { tally.synthesized += 1; id }
            Resolution::Dropped(reason) => {
                debug!("Dropping document without resolvable company: {reason:?}");
                tally.dropped.push(reason);
                continue;
            }
        };
        out.entry(id).or_insert_with(Vec::new).push(Value::Object(doc));
    }

    (out, tally)
}

#[derive(Debug)]
pub struct MigrationReport {
    pub shape: Shape,
    /// `None` only when there was no input to copy.
    pub backup: Option<PathBuf>,
    pub companies: usize,
    pub tally: Tally,
    /// Only set when the primary file was rewritten (legacy input).
    pub persisted: Option<Result<PathBuf>>,
}

/// Back up `primary`, then rewrite it in current shape if it was legacy.
///
/// A missing input is reported as [`Shape::Missing`] with nothing written. Errors
/// only when the backup cannot be written, and then the primary file is untouched.
pub fn migrate_documents(primary: &Path, mapping: &Mapping) -> Result<MigrationReport> {
    let backup = match store::copy_raw(primary, &backup_path_for(primary)) {
        Ok(path) => path,
        Err(Error::MissingFile { path }) => {
            warn!("No document cache at {}; nothing to migrate", path.display());
            return Ok(MigrationReport {
                shape: Shape::Missing,
                backup: None,
                companies: 0,
                tally: Tally::default(),
                persisted: None,
            });
        }
        Err(e) => return Err(e),
    };
    info!("Created backup at {}", backup.display());
    let backup = Some(backup);

    let value: Value = match store::read_json(primary) {
        Ok(v) => v,
        Err(e @ Error::MalformedData { .. }) => {
            warn!("{e}; leaving cache as is");
            return Ok(MigrationReport {
                shape: Shape::Unrecognized,
                backup,
                companies: 0,
                tally: Tally::default(),
                persisted: None,
            });
        }
        Err(e) => return Err(e),
    };

    let shape = detect_shape(&value);
    let records = match value {
        Value::Array(records) => records,
        Value::Object(ref map) => {
            info!("Document cache is already in dictionary format");
            return Ok(MigrationReport { shape, backup, companies: map.len(), tally: Tally::default(), persisted: None });
        }
        _ => {
            warn!("Document cache is neither a list nor an object; leaving it as is");
            return Ok(MigrationReport { shape, backup, companies: 0, tally: Tally::default(), persisted: None });
        }
    };

    let (cache, tally) = migrate_legacy(records, mapping);
    let persisted = store::write_json(primary, &cache).map(|_| primary.to_path_buf());
    info!(
        "Converted document cache to dictionary format with {} companies ({} dropped)",
        cache.len(),
        tally.dropped.len()
    );

    Ok(MigrationReport { shape, backup, companies: cache.len(), tally, persisted: Some(persisted) })
}

/// Current-shape loader used by the extractor batch: legacy files must be migrated first.
///
/// Entries inside a company's list are carried as they are. A company whose value
/// is not a list is refused rather than rewritten, since the caller writes the cache back.
pub fn load_current(path: &Path) -> Result<DocumentCache> {
    match store::read_json::<Value>(path) {
        Ok(Value::Object(map)) => to_document_cache(path, map),
        Ok(other) => Err(Error::UnexpectedShape {
            path: path.to_path_buf(),
            found: match detect_shape(&other) {
                Shape::Legacy => "list (run migrate-docs first)",
                _ => "scalar",
            },
        }),
        Err(Error::MissingFile { .. }) => Ok(DocumentCache::new()),
        Err(e) => Err(e),
    }
}

fn to_document_cache(path: &Path, map: Map<String, Value>) -> Result<DocumentCache> {
    map.into_iter()
        .map(|(id, docs)| match docs {
            Value::Array(items) => Ok((id, items)),
            _ => {
                warn!("Company {id} in {} is not a list of documents", path.display());
                Err(Error::UnexpectedShape { path: path.to_path_buf(), found: "non-list company entry" })
            }
        })
        .collect()
}

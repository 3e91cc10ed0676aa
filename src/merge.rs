// src/merge.rs
//! Cache Merger.
//!
//! [`merge_companies`] is pure: keyed sources in precedence order (highest first)
//! plus the Mapping Store in, one keyed dataset out. [`fix_urls`] is the I/O shell
//! around it that reads the data directory and persists the result.
//!
//! Precedence is per record, never per field: the first source holding a key
//! supplies that key's whole record.

use std::collections::HashSet;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{ info, warn };

use crate::config::options::{ DataPaths, ExtractOptions };
use crate::data::{ CompanyRecord, DocumentCache, DocumentRecord, UrlCache };
use crate::error::{ Error, Result };
use crate::store::{ self, LoadStatus, Loaded, Mapping };

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merged {
    pub cache: UrlCache,
    /// Keys contributed by each input source, same order as the inputs.
    pub taken_from: Vec<usize>,
    /// Keys only the Mapping Store knew about.
    pub synthesized: usize,
}

/// Union of all keys; each value from the highest-precedence source that has it;
/// mapping-only ids get `{name, <base>/lending-companies/<id>}`.
pub fn merge_companies(sources: &[&UrlCache], mapping: &Mapping, opts: &ExtractOptions) -> Merged {
    let mut cache = UrlCache::new();
    let mut taken_from = Vec::with_capacity(sources.len());

    for source in sources {
        let mut taken = 0;
        for (id, rec) in source.iter() {
            if !cache.contains_key(id) {
                cache.insert(id.clone(), rec.clone());
                taken += 1;
            }
        }
        taken_from.push(taken);
    }

    let mut synthesized = 0;
    for (id, name) in mapping {
        if !cache.contains_key(id) {
            cache.insert(id.clone(), CompanyRecord::new(name.clone(), opts.profile_url(id)));
            synthesized += 1;
        }
    }

    Merged { cache, taken_from, synthesized }
}

pub struct MergeOutcome {
    pub merged: Merged,
    pub mapping_status: LoadStatus,
    /// Where the merged cache went, or why it was not written. The in-memory
    /// result above is valid either way.
    pub persisted: Result<PathBuf>,
}

/// Existing cache > manual overrides > `extra` (in order) > mapping synthesis,
/// written back over the URL cache file.
///
/// An existing cache that could not be read is never overwritten: the merge still
/// runs without it, but `persisted` carries the read error instead.
pub fn fix_urls(paths: &DataPaths, opts: &ExtractOptions, extra: &[&UrlCache]) -> MergeOutcome {
    let target = paths.url_cache();
    let mapping = store::load_mapping(&paths.mapping());
    let Loaded { value: existing, status: existing_status } = store::load_or_default::<UrlCache>(&target);
    let manual = store::load_or_default::<UrlCache>(&paths.manual_urls()).value;

    let mut sources: Vec<&UrlCache> = vec![&existing, &manual];
    sources.extend_from_slice(extra);

    let merged = merge_companies(&sources, &mapping.value, opts);
    for (id, rec) in &merged.cache {
        if !rec.has_valid_url() {
            warn!("Company {id} has a non-absolute url: {:?}", rec.get("url"));
        }
    }

    let persisted = match existing_status {
        LoadStatus::Malformed(reason) => Err(Error::MalformedData { path: target, reason }),
        LoadStatus::Loaded | LoadStatus::NotFound => store::write_json(&target, &merged.cache).map(|_| target),
    };
    match &persisted {
        Ok(p) => info!("Updated {} with {} companies", p.display(), merged.cache.len()),
        Err(e) => warn!("Merged cache not persisted: {e}"),
    }

    MergeOutcome { merged, mapping_status: mapping.status, persisted }
}

/// Append freshly extracted records to one company's sequence, skipping any whose
/// `url` is already there. Returns the records that were actually new.
pub fn append_documents(
    cache: &mut DocumentCache,
    company_id: &str,
    fresh: impl IntoIterator<Item = DocumentRecord>,
) -> Vec<DocumentRecord> {
    let entries = cache.entry(s!(company_id)).or_default();
    let mut seen: HashSet<String> = entries
        .iter()
        .filter_map(|e| e.get("url").and_then(Value::as_str).map(String::from))
        .collect();

    let mut added = Vec::new();
    for doc in fresh {
        if !seen.insert(doc.url.clone()) {
            continue;
        }
        let doc = match doc.company_id {
            Some(_) => doc,
            None => doc.for_company(company_id),
        };
        entries.push(Value::Object(doc.to_cache_entry()));
        added.push(doc);
    }
    added
}

// src/data.rs
//
// Record types shared by the merger, migrator and extractor.
//
// - CompanyRecord: one entry of the URL cache (`company_id → {name, url}`).
// - DocumentRecord: one document link found on a company page.
// - DocumentCache: current-shape document cache (`company_id → [document objects]`).

use std::collections::BTreeMap;

use serde::{ Deserialize, Serialize };
use serde_json::{ json, Map, Value };
use sha2::{ Digest, Sha256 };
use url::Url;

use crate::config::consts::UNTITLED_DOCUMENT;

/// Kept as the raw JSON it was read as. A record with a null name, a numeric url
/// or fields we have never heard of is written back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyRecord(Value);

impl CompanyRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self(json!({ "name": name.into(), "url": url.into() }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// `url` is either absent/null or an absolute URL with a host.
    pub fn has_valid_url(&self) -> bool {
        match self.0.get("url") {
            None | Some(Value::Null) => true,
            Some(Value::String(u)) => Url::parse(u).map(|p| p.has_host()).unwrap_or(false),
            Some(_) => false,
        }
    }
}

/// URL cache / manual overrides: company_id → record.
pub type UrlCache = BTreeMap<String, CompanyRecord>;

/// Document cache in current shape. Entries stay raw JSON so legacy attributes,
/// and entries that are not even objects, survive a rewrite untouched.
pub type DocumentCache = BTreeMap<String, Vec<Value>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveredVia {
    DirectPdfLink,
    DocumentSection,
    CardSection,
}

/// Created once by extraction (or carried over by migration); never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default = "untitled")]
    pub title: String,
    pub url: String,
    pub discovered_via: DiscoveredVia,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

fn untitled() -> String { s!(UNTITLED_DOCUMENT) }

impl DocumentRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, via: DiscoveredVia) -> Self {
        let title = title.into();
        Self {
            title: if title.trim().is_empty() { untitled() } else { title },
            url: url.into(),
            discovered_via: via,
            company_id: None,
            date: None,
        }
    }

    pub fn for_company(self, company_id: &str) -> Self {
        Self { company_id: Some(s!(company_id)), ..self }
    }

    /// Stable id over `title|url`: hex of the first 16 bytes of SHA-256.
    pub fn id(&self) -> String {
        let mut h = Sha256::new();
        h.update(self.title.as_bytes());
        h.update(b"|");
        h.update(self.url.as_bytes());
        hex::encode(&h.finalize()[..16])
    }

    /// JSON object as stored in the document cache, with `id` attached.
    pub fn to_cache_entry(&self) -> Map<String, Value> {
        let mut obj = match serde_json::to_value(self) {
            Ok(Value::Object(m)) => m,
            _ => Map::new(),
        };
        obj.insert(s!("id"), Value::String(self.id()));
        obj
    }
}

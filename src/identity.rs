// src/identity.rs
//! Company identity resolution.
//!
//! A free-text company name becomes a `company_id` through three ordered steps:
//! 1. case-insensitive exact match against the Mapping Store → [`Resolution::Resolved`]
//! 2. slug of the raw name → [`Resolution::Synthesized`]
//! 3. otherwise → [`Resolution::Dropped`] with the reason
//!
//! The outcome type keeps the path observable; callers never have to infer it
//! from the key they got back.

use std::collections::HashMap;

use crate::core::sanitize::slugify;
use crate::store::Mapping;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the Mapping Store.
    Resolved(String),
    /// Not in the mapping; derived from the name.
    Synthesized(String),
    Dropped(DropReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The record carried no company name at all.
    MissingName,
    /// The name slugified to nothing (e.g. only symbols).
    EmptySlug(String),
}

impl Resolution {
    pub fn company_id(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(id) | Resolution::Synthesized(id) => Some(id),
            Resolution::Dropped(_) => None,
        }
    }
}

/// Name lookup built once per batch from the Mapping Store.
pub struct Resolver<'m> {
    by_name: HashMap<String, &'m str>,
}

impl<'m> Resolver<'m> {
    /// When two ids share a display name, the first in key order wins.
    pub fn new(mapping: &'m Mapping) -> Self {
        let mut by_name = HashMap::with_capacity(mapping.len());
        for (id, name) in mapping {
            by_name.entry(name.to_lowercase()).or_insert(id.as_str());
        }
        Self { by_name }
    }

    pub fn resolve(&self, name: Option<&str>) -> Resolution {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Resolution::Dropped(DropReason::MissingName);
        };
        if let Some(id) = self.by_name.get(&name.to_lowercase()) {
            return Resolution::Resolved(s!(*id));
        }
        let slug = slugify(name);
        if slug.is_empty() {
            Resolution::Dropped(DropReason::EmptySlug(s!(name)))
        } else {
            Resolution::Synthesized(slug)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> Mapping {
        [("acme", "Acme Capital"), ("iuvo-group", "IuvoGroup"), ("zz-dup", "Acme Capital")]
            .into_iter()
            .map(|(k, v)| (s!(k), s!(v)))
            .collect()
    }

    #[test]
    fn mapping_match_ignores_case() {
        let m = mapping();
        let r = Resolver::new(&m);
        assert_eq!(r.resolve(Some("ACME capital")), Resolution::Resolved(s!("acme")));
        // Mapping id wins even when the slug would differ
        assert_eq!(r.resolve(Some("iuvogroup")), Resolution::Resolved(s!("iuvo-group")));
    }

    #[test]
    fn falls_back_to_slug() {
        let m = mapping();
        let r = Resolver::new(&m);
        assert_eq!(r.resolve(Some("Sun Finance")), Resolution::Synthesized(s!("sun-finance")));
    }

    #[test]
    fn drops_unresolvable() {
        let m = Mapping::new();
        let r = Resolver::new(&m);
        assert_eq!(r.resolve(None), Resolution::Dropped(DropReason::MissingName));
        assert_eq!(r.resolve(Some("")), Resolution::Dropped(DropReason::MissingName));
        assert_eq!(r.resolve(Some("???")), Resolution::Dropped(DropReason::EmptySlug(s!("???"))));
        assert_eq!(r.resolve(Some("???")).company_id(), None);
    }

    #[test]
    fn duplicate_names_resolve_to_first_key() {
        let m = mapping();
        let r = Resolver::new(&m);
        assert_eq!(r.resolve(Some("Acme Capital")).company_id(), Some("acme"));
    }
}

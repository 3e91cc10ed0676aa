// src/specs/mod.rs
//! # Page extractors
//!
//! Each module here knows how to read one kind of page and nothing else: HTML in,
//! plain records out.
//!
//! ## What lives here
//! - **Selector choice & precedence**: ordered heuristics, with fallbacks that only run
//!   when the preferred reading finds nothing (companies) or that all run and concatenate
//!   (documents).
//! - **Tolerant matching** through `core::html` helpers (case-insensitive suffixes,
//!   class substrings, whitespace-collapsed text).
//!
//! ## What does **not** live here
//! - Fetching (`core::net`), persistence (`store`), merging (`merge`). Specs take
//!   already-fetched text and the URL it came from.
//!
//! ## Current specs
//! - `documents` – document links on a company profile page.
//! - `companies` – company ids, names and profile URLs from a listing page.
//!
//! Specs are tested offline against inline fixtures.
pub mod companies;
pub mod documents;

// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod identity;
pub mod log;
pub mod merge;
pub mod migrate;
pub mod progress;
pub mod scrape;
pub mod specs;
pub mod store;

pub use error::{ Error, Result };

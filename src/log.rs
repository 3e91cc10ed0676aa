// src/log.rs
// Subscriber setup for the `tracing` macros used throughout the crate.
// Lines carry elapsed time since start, like "0.012345s  INFO lender_cache::merge: ...".
// `RUST_LOG` overrides the level given here.

use std::fs::{ self, OpenOptions };
use std::io;
use std::path::{ Path, PathBuf };
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{ time::uptime, writer::BoxMakeWriter },
    EnvFilter,
};

use crate::config::consts::{ DEBUG_LOG_FILE, STORE_DIR };
use crate::error::Result;

/// `.store/debug.log`, relative to the working directory.
pub fn default_log_file() -> PathBuf {
    Path::new(STORE_DIR).join(DEBUG_LOG_FILE)
}

/// Install the global subscriber. With `file`, lines are appended there instead of stderr.
/// Calling twice is harmless; the second call is ignored.
pub fn init(level: Level, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let (writer, ansi) = match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(f)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(uptime())
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".store").join("debug.log");
        init(Level::DEBUG, Some(&path)).unwrap();
        assert!(path.exists());
    }
}

//! Data loaders: resolve and read files under `data/`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Env var that points loaders at an alternate data directory (tests, tools).
pub const DATA_ROOT_ENV: &str = "ROAMFOLIO_DATA_ROOT";

/// Resolve the data root.
///
/// Order: `ROAMFOLIO_DATA_ROOT` (if it exists), workspace `data/` two levels
/// above this crate, then a crate-local `data/`.
pub fn data_root() -> PathBuf {
    if let Ok(override_root) = std::env::var(DATA_ROOT_ENV) {
        let p = PathBuf::from(override_root);
        if p.is_dir() {
            return p;
        }
    }
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

/// Read a file under `data/` and return its contents.
pub fn read_text(rel: impl AsRef<Path>) -> Result<String> {
    let path = data_root().join(rel);
    fs::read_to_string(&path).with_context(|| format!("read data: {}", path.display()))
}

/// Read an optional file under `data/`; `Ok(None)` when it does not exist.
pub fn read_optional(rel: impl AsRef<Path>) -> Result<Option<String>> {
    let path = data_root().join(rel);
    if !path.is_file() {
        return Ok(None);
    }
    let txt = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    Ok(Some(txt))
}

#![deny(warnings)]

//! Season snapshots on disk and in memory.
//!
//! JSON is the readable save format; bincode is the compact one used for
//! in-memory copies and `--bincode` saves.

use season_core::SeasonState;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Returns the default path used for local saves.
pub fn default_snapshot_path() -> &'static str {
    "./saves/season.json"
}

fn ensure_parent(path: &Path) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `state` as pretty JSON, creating parent directories as needed.
pub fn save_json<P: AsRef<Path>>(path: P, state: &SeasonState) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let text = serde_json::to_string_pretty(state)?;
    fs::write(path, text)?;
    info!(path = %path.display(), matches = state.matches.len(), "snapshot written");
    Ok(())
}

pub fn load_json<P: AsRef<Path>>(path: P) -> Result<SeasonState, SnapshotError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn to_bytes(state: &SeasonState) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serialize(state)?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<SeasonState, SnapshotError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Write `state` as bincode, creating parent directories as needed.
pub fn save_bincode<P: AsRef<Path>>(path: P, state: &SeasonState) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    fs::write(path, to_bytes(state)?)?;
    info!(path = %path.display(), matches = state.matches.len(), "snapshot written");
    Ok(())
}

pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<SeasonState, SnapshotError> {
    from_bytes(&fs::read(path)?)
}

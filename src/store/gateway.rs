//! Whole-collection file persistence.
//!
//! Each collection (players, alliances, the card catalog) lives in one file
//! as an array of records. Every save rewrites the whole file: the new
//! content goes to a sibling temp file which is then renamed over the old
//! one, so a crash mid-write leaves the previous version intact.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Keyed;
use crate::error::StoreError;

/// On-disk encoding of a collection file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// bincode-encoded `Vec`.
    Bincode,
}

impl StoreFormat {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Bincode => "bin",
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFormat::Json => f.write_str("json"),
            StoreFormat::Bincode => f.write_str("bincode"),
        }
    }
}

impl FromStr for StoreFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(StoreFormat::Json),
            "bincode" | "bin" => Ok(StoreFormat::Bincode),
            other => Err(format!("unknown store format: {other}")),
        }
    }
}

/// Read every record of a collection file.
pub fn read_collection<T: DeserializeOwned>(
    path: &Path,
    format: StoreFormat,
) -> Result<Vec<T>, StoreError> {
    let bytes = fs::read(path)?;
    let records = match format {
        StoreFormat::Json => serde_json::from_slice(&bytes)?,
        StoreFormat::Bincode => bincode::deserialize(&bytes)?,
    };
    Ok(records)
}

/// Load a keyed collection. A missing file is an empty collection.
///
/// If two records share a key, the later one wins.
pub fn load_all<T>(path: &Path, format: StoreFormat) -> Result<FxHashMap<T::Key, T>, StoreError>
where
    T: Keyed + DeserializeOwned,
{
    if !path.exists() {
        return Ok(FxHashMap::default());
    }
    let records: Vec<T> = read_collection(path, format)?;
    Ok(records.into_iter().map(|r| (r.key(), r)).collect())
}

/// Replace a collection file with `values`.
pub fn save_all<T: Serialize>(
    path: &Path,
    format: StoreFormat,
    values: &[T],
) -> Result<(), StoreError> {
    let bytes = match format {
        StoreFormat::Json => serde_json::to_vec_pretty(values)?,
        StoreFormat::Bincode => bincode::serialize(values)?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

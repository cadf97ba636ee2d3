//! Immutable code-to-set lookup table with a local disk cache.
//!
//! Sets are append-only reference data: the index is built once per process
//! and never mutated afterwards. A changed upstream catalog is only observed
//! after a restart.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::config;
use crate::error::{CardvaultError, Result};
use crate::source::{CardSource, SourceSet};

/// Reference data for one set.
#[derive(Debug, Clone, PartialEq)]
pub struct SetInfo {
    pub code: String,
    pub name: String,
    pub release_date: Option<NaiveDate>,
}

/// O(1) lookup from set code to [`SetInfo`], keyed case-insensitively
/// (codes are uppercased on insert and lookup).
#[derive(Debug, Default)]
pub struct SetIndex {
    by_code: HashMap<String, SetInfo>,
}

impl SetIndex {
    /// Build an index from raw source records.
    ///
    /// Release dates that fail to parse as `YYYY-MM-DD` are treated as
    /// absent, same as sets that carry no date at all.
    pub fn from_sets(sets: Vec<SourceSet>) -> Self {
        let mut by_code = HashMap::with_capacity(sets.len());
        for s in sets {
            let release_date = s.release_date.as_deref().and_then(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|e| log::warn!("set {}: bad release date {:?}: {}", s.code, d, e))
                    .ok()
            });
            let code = s.code.to_uppercase();
            by_code.insert(
                code.clone(),
                SetInfo {
                    code,
                    name: s.name,
                    release_date,
                },
            );
        }
        Self { by_code }
    }

    /// Load the set catalog from the local cache, falling back to the
    /// source when no usable cache file exists.
    ///
    /// A corrupt cache file is removed and re-fetched. In offline mode a
    /// missing cache is an error instead of a fetch.
    pub fn load(source: &dyn CardSource, cache_dir: &Path, offline: bool) -> Result<Self> {
        let cache_file = cache_dir.join(config::SETS_CACHE_FILE);

        if cache_file.exists() {
            let contents = fs::read_to_string(&cache_file)?;
            match serde_json::from_str::<Vec<SourceSet>>(&contents) {
                Ok(sets) => {
                    log::debug!("loaded {} sets from {}", sets.len(), cache_file.display());
                    return Ok(Self::from_sets(sets));
                }
                Err(e) => {
                    log::warn!(
                        "corrupt set cache {}: {} -- removing",
                        cache_file.display(),
                        e
                    );
                    let _ = fs::remove_file(&cache_file);
                }
            }
        }

        if offline {
            return Err(CardvaultError::NotFound(format!(
                "set cache {} not present and offline mode is enabled",
                cache_file.display()
            )));
        }

        let sets = source.sets()?;
        fs::create_dir_all(cache_dir)?;
        fs::write(&cache_file, serde_json::to_string(&sets)?)?;
        log::debug!("cached {} sets to {}", sets.len(), cache_file.display());
        Ok(Self::from_sets(sets))
    }

    /// Look up a set by code. Unknown codes simply return `None`; they are
    /// tolerated everywhere downstream.
    pub fn get(&self, code: &str) -> Option<&SetInfo> {
        self.by_code.get(&code.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

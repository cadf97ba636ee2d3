use std::path::PathBuf;

pub const API_BASE: &str = "https://api.magicthegathering.io/v1";
pub const CARDS_ENDPOINT: &str = "cards";
pub const SETS_ENDPOINT: &str = "sets";

/// Page size used when paging through `/cards` results. The API caps
/// pageSize at 100.
pub const PAGE_SIZE: usize = 100;

/// Filename of the locally cached set list.
pub const SETS_CACHE_FILE: &str = "sets.json";

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("cardvault")
    } else {
        PathBuf::from(".cardvault-cache")
    }
}

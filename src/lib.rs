//! Catalog and deck-building core for Magic: The Gathering.
//!
//! Cards, decks and quantity-tracked deck membership are stored in an
//! embedded DuckDB database; card data can be looked up from the
//! magicthegathering.io API and normalized to one record per distinct
//! card name.
//!
//! # Quick start
//!
//! ```no_run
//! use cardvault::Cardvault;
//! use cardvault::catalog::LatestOptions;
//! use cardvault::models::{DeckFormat, NewDeck};
//!
//! let vault = Cardvault::builder().build().unwrap();
//!
//! // Look up the most recent printing of each "Liliana" card
//! let printings = vault
//!     .catalog()
//!     .latest_printings("Liliana", &LatestOptions::default())
//!     .unwrap();
//!
//! // Build a deck
//! let deck = vault
//!     .decks()
//!     .create(&NewDeck {
//!         title: "Mono Black Control".to_string(),
//!         format: DeckFormat::Modern,
//!         description: None,
//!     })
//!     .unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod sets;
pub mod source;
pub mod sql_builder;
pub mod store;

pub use error::{CardvaultError, Result};
pub use sets::{SetIndex, SetInfo};
pub use source::{CardSource, MtgApiClient};
pub use sql_builder::SqlBuilder;
pub use store::Store;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CardvaultBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Cardvault`] instance.
///
/// Use [`Cardvault::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardvaultBuilder::build).
pub struct CardvaultBuilder {
    db_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    api_base: String,
    source: Option<Box<dyn CardSource>>,
}

impl Default for CardvaultBuilder {
    fn default() -> Self {
        Self {
            db_path: None,
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(30),
            api_base: config::API_BASE.to_string(),
            source: None,
        }
    }
}

impl CardvaultBuilder {
    /// Persist the database to a file instead of the default in-memory
    /// store.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom directory for the cached set catalog.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/cardvault` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the set catalog is only loaded from the local cache
    /// and never fetched. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for card-source calls.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the card-source API base URL.
    pub fn api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    /// Inject a custom card source, replacing the HTTP client entirely.
    /// Intended for tests and alternative backends.
    pub fn source(mut self, source: Box<dyn CardSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the vault: open the store, apply the schema, and load the set
    /// index (from the local cache when possible).
    ///
    /// The set index is built once here and treated as immutable for the
    /// process lifetime; restart to pick up new sets.
    pub fn build(self) -> Result<Cardvault> {
        let store = match &self.db_path {
            Some(path) => Store::open(path)?,
            None => Store::open_in_memory()?,
        };

        let source: Box<dyn CardSource> = match self.source {
            Some(s) => s,
            None => Box::new(MtgApiClient::new(&self.api_base, self.timeout)?),
        };

        let cache_dir = self.cache_dir.unwrap_or_else(config::default_cache_dir);
        let set_index = SetIndex::load(source.as_ref(), &cache_dir, self.offline)?;

        Ok(Cardvault {
            store,
            source,
            set_index,
        })
    }
}

// ---------------------------------------------------------------------------
// Cardvault
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`Store`], the external [`CardSource`] and the immutable
/// [`SetIndex`], and exposes domain interfaces as lightweight borrowing
/// wrappers.
pub struct Cardvault {
    store: Store,
    source: Box<dyn CardSource>,
    set_index: SetIndex,
}

impl Cardvault {
    /// Create a new builder for configuring the vault.
    pub fn builder() -> CardvaultBuilder {
        CardvaultBuilder::default()
    }

    // -- Domain accessors --------------------------------------------------

    /// Access the card CRUD interface.
    pub fn cards(&self) -> queries::cards::CardQuery<'_> {
        queries::cards::CardQuery::new(&self.store)
    }

    /// Access the deck CRUD and membership interface.
    pub fn decks(&self) -> queries::decks::DeckQuery<'_> {
        queries::decks::DeckQuery::new(&self.store)
    }

    /// Access the catalog normalizer over the external card source.
    pub fn catalog(&self) -> catalog::CatalogQuery<'_> {
        catalog::CatalogQuery::new(self.source.as_ref(), &self.set_index)
    }

    // -- Escape hatches ----------------------------------------------------

    /// The preloaded set lookup table.
    pub fn set_index(&self) -> &SetIndex {
        &self.set_index
    }

    /// The underlying store, for raw SQL access.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl fmt::Debug for Cardvault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cardvault")
            .field("set_index", &self.set_index)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Cardvault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self.cards().count().unwrap_or(0);
        let decks = self.decks().count().unwrap_or(0);
        write!(
            f,
            "Cardvault(cards={}, decks={}, sets={})",
            cards,
            decks,
            self.set_index.len()
        )
    }
}

//! External card-data source: trait seam plus the magicthegathering.io client.
//!
//! The API is treated as an opaque read-only catalog. Queries are blocking
//! and carry no retry or backoff; failures propagate to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Wire models
// ---------------------------------------------------------------------------

/// One printing record as returned by the external source.
///
/// The same card name recurs across sets (reprints), and a double-faced
/// physical card yields two printing rows sharing a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePrinting {
    pub name: String,
    /// For double-faced cards, the names of both linked faces; the source
    /// returns both printing rows when queried by either name.
    #[serde(default)]
    pub names: Vec<String>,
    pub mana_cost: Option<String>,
    #[serde(rename = "type")]
    pub type_line: String,
    #[serde(default)]
    pub subtypes: Vec<String>,
    pub text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    pub flavor: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "set")]
    pub set_code: String,
    pub set_name: Option<String>,
}

/// One set record as returned by the external source. `release_date` is
/// absent for some promotional and online-only sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSet {
    pub code: String,
    pub name: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardsResponse {
    #[serde(default)]
    cards: Vec<SourcePrinting>,
}

#[derive(Debug, Deserialize)]
struct SetsResponse {
    #[serde(default)]
    sets: Vec<SourceSet>,
}

// ---------------------------------------------------------------------------
// CardSource
// ---------------------------------------------------------------------------

/// Read-only access to the external card catalog.
///
/// The catalog normalizer works against this trait, so tests can inject a
/// fake source instead of the live API.
pub trait CardSource {
    /// All printings whose name matches `name`. The source, not the caller,
    /// defines "matches" (the live API filters case-insensitively and by
    /// substring).
    fn printings_named(&self, name: &str) -> Result<Vec<SourcePrinting>>;

    /// Printings matching `name` within a specific set. `set_code` takes
    /// precedence over `set_name` when both are given.
    fn printings_in_set(
        &self,
        name: &str,
        set_code: Option<&str>,
        set_name: Option<&str>,
    ) -> Result<Vec<SourcePrinting>>;

    /// The full set catalog.
    fn sets(&self) -> Result<Vec<SourceSet>>;
}

// ---------------------------------------------------------------------------
// MtgApiClient
// ---------------------------------------------------------------------------

/// Blocking client for the magicthegathering.io v1 API.
pub struct MtgApiClient {
    client: reqwest::blocking::Client,
    base: String,
}

impl MtgApiClient {
    /// Create a client against the given base URL (e.g.
    /// `https://api.magicthegathering.io/v1`).
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Page through an endpoint, collecting `pageSize`-sized chunks until a
    /// short page signals the end.
    fn fetch_cards(&self, query: &[(&str, String)]) -> Result<Vec<SourcePrinting>> {
        let url = format!("{}/{}", self.base, config::CARDS_ENDPOINT);
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            log::debug!("GET {} page {}", url, page);
            let resp = self
                .client
                .get(&url)
                .query(query)
                .query(&[
                    ("page", page.to_string()),
                    ("pageSize", config::PAGE_SIZE.to_string()),
                ])
                .send()?
                .error_for_status()?;

            let body: CardsResponse = resp.json()?;
            let fetched = body.cards.len();
            all.extend(body.cards);

            if fetched < config::PAGE_SIZE {
                break;
            }
            page += 1;
        }

        log::debug!("fetched {} printings", all.len());
        Ok(all)
    }
}

impl CardSource for MtgApiClient {
    fn printings_named(&self, name: &str) -> Result<Vec<SourcePrinting>> {
        self.fetch_cards(&[("name", name.to_string())])
    }

    fn printings_in_set(
        &self,
        name: &str,
        set_code: Option<&str>,
        set_name: Option<&str>,
    ) -> Result<Vec<SourcePrinting>> {
        let mut query = vec![("name", name.to_string())];
        if let Some(code) = set_code {
            query.push(("set", code.to_string()));
        } else if let Some(sn) = set_name {
            query.push(("setName", sn.to_string()));
        }
        self.fetch_cards(&query)
    }

    fn sets(&self) -> Result<Vec<SourceSet>> {
        let url = format!("{}/{}", self.base, config::SETS_ENDPOINT);
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            log::debug!("GET {} page {}", url, page);
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("page", page.to_string()),
                    ("pageSize", config::PAGE_SIZE.to_string()),
                ])
                .send()?
                .error_for_status()?;

            let body: SetsResponse = resp.json()?;
            let fetched = body.sets.len();
            all.extend(body.sets);

            if fetched < config::PAGE_SIZE {
                break;
            }
            page += 1;
        }

        log::info!("fetched {} sets from the card source", all.len());
        Ok(all)
    }
}

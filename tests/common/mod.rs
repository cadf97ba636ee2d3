//! Shared test fixtures: an in-memory store, model builders, and a fake
//! card source with a small set catalog.
#![allow(dead_code)]

use cardvault::error::Result;
use cardvault::models::{CardType, DeckFormat, NewCard, NewDeck};
use cardvault::source::{CardSource, SourcePrinting, SourceSet};
use cardvault::{SetIndex, Store};

/// Route crate log output through the test harness. Safe to call from
/// every test; only the first call installs the logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fresh in-memory store with the schema applied.
pub fn setup_store() -> Store {
    init_logging();
    Store::open_in_memory().unwrap()
}

/// Minimal card input: everything optional left empty.
pub fn new_card(name: &str, primary_type: CardType, set_code: &str) -> NewCard {
    NewCard {
        name: name.to_string(),
        mana_cost: None,
        primary_type,
        secondary_types: None,
        text: None,
        power: None,
        toughness: None,
        loyalty: None,
        rarity: None,
        artist: None,
        flavor: None,
        image_url: None,
        set_code: set_code.to_string(),
    }
}

pub fn new_deck(title: &str, format: DeckFormat) -> NewDeck {
    NewDeck {
        title: title.to_string(),
        format,
        description: None,
    }
}

/// Minimal printing record for the fake source.
pub fn printing(name: &str, set_code: &str, type_line: &str) -> SourcePrinting {
    SourcePrinting {
        name: name.to_string(),
        names: Vec::new(),
        mana_cost: None,
        type_line: type_line.to_string(),
        subtypes: Vec::new(),
        text: None,
        power: None,
        toughness: None,
        loyalty: None,
        rarity: None,
        artist: None,
        flavor: None,
        image_url: None,
        set_code: set_code.to_string(),
        set_name: None,
    }
}

pub fn set(code: &str, name: &str, release_date: Option<&str>) -> SourceSet {
    SourceSet {
        code: code.to_string(),
        name: name.to_string(),
        release_date: release_date.map(|d| d.to_string()),
    }
}

/// The set catalog used across catalog tests.
pub fn sample_sets() -> Vec<SourceSet> {
    vec![
        set("ISD", "Innistrad", Some("2011-09-30")),
        set("SOI", "Shadows over Innistrad", Some("2016-04-08")),
        set("EMN", "Eldritch Moon", Some("2016-07-22")),
        set("AKH", "Amonkhet", Some("2017-04-28")),
        set("M21", "Core Set 2021", Some("2020-07-03")),
        // Promotional set without a release date
        set("PANA", "MTG Arena Promos", None),
    ]
}

pub fn sample_set_index() -> SetIndex {
    SetIndex::from_sets(sample_sets())
}

// ---------------------------------------------------------------------------
// FakeSource
// ---------------------------------------------------------------------------

/// In-memory [`CardSource`] mimicking the live API's matching behavior:
/// name queries match case-insensitively by substring, and a double-faced
/// printing also matches queries for either linked face name.
pub struct FakeSource {
    pub printings: Vec<SourcePrinting>,
    pub sets: Vec<SourceSet>,
}

impl FakeSource {
    pub fn new(printings: Vec<SourcePrinting>) -> Self {
        init_logging();
        Self {
            printings,
            sets: sample_sets(),
        }
    }
}

fn name_matches(p: &SourcePrinting, query: &str) -> bool {
    let q = query.to_lowercase();
    p.name.to_lowercase().contains(&q) || p.names.iter().any(|n| n.eq_ignore_ascii_case(query))
}

impl CardSource for FakeSource {
    fn printings_named(&self, name: &str) -> Result<Vec<SourcePrinting>> {
        Ok(self
            .printings
            .iter()
            .filter(|p| name_matches(p, name))
            .cloned()
            .collect())
    }

    fn printings_in_set(
        &self,
        name: &str,
        set_code: Option<&str>,
        set_name: Option<&str>,
    ) -> Result<Vec<SourcePrinting>> {
        Ok(self
            .printings
            .iter()
            .filter(|p| name_matches(p, name))
            .filter(|p| {
                if let Some(code) = set_code {
                    p.set_code.eq_ignore_ascii_case(code)
                } else if let Some(sn) = set_name {
                    p.set_name
                        .as_deref()
                        .map(|n| n.eq_ignore_ascii_case(sn))
                        .unwrap_or(false)
                } else {
                    true
                }
            })
            .cloned()
            .collect())
    }

    fn sets(&self) -> Result<Vec<SourceSet>> {
        Ok(self.sets.clone())
    }
}

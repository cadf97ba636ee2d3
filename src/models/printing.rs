//! Records returned by the catalog normalizer.
//!
//! These are explicit structured types rather than loose JSON maps, so the
//! field set a caller receives is checked at compile time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PrintingSummary — one name, its most recent printing
// ---------------------------------------------------------------------------

/// The latest (or alphabetically selected) printing of a distinct card
/// name, as returned by `latest_printings`.
///
/// `set_name` and `release_date` are `None` when the printing's set code
/// is absent from the set index or the set has no release date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintingSummary {
    pub name: String,
    pub set_code: String,
    pub set_name: Option<String>,
    pub type_line: String,
    pub mana_cost: Option<String>,
    pub release_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// CardFace / CardFaces — single- and double-faced lookup results
// ---------------------------------------------------------------------------

/// One face of a physical card as fetched from the external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    pub set_code: String,
    pub set_name: Option<String>,
    pub type_line: String,
    pub subtypes: Vec<String>,
    pub mana_cost: Option<String>,
    pub text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub rarity: Option<String>,
    pub image_url: Option<String>,
}

/// Result of a name+set lookup. Single-faced cards have `back: None`;
/// double-faced cards carry both faces, front first as returned by the
/// source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFaces {
    pub front: CardFace,
    pub back: Option<CardFace>,
}

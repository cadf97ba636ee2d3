use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardvaultError;
use crate::models::card::Card;

// ---------------------------------------------------------------------------
// DeckFormat — the closed list of constructed formats
// ---------------------------------------------------------------------------

/// Game format a deck is built for. Stored in the database as its display
/// string. At most one deck may exist per format (enforced by the deck
/// queries, mirrored by a UNIQUE constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckFormat {
    Standard,
    Modern,
    Legacy,
    Vintage,
    Jumpstart,
    Commander,
    Premodern,
    Pioneer,
    Historic,
    Brawl,
    Pauper,
    Frontier,
    #[serde(rename = "Old School")]
    OldSchool,
    Singleton,
    #[serde(rename = "Two-Headed Giant")]
    TwoHeadedGiant,
    Oathbreaker,
    #[serde(rename = "Momir Basic")]
    MomirBasic,
    Peasant,
    #[serde(rename = "Canadian Highlander")]
    CanadianHighlander,
    #[serde(rename = "Tiny Leaders")]
    TinyLeaders,
    Epic,
    Conspiracy,
    Planechase,
    Archenemy,
    Vanguard,
    Other,
}

impl DeckFormat {
    pub const ALL: [DeckFormat; 26] = [
        DeckFormat::Standard,
        DeckFormat::Modern,
        DeckFormat::Legacy,
        DeckFormat::Vintage,
        DeckFormat::Jumpstart,
        DeckFormat::Commander,
        DeckFormat::Premodern,
        DeckFormat::Pioneer,
        DeckFormat::Historic,
        DeckFormat::Brawl,
        DeckFormat::Pauper,
        DeckFormat::Frontier,
        DeckFormat::OldSchool,
        DeckFormat::Singleton,
        DeckFormat::TwoHeadedGiant,
        DeckFormat::Oathbreaker,
        DeckFormat::MomirBasic,
        DeckFormat::Peasant,
        DeckFormat::CanadianHighlander,
        DeckFormat::TinyLeaders,
        DeckFormat::Epic,
        DeckFormat::Conspiracy,
        DeckFormat::Planechase,
        DeckFormat::Archenemy,
        DeckFormat::Vanguard,
        DeckFormat::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeckFormat::Standard => "Standard",
            DeckFormat::Modern => "Modern",
            DeckFormat::Legacy => "Legacy",
            DeckFormat::Vintage => "Vintage",
            DeckFormat::Jumpstart => "Jumpstart",
            DeckFormat::Commander => "Commander",
            DeckFormat::Premodern => "Premodern",
            DeckFormat::Pioneer => "Pioneer",
            DeckFormat::Historic => "Historic",
            DeckFormat::Brawl => "Brawl",
            DeckFormat::Pauper => "Pauper",
            DeckFormat::Frontier => "Frontier",
            DeckFormat::OldSchool => "Old School",
            DeckFormat::Singleton => "Singleton",
            DeckFormat::TwoHeadedGiant => "Two-Headed Giant",
            DeckFormat::Oathbreaker => "Oathbreaker",
            DeckFormat::MomirBasic => "Momir Basic",
            DeckFormat::Peasant => "Peasant",
            DeckFormat::CanadianHighlander => "Canadian Highlander",
            DeckFormat::TinyLeaders => "Tiny Leaders",
            DeckFormat::Epic => "Epic",
            DeckFormat::Conspiracy => "Conspiracy",
            DeckFormat::Planechase => "Planechase",
            DeckFormat::Archenemy => "Archenemy",
            DeckFormat::Vanguard => "Vanguard",
            DeckFormat::Other => "Other",
        }
    }
}

impl fmt::Display for DeckFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeckFormat {
    type Err = CardvaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeckFormat::ALL
            .iter()
            .copied()
            .find(|fmt| fmt.as_str() == s)
            .ok_or_else(|| CardvaultError::InvalidArgument(format!("unknown deck format: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

/// A deck row. Card membership lives entirely in the `deck_cards` join
/// table; see [`DeckEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub title: String,
    pub format: DeckFormat,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a deck.
#[derive(Debug, Clone)]
pub struct NewDeck {
    pub title: String,
    pub format: DeckFormat,
    pub description: Option<String>,
}

/// Partial update for a deck. `None` fields are left unchanged;
/// `updated_at` is always bumped.
#[derive(Debug, Clone, Default)]
pub struct DeckPatch {
    pub title: Option<String>,
    pub format: Option<DeckFormat>,
    pub description: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// DeckEntry
// ---------------------------------------------------------------------------

/// One (card, quantity) pair from a deck's membership join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: Card,
    pub quantity: i64,
}

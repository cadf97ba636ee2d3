use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardvaultError;
use crate::models::printing::CardFace;

// ---------------------------------------------------------------------------
// CardType — the closed list of primary card types
// ---------------------------------------------------------------------------

/// Primary card type. Stored in the database as its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Land,
    Creature,
    Enchantment,
    Artifact,
    Planeswalker,
    Sorcery,
    Instant,
    Battle,
    Tribal,
    Conspiracy,
    Plane,
    Scheme,
    Vanguard,
}

impl CardType {
    pub const ALL: [CardType; 13] = [
        CardType::Land,
        CardType::Creature,
        CardType::Enchantment,
        CardType::Artifact,
        CardType::Planeswalker,
        CardType::Sorcery,
        CardType::Instant,
        CardType::Battle,
        CardType::Tribal,
        CardType::Conspiracy,
        CardType::Plane,
        CardType::Scheme,
        CardType::Vanguard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Land => "Land",
            CardType::Creature => "Creature",
            CardType::Enchantment => "Enchantment",
            CardType::Artifact => "Artifact",
            CardType::Planeswalker => "Planeswalker",
            CardType::Sorcery => "Sorcery",
            CardType::Instant => "Instant",
            CardType::Battle => "Battle",
            CardType::Tribal => "Tribal",
            CardType::Conspiracy => "Conspiracy",
            CardType::Plane => "Plane",
            CardType::Scheme => "Scheme",
            CardType::Vanguard => "Vanguard",
        }
    }

    /// Extract the primary type from a full type line such as
    /// `"Legendary Creature — Angel"`. The first recognized type word in
    /// the line wins, so supertypes like "Legendary" are skipped and a
    /// multi-type line like `"Artifact Creature — Golem"` resolves to
    /// the leading type.
    pub fn from_type_line(type_line: &str) -> Option<CardType> {
        type_line
            .split([' ', '—', '/'])
            .find_map(|w| CardType::ALL.iter().copied().find(|t| t.as_str() == w))
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = CardvaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CardvaultError::InvalidArgument(format!("unknown card type: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Card — a locally stored card printing
// ---------------------------------------------------------------------------

/// A card printing persisted in the `cards` table.
///
/// Names are not unique: reprints share a name across sets, and a
/// double-faced physical card is stored as two rows (front and back).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub mana_cost: Option<String>,
    pub primary_type: CardType,
    pub secondary_types: Option<String>,
    pub text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    pub flavor: Option<String>,
    pub image_url: Option<String>,
    pub set_code: String,
    pub created_at: String,
}

/// Input for creating (or fully updating) a card row. `id` and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub mana_cost: Option<String>,
    pub primary_type: CardType,
    pub secondary_types: Option<String>,
    pub text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    pub flavor: Option<String>,
    pub image_url: Option<String>,
    pub set_code: String,
}

impl NewCard {
    /// Build a card row from a fetched face, for callers that ingest
    /// catalog lookups into local storage. Returns `None` when the face's
    /// type line carries no recognizable primary type.
    pub fn from_face(face: &CardFace) -> Option<NewCard> {
        let primary_type = CardType::from_type_line(&face.type_line)?;
        Some(NewCard {
            name: face.name.clone(),
            mana_cost: face.mana_cost.clone(),
            primary_type,
            secondary_types: if face.subtypes.is_empty() {
                None
            } else {
                Some(face.subtypes.join(" "))
            },
            text: face.text.clone(),
            power: face.power.clone(),
            toughness: face.toughness.clone(),
            loyalty: face.loyalty.clone(),
            rarity: face.rarity.clone(),
            artist: None,
            flavor: None,
            image_url: face.image_url.clone(),
            set_code: face.set_code.clone(),
        })
    }
}

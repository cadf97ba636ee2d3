pub mod card;
pub mod deck;
pub mod printing;

pub use card::{Card, CardType, NewCard};
pub use deck::{Deck, DeckEntry, DeckFormat, DeckPatch, NewDeck};
pub use printing::{CardFace, CardFaces, PrintingSummary};

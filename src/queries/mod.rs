pub mod cards;
pub mod decks;

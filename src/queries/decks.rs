//! Deck CRUD and quantity-tracked card membership.
//!
//! Membership lives in the `deck_cards` join table: one row per
//! (deck, card) pair with quantity >= 1. All read-then-write mutations run
//! inside a store transaction so concurrent modification of the same pair
//! cannot lose updates.

use duckdb::ToSql;

use crate::error::{CardvaultError, Result};
use crate::models::{Card, Deck, DeckEntry, DeckFormat, DeckPatch, NewDeck};
use crate::sql_builder::SqlBuilder;
use crate::store::{self, Store};

/// Query interface for decks and their card membership.
pub struct DeckQuery<'a> {
    store: &'a Store,
}

impl<'a> DeckQuery<'a> {
    /// Create a new `DeckQuery` bound to the given store.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // -- Create ------------------------------------------------------------

    /// Create a deck. At most one deck may exist per format; a second deck
    /// in an occupied format is rejected with `Conflict` before any insert.
    pub fn create(&self, new: &NewDeck) -> Result<Deck> {
        self.store.transaction(|tx| {
            if format_taken(tx, new.format, None)? {
                return Err(CardvaultError::Conflict(format!(
                    "a deck already exists for format {}",
                    new.format
                )));
            }

            let id = tx.next_id("deck_ids")?;
            let now = store::timestamp();
            let format = new.format.as_str();

            tx.execute(
                "INSERT INTO decks (id, title, format, description, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                &[
                    &id as &dyn ToSql,
                    &new.title,
                    &format,
                    &new.description,
                    &now,
                    &now,
                ],
            )?;

            fetch_deck(tx, id)?
                .ok_or_else(|| CardvaultError::NotFound(format!("deck {} after insert", id)))
        })
    }

    // -- Read --------------------------------------------------------------

    /// Retrieve a single deck by id.
    pub fn get(&self, id: i64) -> Result<Option<Deck>> {
        fetch_deck(self.store, id)
    }

    /// Retrieve the deck built for a format, if any.
    pub fn get_by_format(&self, format: DeckFormat) -> Result<Option<Deck>> {
        let (sql, params) = SqlBuilder::new("decks")
            .where_eq("format", format.as_str())
            .limit(1)
            .build();
        let decks: Vec<Deck> = self.store.query_into(&sql, &params)?;
        Ok(decks.into_iter().next())
    }

    /// List all decks in stable id order.
    pub fn list(&self) -> Result<Vec<Deck>> {
        let (sql, params) = SqlBuilder::new("decks").order_by(&["id ASC"]).build();
        self.store.query_into(&sql, &params)
    }

    /// Count all decks.
    pub fn count(&self) -> Result<i64> {
        let value = self.store.query_scalar("SELECT COUNT(*) FROM decks", &[])?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    // -- Update ------------------------------------------------------------

    /// Apply a partial update. A format change re-checks the one-deck-per-
    /// format invariant; `updated_at` is always bumped.
    pub fn update(&self, id: i64, patch: &DeckPatch) -> Result<Deck> {
        self.store.transaction(|tx| {
            let current = fetch_deck(tx, id)?
                .ok_or_else(|| CardvaultError::NotFound(format!("deck {}", id)))?;

            let format = patch.format.unwrap_or(current.format);
            if format != current.format && format_taken(tx, format, Some(id))? {
                return Err(CardvaultError::Conflict(format!(
                    "a deck already exists for format {}",
                    format
                )));
            }

            let title = patch.title.clone().unwrap_or(current.title);
            let description = match &patch.description {
                Some(d) => d.clone(),
                None => current.description,
            };
            let updated_at = store::timestamp();
            let format_str = format.as_str();

            tx.execute(
                "UPDATE decks SET title = ?, format = ?, description = ?, updated_at = ? \
                 WHERE id = ?",
                &[
                    &title as &dyn ToSql,
                    &format_str,
                    &description,
                    &updated_at,
                    &id,
                ],
            )?;

            fetch_deck(tx, id)?.ok_or_else(|| CardvaultError::NotFound(format!("deck {}", id)))
        })
    }

    // -- Delete ------------------------------------------------------------

    /// Delete a deck, cascading to all its membership rows.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.store.transaction(|tx| {
            tx.execute("DELETE FROM deck_cards WHERE deck_id = ?", &[&id as &dyn ToSql])?;
            let changed = tx.execute("DELETE FROM decks WHERE id = ?", &[&id as &dyn ToSql])?;
            if changed == 0 {
                return Err(CardvaultError::NotFound(format!("deck {}", id)));
            }
            Ok(())
        })
    }

    // -- Membership --------------------------------------------------------

    /// Add `quantity` copies of a card to a deck.
    ///
    /// Increments the existing (deck, card) row when present, inserts a new
    /// one otherwise, so the pair stays unique. Returns the resulting
    /// quantity. Non-positive quantities are rejected before any mutation.
    pub fn add_card(&self, deck_id: i64, card_id: i64, quantity: i64) -> Result<i64> {
        if quantity <= 0 {
            return Err(CardvaultError::InvalidArgument(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        self.store.transaction(|tx| {
            if fetch_deck(tx, deck_id)?.is_none() {
                return Err(CardvaultError::NotFound(format!("deck {}", deck_id)));
            }
            if !card_exists(tx, card_id)? {
                return Err(CardvaultError::NotFound(format!("card {}", card_id)));
            }

            match membership_quantity(tx, deck_id, card_id)? {
                Some(existing) => {
                    let total = existing + quantity;
                    tx.execute(
                        "UPDATE deck_cards SET quantity = ? WHERE deck_id = ? AND card_id = ?",
                        &[&total as &dyn ToSql, &deck_id, &card_id],
                    )?;
                    Ok(total)
                }
                None => {
                    tx.execute(
                        "INSERT INTO deck_cards (deck_id, card_id, quantity) VALUES (?, ?, ?)",
                        &[&deck_id as &dyn ToSql, &card_id, &quantity],
                    )?;
                    Ok(quantity)
                }
            }
        })
    }

    /// Remove `quantity` copies of a card from a deck.
    ///
    /// Deletes the membership row when the count would drop to zero or
    /// below; returns the remaining quantity. Removing a card that is not
    /// in the deck is a `NotFound` error, not a silent no-op.
    pub fn remove_card(&self, deck_id: i64, card_id: i64, quantity: i64) -> Result<i64> {
        if quantity <= 0 {
            return Err(CardvaultError::InvalidArgument(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        self.store.transaction(|tx| {
            let existing = membership_quantity(tx, deck_id, card_id)?.ok_or_else(|| {
                CardvaultError::NotFound(format!(
                    "card {} is not in deck {}",
                    card_id, deck_id
                ))
            })?;

            let remaining = existing - quantity;
            if remaining <= 0 {
                tx.execute(
                    "DELETE FROM deck_cards WHERE deck_id = ? AND card_id = ?",
                    &[&deck_id as &dyn ToSql, &card_id],
                )?;
                Ok(0)
            } else {
                tx.execute(
                    "UPDATE deck_cards SET quantity = ? WHERE deck_id = ? AND card_id = ?",
                    &[&remaining as &dyn ToSql, &deck_id, &card_id],
                )?;
                Ok(remaining)
            }
        })
    }

    /// A deck's full card list as (card, quantity) pairs.
    ///
    /// `order_by` supplies the display ordering as SQL clauses over the
    /// joined columns, e.g. `["c.primary_type ASC", "c.name ASC"]`. With no
    /// clauses the list comes back in stable membership (card id) order.
    /// The clauses are spliced into the ORDER BY verbatim and must come
    /// from trusted code, never from end-user input.
    pub fn contents(&self, deck_id: i64, order_by: &[&str]) -> Result<Vec<DeckEntry>> {
        if fetch_deck(self.store, deck_id)?.is_none() {
            return Err(CardvaultError::NotFound(format!("deck {}", deck_id)));
        }

        let mut qb = SqlBuilder::new("deck_cards dc");
        qb.select(&["c.*", "dc.quantity"])
            .join("JOIN cards c ON c.id = dc.card_id")
            .where_eq("dc.deck_id", &deck_id.to_string());
        if order_by.is_empty() {
            qb.order_by(&["dc.card_id ASC"]);
        } else {
            qb.order_by(order_by);
        }

        let (sql, params) = qb.build();
        let rows = self.store.query(&sql, &params)?;

        let mut entries = Vec::with_capacity(rows.len());
        for mut row in rows {
            let quantity = row
                .remove("quantity")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            let card_value = serde_json::Value::Object(
                row.into_iter()
                    .collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let card: Card = serde_json::from_value(card_value)?;
            entries.push(DeckEntry { card, quantity });
        }
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fetch_deck(store: &Store, id: i64) -> Result<Option<Deck>> {
    let (sql, params) = SqlBuilder::new("decks")
        .where_eq("id", &id.to_string())
        .limit(1)
        .build();
    let decks: Vec<Deck> = store.query_into(&sql, &params)?;
    Ok(decks.into_iter().next())
}

fn card_exists(store: &Store, id: i64) -> Result<bool> {
    let value = store.query_scalar(
        "SELECT 1 FROM cards WHERE id = ?",
        &[id.to_string()],
    )?;
    Ok(value.is_some())
}

fn format_taken(store: &Store, format: DeckFormat, excluding: Option<i64>) -> Result<bool> {
    let value = match excluding {
        Some(id) => store.query_scalar(
            "SELECT 1 FROM decks WHERE format = ? AND id != ?",
            &[format.as_str().to_string(), id.to_string()],
        )?,
        None => store.query_scalar(
            "SELECT 1 FROM decks WHERE format = ?",
            &[format.as_str().to_string()],
        )?,
    };
    Ok(value.is_some())
}

fn membership_quantity(store: &Store, deck_id: i64, card_id: i64) -> Result<Option<i64>> {
    let value = store.query_scalar(
        "SELECT quantity FROM deck_cards WHERE deck_id = ? AND card_id = ?",
        &[deck_id.to_string(), card_id.to_string()],
    )?;
    Ok(value.and_then(|v| v.as_i64()))
}

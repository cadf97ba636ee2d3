//! Card CRUD against the `cards` table.

use duckdb::ToSql;

use crate::error::{CardvaultError, Result};
use crate::models::{Card, NewCard};
use crate::sql_builder::SqlBuilder;
use crate::store::{self, Store};

/// Query interface for locally stored cards.
pub struct CardQuery<'a> {
    store: &'a Store,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given store.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // -- Create ------------------------------------------------------------

    /// Insert a card printing and return the stored row.
    pub fn create(&self, new: &NewCard) -> Result<Card> {
        self.store.transaction(|tx| {
            let id = tx.next_id("card_ids")?;
            let created_at = store::timestamp();
            let primary_type = new.primary_type.as_str();

            tx.execute(
                "INSERT INTO cards (id, name, mana_cost, primary_type, secondary_types, \
                 text, power, toughness, loyalty, rarity, artist, flavor, image_url, \
                 set_code, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                &[
                    &id as &dyn ToSql,
                    &new.name,
                    &new.mana_cost,
                    &primary_type,
                    &new.secondary_types,
                    &new.text,
                    &new.power,
                    &new.toughness,
                    &new.loyalty,
                    &new.rarity,
                    &new.artist,
                    &new.flavor,
                    &new.image_url,
                    &new.set_code,
                    &created_at,
                ],
            )?;

            fetch_card(tx, id)?
                .ok_or_else(|| CardvaultError::NotFound(format!("card {} after insert", id)))
        })
    }

    // -- Read --------------------------------------------------------------

    /// Retrieve a single card by id.
    pub fn get(&self, id: i64) -> Result<Option<Card>> {
        fetch_card(self.store, id)
    }

    /// All locally stored printings sharing an exact name.
    pub fn get_by_name(&self, name: &str) -> Result<Vec<Card>> {
        let (sql, params) = SqlBuilder::new("cards")
            .where_eq("name", name)
            .order_by(&["id ASC"])
            .build();
        self.store.query_into(&sql, &params)
    }

    /// Retrieve multiple cards by id. Missing ids are skipped.
    pub fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Card>> {
        let id_strings: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
        let id_refs: Vec<&str> = id_strings.iter().map(|s| s.as_str()).collect();

        let (sql, params) = SqlBuilder::new("cards")
            .where_in("id", &id_refs)
            .order_by(&["id ASC"])
            .build();
        self.store.query_into(&sql, &params)
    }

    /// List cards in stable id order with optional pagination.
    pub fn list(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Card>> {
        let mut qb = SqlBuilder::new("cards");
        qb.order_by(&["id ASC"]);
        if let Some(l) = limit {
            qb.limit(l);
        }
        if let Some(o) = offset {
            qb.offset(o);
        }
        let (sql, params) = qb.build();
        self.store.query_into(&sql, &params)
    }

    /// Count all stored cards.
    pub fn count(&self) -> Result<i64> {
        let value = self.store.query_scalar("SELECT COUNT(*) FROM cards", &[])?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    // -- Update ------------------------------------------------------------

    /// Replace a card's attributes. `created_at` is preserved.
    pub fn update(&self, id: i64, new: &NewCard) -> Result<Card> {
        self.store.transaction(|tx| {
            let primary_type = new.primary_type.as_str();
            let changed = tx.execute(
                "UPDATE cards SET name = ?, mana_cost = ?, primary_type = ?, \
                 secondary_types = ?, text = ?, power = ?, toughness = ?, loyalty = ?, \
                 rarity = ?, artist = ?, flavor = ?, image_url = ?, set_code = ? \
                 WHERE id = ?",
                &[
                    &new.name as &dyn ToSql,
                    &new.mana_cost,
                    &primary_type,
                    &new.secondary_types,
                    &new.text,
                    &new.power,
                    &new.toughness,
                    &new.loyalty,
                    &new.rarity,
                    &new.artist,
                    &new.flavor,
                    &new.image_url,
                    &new.set_code,
                    &id,
                ],
            )?;
            if changed == 0 {
                return Err(CardvaultError::NotFound(format!("card {}", id)));
            }
            fetch_card(tx, id)?.ok_or_else(|| CardvaultError::NotFound(format!("card {}", id)))
        })
    }

    // -- Delete ------------------------------------------------------------

    /// Delete a card, cascading to its membership rows in every deck.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.store.transaction(|tx| {
            tx.execute("DELETE FROM deck_cards WHERE card_id = ?", &[&id as &dyn ToSql])?;
            let changed = tx.execute("DELETE FROM cards WHERE id = ?", &[&id as &dyn ToSql])?;
            if changed == 0 {
                return Err(CardvaultError::NotFound(format!("card {}", id)));
            }
            Ok(())
        })
    }
}

fn fetch_card(store: &Store, id: i64) -> Result<Option<Card>> {
    let (sql, params) = SqlBuilder::new("cards")
        .where_eq("id", &id.to_string())
        .limit(1)
        .build();
    let cards: Vec<Card> = store.query_into(&sql, &params)?;
    Ok(cards.into_iter().next())
}

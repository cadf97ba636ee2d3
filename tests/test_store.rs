//! Store-level tests: raw queries, typed binding, transactions.

mod common;

use cardvault::models::Card;
use cardvault::CardvaultError;
use duckdb::ToSql;

#[test]
fn schema_is_applied_on_open() {
    let store = common::setup_store();
    for table in ["cards", "decks", "deck_cards"] {
        let count = store
            .query_scalar(&format!("SELECT COUNT(*) FROM {}", table), &[])
            .unwrap()
            .and_then(|v| v.as_i64());
        assert_eq!(count, Some(0));
    }
}

#[test]
fn next_id_is_monotonic_per_sequence() {
    let store = common::setup_store();
    let a = store.next_id("card_ids").unwrap();
    let b = store.next_id("card_ids").unwrap();
    assert!(b > a);

    // Sequences are independent
    let d = store.next_id("deck_ids").unwrap();
    assert_eq!(d, 1);
}

#[test]
fn execute_binds_nulls_and_integers() {
    let store = common::setup_store();

    let id = store.next_id("card_ids").unwrap();
    let mana: Option<String> = None;
    store
        .execute(
            "INSERT INTO cards (id, name, mana_cost, primary_type, set_code, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            &[
                &id as &dyn ToSql,
                &"Forest",
                &mana,
                &"Land",
                &"M21",
                &"2024-01-01 00:00:00",
            ],
        )
        .unwrap();

    let rows = store
        .query("SELECT * FROM cards WHERE id = ?", &[id.to_string()])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], serde_json::json!("Forest"));
    assert_eq!(rows[0]["mana_cost"], serde_json::Value::Null);
    assert_eq!(rows[0]["id"], serde_json::json!(id));
}

#[test]
fn query_into_deserializes_rows() {
    let store = common::setup_store();
    let id = store.next_id("card_ids").unwrap();
    store
        .execute(
            "INSERT INTO cards (id, name, primary_type, set_code, created_at)
             VALUES (?, ?, ?, ?, ?)",
            &[
                &id as &dyn ToSql,
                &"Shock",
                &"Instant",
                &"M21",
                &"2024-01-01 00:00:00",
            ],
        )
        .unwrap();

    let cards: Vec<Card> = store
        .query_into("SELECT * FROM cards", &[])
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Shock");
    assert!(cards[0].mana_cost.is_none());
}

#[test]
fn query_scalar_returns_none_on_empty_result() {
    let store = common::setup_store();
    let value = store
        .query_scalar("SELECT id FROM decks WHERE id = ?", &["1".to_string()])
        .unwrap();
    assert!(value.is_none());
}

#[test]
fn failed_transaction_rolls_back() {
    let store = common::setup_store();

    let result: Result<(), _> = store.transaction(|s| {
        let id = s.next_id("deck_ids")?;
        s.execute(
            "INSERT INTO decks (id, title, format, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            &[
                &id as &dyn duckdb::ToSql,
                &"Burn",
                &"Modern",
                &None::<String>,
                &"2024-01-01 00:00:00",
                &"2024-01-01 00:00:00",
            ],
        )?;
        Err(CardvaultError::InvalidArgument("boom".to_string()))
    });
    assert!(result.is_err());

    let count = store
        .query_scalar("SELECT COUNT(*) FROM decks", &[])
        .unwrap()
        .and_then(|v| v.as_i64());
    assert_eq!(count, Some(0));
}

#[test]
fn quantity_check_constraint_holds() {
    let store = common::setup_store();
    let err = store.execute(
        "INSERT INTO deck_cards (deck_id, card_id, quantity) VALUES (?, ?, ?)",
        &[&1i64 as &dyn ToSql, &1i64, &0i64],
    );
    assert!(err.is_err());
}

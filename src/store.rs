//! Embedded DuckDB store holding the deck membership schema.
//!
//! The schema is created on open: `cards`, `decks` and `deck_cards` tables
//! plus id sequences. `deck_cards` carries the membership invariants — one
//! row per (deck, card) pair and quantity >= 1 — and `decks.format` is
//! UNIQUE. Mutations that read-then-write must run inside
//! [`Store::transaction`].

use std::collections::HashMap;
use std::path::Path;

use duckdb::{types::ValueRef, Connection as DuckDbConnection, ToSql};
use serde::de::DeserializeOwned;

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE SEQUENCE IF NOT EXISTS card_ids START 1;
CREATE SEQUENCE IF NOT EXISTS deck_ids START 1;

CREATE TABLE IF NOT EXISTS cards (
    id              BIGINT PRIMARY KEY,
    name            VARCHAR NOT NULL,
    mana_cost       VARCHAR,
    primary_type    VARCHAR NOT NULL,
    secondary_types VARCHAR,
    text            VARCHAR,
    power           VARCHAR,
    toughness       VARCHAR,
    loyalty         VARCHAR,
    rarity          VARCHAR,
    artist          VARCHAR,
    flavor          VARCHAR,
    image_url       VARCHAR,
    set_code        VARCHAR NOT NULL,
    created_at      VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS decks (
    id          BIGINT PRIMARY KEY,
    title       VARCHAR NOT NULL,
    format      VARCHAR NOT NULL UNIQUE,
    description VARCHAR,
    created_at  VARCHAR NOT NULL,
    updated_at  VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS deck_cards (
    deck_id  BIGINT NOT NULL,
    card_id  BIGINT NOT NULL,
    quantity BIGINT NOT NULL CHECK (quantity >= 1),
    PRIMARY KEY (deck_id, card_id)
);
"#;

/// Wraps a DuckDB connection with the cardvault schema applied.
pub struct Store {
    conn: DuckDbConnection,
}

impl Store {
    /// Open an in-memory store. Data is lost when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a store backed by a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(DuckDbConnection::open(path)?)
    }

    fn init(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        log::debug!("store schema ensured");
        Ok(Self { conn })
    }

    /// Execute a SELECT and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Parameters are bound as strings; DuckDB casts them to the compared
    /// column's type.
    pub fn query(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available after query execution.
        let column_names: Vec<String> = rows_result
            .as_ref()
            .unwrap()
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = rows_result.as_ref().unwrap().column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::new();
            for i in 0..column_count {
                let col_name = &column_names[i];
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute a SELECT and deserialize each row into type `T`.
    pub fn query_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.query(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter()
                    .collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute a SELECT and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn query_scalar(&self, sql: &str, params: &[String]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Execute a mutation (INSERT/UPDATE/DELETE) with typed parameters.
    ///
    /// Returns the number of affected rows. Typed binding is used here
    /// (rather than string params) so `Option` fields insert as NULL.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let changed = stmt.execute(params)?;
        Ok(changed)
    }

    /// Draw the next value from an id sequence.
    pub fn next_id(&self, sequence: &str) -> Result<i64> {
        let value = self.query_scalar(&format!("SELECT nextval('{}')", sequence), &[])?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise. This is the
    /// atomic-unit enforcement point for check-then-act mutations such as
    /// membership upserts and cascading deletes.
    pub fn transaction<T>(&self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(err)
            }
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Current wall-clock time in the format stored in `created_at` /
/// `updated_at` columns.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fall back to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        _ => serde_json::Value::Null,
    }
}

//! End-to-end tests through the Cardvault facade with an injected source.

mod common;

use cardvault::catalog::LatestOptions;
use cardvault::models::{DeckFormat, NewCard};
use cardvault::{Cardvault, CardvaultError};

fn vault_with(source: common::FakeSource, cache_dir: &std::path::Path) -> Cardvault {
    Cardvault::builder()
        .source(Box::new(source))
        .cache_dir(cache_dir)
        .build()
        .unwrap()
}

#[test]
fn build_loads_the_set_index_eagerly() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_with(common::FakeSource::new(Vec::new()), dir.path());

    assert_eq!(vault.set_index().len(), common::sample_sets().len());
    assert!(dir.path().join("sets.json").exists());
}

#[test]
fn display_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let vault = vault_with(common::FakeSource::new(Vec::new()), dir.path());

    vault
        .decks()
        .create(&common::new_deck("Burn", DeckFormat::Modern))
        .unwrap();

    let rendered = vault.to_string();
    assert!(rendered.contains("cards=0"));
    assert!(rendered.contains("decks=1"));
}

#[test]
fn catalog_lookup_flows_into_local_storage() {
    let dir = tempfile::tempdir().unwrap();
    let printings = vec![common::printing(
        "Grizzly Bears",
        "M21",
        "Creature — Bear",
    )];
    let vault = vault_with(common::FakeSource::new(printings), dir.path());

    // Normalized lookup against the source
    let results = vault
        .catalog()
        .latest_printings("Grizzly Bears", &LatestOptions::default())
        .unwrap();
    assert_eq!(results.len(), 1);

    // Face lookup, ingested into the store, then added to a deck
    let faces = vault
        .catalog()
        .card_faces("Grizzly Bears", Some("M21"), None)
        .unwrap()
        .unwrap();
    let new = NewCard::from_face(&faces.front).unwrap();
    let card = vault.cards().create(&new).unwrap();
    assert_eq!(card.name, "Grizzly Bears");

    let deck = vault
        .decks()
        .create(&common::new_deck("Stompy", DeckFormat::Pauper))
        .unwrap();
    vault.decks().add_card(deck.id, card.id, 4).unwrap();

    let contents = vault.decks().contents(deck.id, &[]).unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].quantity, 4);
}

#[test]
fn db_path_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vault.duckdb");

    {
        let vault = Cardvault::builder()
            .source(Box::new(common::FakeSource::new(Vec::new())))
            .cache_dir(dir.path())
            .db_path(&db)
            .build()
            .unwrap();
        vault
            .decks()
            .create(&common::new_deck("Burn", DeckFormat::Modern))
            .unwrap();
    }

    let reopened = Cardvault::builder()
        .source(Box::new(common::FakeSource::new(Vec::new())))
        .cache_dir(dir.path())
        .db_path(&db)
        .build()
        .unwrap();
    let deck = reopened
        .decks()
        .get_by_format(DeckFormat::Modern)
        .unwrap()
        .unwrap();
    assert_eq!(deck.title, "Burn");
}

#[test]
fn offline_build_without_cache_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Cardvault::builder()
        .source(Box::new(common::FakeSource::new(Vec::new())))
        .cache_dir(dir.path())
        .offline(true)
        .build()
        .unwrap_err();
    assert!(matches!(err, CardvaultError::NotFound(_)));
}

//! Catalog normalizer: collapses external printings into one record per
//! distinct card name, and assembles single- or double-faced lookups.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{CardvaultError, Result};
use crate::models::{CardFace, CardFaces, PrintingSummary};
use crate::sets::SetIndex;
use crate::source::{CardSource, SourcePrinting};

// ---------------------------------------------------------------------------
// LatestOptions
// ---------------------------------------------------------------------------

/// Ordering of the deduplicated result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintingOrder {
    /// Descending release date (most recent first).
    #[default]
    Date,
    /// Ascending case-insensitive name.
    Alpha,
}

/// Options for [`CatalogQuery::latest_printings`].
#[derive(Debug, Clone)]
pub struct LatestOptions {
    /// Maximum number of records returned.
    pub limit: usize,
    /// Discard results whose name does not start with the trimmed,
    /// lowercased query.
    pub prefix_only: bool,
    pub order: PrintingOrder,
}

impl Default for LatestOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            prefix_only: true,
            order: PrintingOrder::Date,
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogQuery
// ---------------------------------------------------------------------------

/// Lookup interface over an external [`CardSource`] and a preloaded
/// [`SetIndex`]. Each call performs blocking fetches followed by in-process
/// filtering; source failures propagate to the caller.
pub struct CatalogQuery<'a> {
    source: &'a dyn CardSource,
    sets: &'a SetIndex,
}

/// A deduplication candidate carrying its resolved sort date. The date
/// never leaks into the returned record.
struct Candidate {
    summary: PrintingSummary,
    sort_date: NaiveDate,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(source: &'a dyn CardSource, sets: &'a SetIndex) -> Self {
        Self { source, sets }
    }

    // -- Latest printings --------------------------------------------------

    /// Fetch all printings matching `query`, keep the most recent printing
    /// per distinct name, and return them ordered and truncated per `opts`.
    ///
    /// A printing whose set is unknown or undated sorts with the minimum
    /// representable date, so it only wins deduplication when no dated
    /// printing of the same name exists. When two printings of one name
    /// share a date, the one seen first in the source's return order is
    /// kept; the final sort is stable on that same order.
    ///
    /// An empty query or zero matches yields an empty list, not an error.
    pub fn latest_printings(
        &self,
        query: &str,
        opts: &LatestOptions,
    ) -> Result<Vec<PrintingSummary>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let printings = self.source.printings_named(query)?;
        log::debug!("{} printings match {:?}", printings.len(), query);

        // One pass: keep the newest printing per name, preserving the order
        // names were first seen so ties stay deterministic.
        let mut first_seen: Vec<String> = Vec::new();
        let mut latest_by_name: HashMap<String, Candidate> = HashMap::new();

        for p in printings {
            if opts.prefix_only && !p.name.to_lowercase().starts_with(&needle) {
                continue;
            }

            let set = self.sets.get(&p.set_code);
            let release_date = set.and_then(|s| s.release_date);
            let sort_date = release_date.unwrap_or(NaiveDate::MIN);

            let candidate = Candidate {
                summary: PrintingSummary {
                    name: p.name.clone(),
                    set_code: p.set_code,
                    set_name: set.map(|s| s.name.clone()),
                    type_line: p.type_line,
                    mana_cost: p.mana_cost,
                    release_date,
                },
                sort_date,
            };

            let replace = match latest_by_name.get(&p.name) {
                None => {
                    first_seen.push(p.name.clone());
                    true
                }
                Some(prev) => candidate.sort_date > prev.sort_date,
            };
            if replace {
                latest_by_name.insert(p.name, candidate);
            }
        }

        let mut results: Vec<Candidate> = first_seen
            .iter()
            .filter_map(|name| latest_by_name.remove(name))
            .collect();

        // Both sorts are stable, so equal keys keep first-seen order.
        match opts.order {
            PrintingOrder::Alpha => {
                results.sort_by_key(|c| c.summary.name.to_lowercase());
            }
            PrintingOrder::Date => {
                results.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
            }
        }

        results.truncate(opts.limit);
        Ok(results.into_iter().map(|c| c.summary).collect())
    }

    // -- Face lookup -------------------------------------------------------

    /// Look up the printings of `name` in one set (`set_code` takes
    /// precedence over `set_name`) and assemble the result as faces.
    ///
    /// One matching printing yields a front face only; two or more yield
    /// front and back in the source's return order (the double-faced card
    /// convention: one physical card, two printing rows sharing a set).
    /// Zero matches yield `Ok(None)`. A missing name is a validation error,
    /// rejected before any fetch.
    pub fn card_faces(
        &self,
        name: &str,
        set_code: Option<&str>,
        set_name: Option<&str>,
    ) -> Result<Option<CardFaces>> {
        if name.trim().is_empty() {
            return Err(CardvaultError::InvalidArgument(
                "card name is required".to_string(),
            ));
        }

        let printings = self.source.printings_in_set(name, set_code, set_name)?;
        log::debug!(
            "{} printings for {:?} in set {:?}/{:?}",
            printings.len(),
            name,
            set_code,
            set_name
        );

        let mut iter = printings.into_iter();
        let front = match iter.next() {
            Some(p) => to_face(p),
            None => return Ok(None),
        };
        let back = iter.next().map(to_face);

        Ok(Some(CardFaces { front, back }))
    }
}

fn to_face(p: SourcePrinting) -> CardFace {
    CardFace {
        name: p.name,
        set_code: p.set_code,
        set_name: p.set_name,
        type_line: p.type_line,
        subtypes: p.subtypes,
        mana_cost: p.mana_cost,
        text: p.text,
        power: p.power,
        toughness: p.toughness,
        loyalty: p.loyalty,
        rarity: p.rarity,
        image_url: p.image_url,
    }
}

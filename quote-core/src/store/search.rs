//! Keyword search over stored quotes.
//!
//! Matching is case-insensitive substring matching. Each term scores the
//! sum of the weights of the fields containing it, with a bonus when the
//! field equals the term:
//!
//! | Field              | Weight |
//! |--------------------|--------|
//! | `licensePlate`     | 5      |
//! | `client`           | 4      |
//! | `model`, `chassis` | 3      |
//! | `insurance`        | 2      |
//! | item `description` | 2 each |
//! | `year`, `quoteDate`| 1      |
//! | item `source`      | 1 each |
//! | file name          | 1      |
//!
//! A quote is a hit only when every term scores.

use std::cmp::Ordering;

use crate::models::QuoteDocument;
use crate::store::SearchHit;

const EXACT_MATCH_BONUS: u32 = 2;

/// Splits a query into lowercase terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Scores one quote against all terms; `None` when some term matches
/// nothing (or there are no terms).
pub fn score_document(
    terms: &[String],
    name: &str,
    quote: &QuoteDocument,
) -> Option<u32> {
    if terms.is_empty() {
        return None;
    }

    let general = &quote.general;
    let mut fields: Vec<(&str, u32)> = vec![
        (general.license_plate.as_str(), 5),
        (general.client.as_str(), 4),
        (general.model.as_str(), 3),
        (general.chassis.as_str(), 3),
        (general.insurance.as_str(), 2),
        (general.year.as_str(), 1),
        (general.quote_date.as_str(), 1),
        (name, 1),
    ];
    for item in &quote.items {
        fields.push((item.description.as_str(), 2));
        fields.push((item.source.as_str(), 1));
    }
    let fields: Vec<(String, u32)> = fields
        .into_iter()
        .map(|(text, weight)| (text.trim().to_lowercase(), weight))
        .collect();

    let mut total = 0;
    for term in terms {
        let score = term_score(term, &fields);
        if score == 0 {
            return None;
        }
        total += score;
    }
    Some(total)
}

fn term_score(
    term: &str,
    fields: &[(String, u32)],
) -> u32 {
    fields
        .iter()
        .filter(|(text, _)| text.contains(term))
        .map(|(text, weight)| {
            if text == term {
                weight + EXACT_MATCH_BONUS
            } else {
                *weight
            }
        })
        .sum()
}

/// Orders hits by score (highest first), then by name.
pub fn sort_hits(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => a.summary.name.cmp(&b.summary.name),
        other => other,
    });
}

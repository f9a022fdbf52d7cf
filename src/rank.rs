//! Ranking - The fuzzy-match collaborator contract and default implementation.
//!
//! Ranking is a pluggable service: given a query and one searchable field, a
//! [`Ranker`] produces a relevance score. The pipeline owns everything around
//! that seam — extracting fields by key, taking the best score per item,
//! ordering best-first, and keeping *every* candidate (low-relevance items
//! rank last rather than being dropped).
//!
//! The built-in [`TieredRanker`] classifies matches into quality tiers,
//! checked best to worst, with a continuous fuzzy-similarity tail below every
//! literal tier:
//!
//! | Score | Tier | Example (query `"app"`) |
//! |-------|------|-------------------------|
//! | 7.0 | Case-sensitive equal | `"app"` |
//! | 6.0 | Equal | `"APP"` |
//! | 5.0 | Starts with | `"apple"` |
//! | 4.0 | Word starts with | `"pine apple"` |
//! | 3.0 | Contains | `"pineapple"` |
//! | 2.0 | Acronym | `"nwa"` vs `"North-West Airlines"` |
//! | 0.0..=1.0 | Fuzzy similarity (Jaro-Winkler) | `"aple"` vs `"apple"` |

use std::borrow::Cow;

// =============================================================================
// Key Lookup
// =============================================================================

/// Access to an item's searchable fields by key name.
///
/// The widget never interprets an item's shape beyond this trait: the caller
/// declares which keys to rank against, and each item resolves a key to the
/// field's text (or `None` when the field is absent).
///
/// # Example
///
/// ```ignore
/// use std::borrow::Cow;
/// use search_box::KeyLookup;
///
/// struct Person { name: String, email: String }
///
/// impl KeyLookup for Person {
///     fn key_value(&self, key: &str) -> Option<Cow<'_, str>> {
///         match key {
///             "name" => Some(Cow::Borrowed(&self.name)),
///             "email" => Some(Cow::Borrowed(&self.email)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait KeyLookup {
    /// Resolve a declared key to this item's field text.
    fn key_value(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Plain strings are their own searchable field, whatever the key.
impl KeyLookup for String {
    fn key_value(&self, _key: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl KeyLookup for &str {
    fn key_value(&self, _key: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(*self))
    }
}

// =============================================================================
// Ranker Contract
// =============================================================================

/// The ranking collaborator: scores one field against a query.
///
/// Higher is better. Implementations must score every input (no thresholding)
/// so the pipeline can include all candidates, worst matches last. A score of
/// `0.0` means no relevance at all.
pub trait Ranker {
    /// Relevance of `field` for `query`.
    fn score(&self, query: &str, field: &str) -> f64;
}

// =============================================================================
// Tiered Ranker (default)
// =============================================================================

/// Default [`Ranker`]: tiered literal matching with a fuzzy tail.
///
/// Every literal tier scores strictly above the fuzzy range, so any field
/// containing the query as a case-insensitive substring always outranks a
/// merely-similar field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredRanker;

impl TieredRanker {
    const CASE_SENSITIVE_EQUAL: f64 = 7.0;
    const EQUAL: f64 = 6.0;
    const STARTS_WITH: f64 = 5.0;
    const WORD_STARTS_WITH: f64 = 4.0;
    const CONTAINS: f64 = 3.0;
    const ACRONYM: f64 = 2.0;
}

impl Ranker for TieredRanker {
    fn score(&self, query: &str, field: &str) -> f64 {
        if query == field {
            return Self::CASE_SENSITIVE_EQUAL;
        }

        let query_lower = query.to_lowercase();
        let field_lower = field.to_lowercase();

        if query_lower == field_lower {
            return Self::EQUAL;
        }
        if field_lower.starts_with(&query_lower) {
            return Self::STARTS_WITH;
        }
        if word_starts_with(&field_lower, &query_lower) {
            return Self::WORD_STARTS_WITH;
        }
        if field_lower.contains(&query_lower) {
            return Self::CONTAINS;
        }
        if acronym(&field_lower).contains(&query_lower) {
            return Self::ACRONYM;
        }

        // Fuzzy tail: always in 0.0..=1.0, below every literal tier
        strsim::jaro_winkler(&query_lower, &field_lower)
    }
}

/// True if the query starts at a word boundary inside the field.
fn word_starts_with(field: &str, query: &str) -> bool {
    field
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| !word.is_empty() && word.starts_with(query))
}

/// First character of each word, joined.
fn acronym(field: &str) -> String {
    field
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

//! Search Pipeline - Pre-process → rank → project → post-process.
//!
//! Re-derives the displayed list from the full base list on every locked
//! search-text change. The pipeline is idle while the lock is not held — the
//! caller's list edits flow through untouched — and the widget only invokes
//! it against the post-transition lock state, so an empty query is never
//! ranked: the release transition always runs first.
//!
//! Caller-supplied transforms let items be enriched with extra searchable
//! fields without leaking those fields into dispatched results: `pre` maps
//! the base items into enriched candidates, the ranking step orders the
//! enriched candidates, and `post` strips the enrichment again. The pair is
//! modeled as a single validated variant — supplying only half of it is a
//! configuration error, caught at construction, never at search time.

use std::rc::Rc;

use log::trace;

use crate::rank::{KeyLookup, Ranker};
use crate::types::ConfigurationError;

// =============================================================================
// Transforms
// =============================================================================

/// Enrichment transform: base items into searchable candidates.
pub type PreProcess<T, K> = Rc<dyn Fn(&[T]) -> Vec<K>>;

/// Projection transform: ranked candidates back into base items.
pub type PostProcess<T, K> = Rc<dyn Fn(Vec<K>) -> Vec<T>>;

/// The caller's enrichment step, validated at construction.
pub enum Transform<T, K = T> {
    /// Rank the base list directly.
    None,
    /// Enrich before ranking, strip after.
    Paired {
        /// Applied to the full base list before ranking.
        pre: PreProcess<T, K>,
        /// Applied to the ranked candidates, preserving their order.
        post: PostProcess<T, K>,
    },
}

impl<T, K> Transform<T, K> {
    /// Build a transform from the optional pair, rejecting half-supplied
    /// configurations.
    pub fn pair(
        pre: Option<PreProcess<T, K>>,
        post: Option<PostProcess<T, K>>,
    ) -> Result<Self, ConfigurationError> {
        match (pre, post) {
            (Some(pre), Some(post)) => Ok(Transform::Paired { pre, post }),
            (None, None) => Ok(Transform::None),
            _ => Err(ConfigurationError::UnpairedTransform),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Run one search: rank the base list against the query and return every
/// candidate, best match first.
pub(crate) fn run<T, K>(
    query: &str,
    keys: &[String],
    ranker: &dyn Ranker,
    transform: &Transform<T, K>,
    full_base_list: Vec<T>,
) -> Vec<T>
where
    T: KeyLookup,
    K: KeyLookup,
{
    trace!(
        "pipeline run: query={:?}, {} candidates",
        query,
        full_base_list.len()
    );

    match transform {
        Transform::None => rank_all(query, keys, ranker, full_base_list),
        Transform::Paired { pre, post } => {
            let enriched = pre(&full_base_list);
            let ranked = rank_all(query, keys, ranker, enriched);
            post(ranked)
        }
    }
}

/// Order items best-first by their best per-key score. Every item is kept;
/// ties preserve input order (stable sort).
fn rank_all<I: KeyLookup>(
    query: &str,
    keys: &[String],
    ranker: &dyn Ranker,
    items: Vec<I>,
) -> Vec<I> {
    let mut scored: Vec<(f64, I)> = items
        .into_iter()
        .map(|item| (score_item(query, keys, ranker, &item), item))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Best score across the declared keys. Absent fields are skipped; an item
/// with no resolvable field ranks as no-match.
fn score_item<I: KeyLookup>(query: &str, keys: &[String], ranker: &dyn Ranker, item: &I) -> f64 {
    keys.iter()
        .filter_map(|key| item.key_value(key))
        .map(|field| ranker.score(query, &field))
        .fold(0.0, f64::max)
}

// =============================================================================
// Tests
// =============================================================================

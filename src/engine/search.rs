use crate::client::Hit;

/// Results of a search for one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<T> {
    /// Total number of matching documents reported by the search client,
    /// before the result limit and the score threshold.
    pub total_hits: u64,
    /// Records whose hits passed the score threshold, best first.
    pub results: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn empty() -> Self {
        SearchResults {
            total_hits: 0,
            results: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Keep the leading hits that score at least `min_score`.
///
/// Hits must already be sorted by descending score: the walk stops at the
/// first hit below the threshold and drops it along with everything after.
pub fn apply_score_threshold(hits: Vec<Hit>, min_score: f32) -> Vec<Hit> {
    hits.into_iter()
        .take_while(|hit| hit.score >= min_score)
        .collect()
}

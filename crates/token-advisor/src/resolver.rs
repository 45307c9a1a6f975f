//! Token Identifier Resolver
//!
//! "Did you mean" suggestions for identifiers the provider does not know.
//!
//! Scores use the normalized indel ratio:
//!
//! ```text
//! similarity(a, b) = round(100 * 2 * LCS(a, b) / (|a| + |b|))
//! ```
//!
//! where `LCS` is the longest common subsequence over `char`s. This equals
//! `1 - indel_distance / (|a| + |b|)` scaled to 0..=100, so the threshold and
//! top-N cut are reproducible without a fuzzy-matching library.

use serde::Serialize;

use crate::model::{normalize_id, CoinListing};

/// Most suggestions ever returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Scores must be strictly above this to be suggested
pub const MIN_SCORE: u8 = 60;

/// Similarity of two strings on a 0..=100 scale
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let lcs = lcs_len(&a, &b);
    let score = (200 * lcs) as f64 / total as f64;
    score.round() as u8
}

/// Longest common subsequence length, single-row DP
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub score: u8,
}

/// Close catalog matches, best first.
///
/// Never holds more than [`MAX_SUGGESTIONS`] entries, and every score is
/// above [`MIN_SCORE`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionList(Vec<Suggestion>);

impl SuggestionList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.0.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s.id == id)
    }

    /// Text shown when the requested coin could not be resolved
    pub fn not_found_message(&self) -> String {
        if self.is_empty() {
            return "Coin not found, and no similar coins were detected. \
                    Please check the spelling or try another name."
                .into();
        }
        format!("Coin not found. Did you mean:\n\n{}", self.ids().join("\n"))
    }
}

/// Score `requested` against every catalog id.
///
/// Takes the five best scores (ties keep catalog order) and then drops any
/// at or below the threshold, so fewer than five can come back even when the
/// catalog has more qualifying entries further down the tie order.
pub fn suggest(requested: &str, catalog: &[CoinListing]) -> SuggestionList {
    let needle = normalize_id(requested);

    let mut scored: Vec<Suggestion> = catalog
        .iter()
        .map(|coin| Suggestion {
            score: similarity(&needle, &coin.id),
            id: coin.id.clone(),
        })
        .collect();

    // Stable sort keeps catalog order among equal scores
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_SUGGESTIONS);
    scored.retain(|s| s.score > MIN_SCORE);

    tracing::debug!(
        requested = %needle,
        catalog_size = catalog.len(),
        matches = scored.len(),
        "Scored identifier suggestions"
    );

    SuggestionList(scored)
}

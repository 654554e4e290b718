//! Approximate matching of whole original texts.

use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use similar::TextDiff;
use tracing::{debug, instrument};

use crate::{
    error::{QueryError, Result},
    fold,
    search::SearchEngine,
};

/// Similarity of two texts in `0.0..=100.0`, computed character-wise on their folded forms
pub fn ratio(left: &str, right: &str) -> f64 {
    score(&fold::fold(left), &fold::fold(right))
}

fn score(left: &str, right: &str) -> f64 {
    f64::from(TextDiff::from_chars(left, right).ratio()) * 100.0
}

impl SearchEngine<'_> {
    /// Map every original text to its translation when either scores at least `threshold` against
    /// `query`.
    ///
    /// A record scores the better of its original and translated similarity. Entries are ordered by
    /// descending score. Untranslated originals map to an empty string. When
    /// an original appears several times the best-scoring occurrence wins.
    #[instrument(skip(self), err)]
    pub fn fuzzy_search(&self, query: &str, threshold: i64) -> Result<IndexMap<String, String>> {
        if !(0..=100).contains(&threshold) {
            return Err(QueryError::ThresholdOutOfRange(threshold).into());
        }
        let threshold = threshold as f64;

        let rows = self.store().with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT original_string, translated_string FROM translations ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;

        let folded_query = fold::fold(query);
        let scored = rows
            .into_par_iter()
            .filter_map(|(original, translated)| {
                let mut similarity = score(&folded_query, &fold::fold(&original));
                if let Some(translated) = &translated {
                    similarity = similarity.max(score(&folded_query, &fold::fold(translated)));
                }
                (similarity >= threshold).then(|| (similarity, original, translated.unwrap_or_default()))
            })
            .collect::<Vec<_>>();

        let mut matches = IndexMap::new();
        for (_, original, translated) in scored
            .into_iter()
            .sorted_by(|a, b| b.0.total_cmp(&a.0))
        {
            matches.entry(original).or_insert(translated);
        }

        debug!(matches = matches.len(), "fuzzy search finished");
        Ok(matches)
    }
}

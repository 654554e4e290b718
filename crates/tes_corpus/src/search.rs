//! Substring search over the corpus.
//!
//! Matches are ranked by where they hit: original-text matches come before translated-text
//! matches, shorter originals before longer ones, translated records before untranslated ones and
//! finally insertion order. The needle is matched literally, so `%` and `_` have no special meaning.
//!
//! When searching case-insensitively both the needle and the stored text go through
//! [`fold`](crate::fold::fold), which also folds compatibility forms such as full-width letters.

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    error::{Error, QueryError, Result},
    fold,
    record::TranslationRecord,
    store::{TranslationStore, RECORD_COLUMNS},
};

/// Page size used when a request does not give one
pub const DEFAULT_LIMIT: u32 = 20;

/// Validated search parameters
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SearchQuery {
    /// Text to look for
    #[builder(into)]
    pub text: String,

    /// Match against the original text
    #[builder(default = true)]
    pub search_original: bool,

    /// Match against the translated text
    #[builder(default = true)]
    pub search_translated: bool,

    /// Fold case and compatibility forms before matching
    #[builder(default = true)]
    pub case_insensitive: bool,

    /// Number of ranked matches to skip
    #[builder(default)]
    pub offset: u32,

    /// Maximum number of matches to return
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: u32,
}

/// One ranked match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// The matched record
    #[serde(flatten)]
    pub record: TranslationRecord,

    /// 0 for an original-text match, 1 for a translated-text match
    pub match_priority: u8,

    /// Length of the original text in characters
    pub original_length: usize,
}

/// One page of ranked matches plus counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    /// The matches on this page
    pub results: Vec<SearchResult>,

    /// Matches across all pages
    pub total_matches: u64,

    /// Records in the whole corpus
    pub total_in_corpus: u64,
}

/// Read-only queries against a [`TranslationStore`]
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'s> {
    store: &'s TranslationStore,
}

impl<'s> SearchEngine<'s> {
    /// Search the given store
    pub fn new(store: &'s TranslationStore) -> Self {
        SearchEngine { store }
    }

    pub(crate) fn store(&self) -> &'s TranslationStore {
        self.store
    }

    /// Return one page of ranked matches for `query`.
    ///
    /// When neither text column is searched the page is empty and reports no matches, but the
    /// corpus total is still filled in.
    #[instrument(skip(self), err)]
    pub fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        debug!(
            original = query.search_original,
            translated = query.search_translated,
            case_insensitive = query.case_insensitive,
            offset = query.offset,
            limit = query.limit,
            "searching"
        );
        let needle = if query.case_insensitive {
            fold::fold(&query.text)
        } else {
            query.text.clone()
        };

        let original = column("original_string", query.case_insensitive);
        let translated = column("translated_string", query.case_insensitive);
        let filter = format!(
            "((?2 AND instr({original}, ?1) > 0)
              OR (?3 AND translated_string IS NOT NULL AND instr({translated}, ?1) > 0))"
        );
        let priority = format!(
            "CASE WHEN instr({original}, ?1) > 0 THEN 0
                  WHEN translated_string IS NOT NULL AND instr({translated}, ?1) > 0 THEN 1
                  ELSE 2 END"
        );

        // totals and page come from one read snapshot
        let page = self.store.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let total_in_corpus: u64 =
                tx.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;

            if !query.search_original && !query.search_translated {
                debug!("no column selected");
                return Ok(SearchPage {
                    results: Vec::new(),
                    total_matches: 0,
                    total_in_corpus,
                });
            }

            let total_matches: u64 = tx.query_row(
                &format!("SELECT COUNT(*) FROM translations WHERE {filter}"),
                rusqlite::params![needle, query.search_original, query.search_translated],
                |row| row.get(0),
            )?;

            let results = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {RECORD_COLUMNS}, {priority} AS match_priority,
                            length(original_string) AS original_length
                     FROM translations
                     WHERE {filter}
                     ORDER BY match_priority, original_length, translated_string IS NULL, id
                     LIMIT ?4 OFFSET ?5"
                ))?;
                let rows = stmt.query_map(
                    rusqlite::params![
                        needle,
                        query.search_original,
                        query.search_translated,
                        query.limit,
                        query.offset
                    ],
                    |row| {
                        let length: i64 = row.get(9)?;
                        Ok(SearchResult {
                            record: TranslationStore::record_from_row(row)?,
                            match_priority: row.get(8)?,
                            original_length: usize::try_from(length).unwrap_or_default(),
                        })
                    },
                )?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            };
            tx.commit()?;

            Ok(SearchPage {
                results,
                total_matches,
                total_in_corpus,
            })
        })?;

        info!(
            total_matches = page.total_matches,
            returned = page.results.len(),
            "search finished"
        );
        Ok(page)
    }

    /// Answer a boundary request. Never fails: problems are reported in [`SearchResponse::error`].
    pub fn respond(&self, request: &SearchRequest) -> SearchResponse {
        info!(query = %request.query, offset = request.offset, limit = request.limit, "search request");

        let page = SearchQuery::try_from(request)
            .map_err(Error::from)
            .and_then(|query| self.search(&query));

        match page {
            Ok(page) => SearchResponse {
                results: page.results,
                stats: SearchStats {
                    matches: page.total_matches,
                    total: page.total_in_corpus,
                },
                error: None,
            },
            Err(e) => {
                error!(error = %e, "search failed");
                SearchResponse {
                    results: Vec::new(),
                    stats: SearchStats::default(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn column(name: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        format!("{}({name})", fold::SQL_FUNCTION)
    } else {
        name.to_owned()
    }
}

/// Untrusted search parameters as received from a caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Text to look for
    pub query: String,

    /// Match against the original text
    pub search_in_original: bool,

    /// Match against the translated text
    pub search_in_translated: bool,

    /// Fold case before matching
    pub case_insensitive: bool,

    /// Number of matches to skip, must not be negative
    pub offset: i64,

    /// Maximum number of matches, must not be negative
    pub limit: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            query: String::new(),
            search_in_original: true,
            search_in_translated: true,
            case_insensitive: true,
            offset: 0,
            limit: DEFAULT_LIMIT.into(),
        }
    }
}

impl TryFrom<&SearchRequest> for SearchQuery {
    type Error = QueryError;

    fn try_from(request: &SearchRequest) -> std::result::Result<Self, Self::Error> {
        if request.offset < 0 {
            return Err(QueryError::NegativeOffset(request.offset));
        }
        if request.limit < 0 {
            return Err(QueryError::NegativeLimit(request.limit));
        }

        Ok(SearchQuery {
            text: request.query.clone(),
            search_original: request.search_in_original,
            search_translated: request.search_in_translated,
            case_insensitive: request.case_insensitive,
            offset: u32::try_from(request.offset).unwrap_or(u32::MAX),
            limit: u32::try_from(request.limit).unwrap_or(u32::MAX),
        })
    }
}

/// Match counts reported alongside a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Matches across all pages
    pub matches: u64,

    /// Records in the whole corpus
    pub total: u64,
}

/// Boundary answer to a [`SearchRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// The matches on the requested page
    pub results: Vec<SearchResult>,

    /// Counts
    pub stats: SearchStats,

    /// Description of the failure, if the search failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

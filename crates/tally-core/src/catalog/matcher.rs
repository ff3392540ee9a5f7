//! Fuzzy matching of extracted descriptions against the master catalog.

use tracing::{debug, trace, warn};

use super::similarity::{default_process, token_set_ratio};
use super::{MasterCatalog, ID_COLUMNS, NAME_COLUMNS, SIZE_COLUMNS};
use crate::models::config::MatchConfig;

/// Similarity function used to rank catalog candidates.
pub trait Scorer {
    /// Score `choice` against `query`, 0 (unrelated) to 100 (identical).
    fn score(&self, query: &str, choice: &str) -> f64;
}

/// Token-set similarity, optionally over lowercased, punctuation-free text.
///
/// Text is compared as given by default, so case and punctuation count.
#[derive(Debug, Clone)]
pub struct TokenSetScorer {
    normalize_text: bool,
}

impl TokenSetScorer {
    pub fn new() -> Self {
        Self {
            normalize_text: false,
        }
    }

    /// Set whether text is lowercased and stripped of punctuation first.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }
}

impl Default for TokenSetScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for TokenSetScorer {
    fn score(&self, query: &str, choice: &str) -> f64 {
        if self.normalize_text {
            token_set_ratio(&default_process(query), &default_process(choice))
        } else {
            token_set_ratio(query, choice)
        }
    }
}

/// The accepted catalog candidate for an item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch {
    /// Catalog identifier.
    pub id: String,
    /// Catalog product name the description was compared with.
    pub name: String,
    /// Similarity score.
    pub score: f64,
}

/// Catalog column positions, resolved once per matcher.
#[derive(Debug, Clone, Copy)]
struct CatalogColumns {
    name: usize,
    id: usize,
    size: Option<usize>,
}

/// Matches item descriptions against one master catalog.
pub struct CatalogMatcher<'a, S = TokenSetScorer> {
    catalog: &'a MasterCatalog,
    columns: Option<CatalogColumns>,
    scorer: S,
    min_score: f64,
}

impl<'a> CatalogMatcher<'a, TokenSetScorer> {
    /// Create a matcher with the token-set scorer and default threshold (85).
    pub fn new(catalog: &'a MasterCatalog) -> Self {
        Self::with_scorer(catalog, TokenSetScorer::new())
    }

    /// Create a matcher configured from [`MatchConfig`].
    pub fn from_config(catalog: &'a MasterCatalog, config: &MatchConfig) -> Self {
        Self::with_scorer(
            catalog,
            TokenSetScorer::new().with_normalization(config.normalize_text),
        )
        .with_min_score(config.min_score)
    }
}

impl<'a, S: Scorer> CatalogMatcher<'a, S> {
    /// Create a matcher with a custom scorer.
    pub fn with_scorer(catalog: &'a MasterCatalog, scorer: S) -> Self {
        let name = catalog.find_column(NAME_COLUMNS);
        let id = catalog.find_column(ID_COLUMNS);

        let columns = match (name, id) {
            (Some(name), Some(id)) => Some(CatalogColumns {
                name,
                id,
                size: catalog.find_column(SIZE_COLUMNS),
            }),
            (None, _) => {
                warn!("Could not find product name column in master file");
                None
            }
            (_, None) => {
                warn!("Could not find ID column in master file");
                None
            }
        };

        Self {
            catalog,
            columns,
            scorer,
            min_score: 85.0,
        }
    }

    /// Set the minimum accepted score.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Identifier of the best catalog candidate for an item, if any clears the threshold.
    pub fn match_id(&self, description: &str, normalized_size: Option<u32>) -> Option<String> {
        self.best_match(description, normalized_size).map(|m| m.id)
    }

    /// Best catalog candidate for an item.
    ///
    /// When the item has a size and the catalog a size column, only rows of
    /// the same size are considered, unless none exist. Equal scores keep the
    /// earlier row.
    pub fn best_match(&self, description: &str, normalized_size: Option<u32>) -> Option<CatalogMatch> {
        if self.catalog.is_empty() || description.trim().is_empty() {
            return None;
        }
        let columns = self.columns?;

        let candidates = self.candidates(columns, normalized_size);

        let mut best: Option<CatalogMatch> = None;
        let mut best_score = 0.0;

        for row in candidates {
            let name = &row[columns.name];
            let score = self.scorer.score(description, name);
            trace!("Score {:.1} for {:?} vs {:?}", score, description, name);

            if score > best_score && score >= self.min_score {
                best_score = score;
                best = Some(CatalogMatch {
                    id: row[columns.id].clone(),
                    name: name.clone(),
                    score,
                });
            }
        }

        match &best {
            Some(m) => debug!("Matched {:?} -> {} ({:.1})", description, m.id, m.score),
            None => debug!("No catalog match for {:?}", description),
        }

        best
    }

    fn candidates(&self, columns: CatalogColumns, normalized_size: Option<u32>) -> Vec<&'a Vec<String>> {
        let rows = self.catalog.rows();

        if let (Some(size), Some(size_col)) = (normalized_size, columns.size) {
            let same_size: Vec<&Vec<String>> = rows
                .iter()
                .filter(|row| parse_catalog_size(&row[size_col]) == Some(f64::from(size)))
                .collect();

            if !same_size.is_empty() {
                return same_size;
            }
            trace!("No catalog rows of size {}ml, using full catalog", size);
        }

        rows.iter().collect()
    }
}

fn parse_catalog_size(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok()
}

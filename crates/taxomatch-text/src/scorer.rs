//! Turns a taxonomy leaf into a query and scores it against a product index.

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser};
use tracing::{debug, warn};

use taxomatch_core::traits::CategoryScorer;
use taxomatch_core::types::{CategoryPath, FieldWeights, MatchScore};

use crate::error::{IndexError, Result};
use crate::index::ProductIndex;

/// Splits a leaf into its OR-alternatives: `"Chairs, Stools & Benches"`
/// becomes `["Chairs", "Stools", "Benches"]`. Blank alternatives are dropped.
pub fn leaf_alternatives(leaf: &str) -> Vec<&str> {
    leaf.split([',', '&'])
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .collect()
}

/// Lower-cased words of one alternative with every other character turned
/// into a space, so the query parser sees plain terms only. The analyzer
/// splits on the same characters, so no searchable token is lost.
pub fn query_terms(alternative: &str) -> String {
    alternative
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
}

impl ProductIndex {
    /// Builds the disjunctive query for `leaf`, or `None` when the leaf has
    /// no searchable text. Words inside one alternative must all match.
    pub fn category_query(&self, leaf: &str) -> Result<Option<Box<dyn Query>>> {
        let mut parser = QueryParser::for_index(self.index(), vec![self.content_field()]);
        parser.set_conjunction_by_default();

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for alternative in leaf_alternatives(leaf) {
            let terms = query_terms(alternative);
            if terms.trim().is_empty() {
                continue;
            }
            let query = parser.parse_query(&terms).map_err(|source| IndexError::Query {
                query: alternative.to_string(),
                source,
            })?;
            clauses.push((Occur::Should, query));
        }
        Ok(match clauses.len() {
            0 => None,
            1 => clauses.pop().map(|(_, q)| q),
            _ => Some(Box::new(BooleanQuery::new(clauses)) as Box<dyn Query>),
        })
    }

    /// Weighted relevance of `category` for this product: the sum over all
    /// hits of `hit_score * weight(hit_field)`.
    pub fn try_score(&self, category: &CategoryPath, weights: &FieldWeights) -> Result<MatchScore> {
        if self.is_empty() {
            return Ok(0.0);
        }
        let Some(query) = self.category_query(category.leaf())? else {
            return Ok(0.0);
        };
        let limit = usize::try_from(self.num_fields()).unwrap_or(usize::MAX);
        let hits = self.searcher().search(&query, &TopDocs::with_limit(limit))?;
        if !hits.is_empty() {
            debug!(category = %category, leaf = category.leaf(), hits = hits.len(), "category hits");
        }
        let mut total: MatchScore = 0.0;
        for (hit_score, address) in hits {
            let field = self.field_of(address)?;
            let weight = weights.weight(&field);
            debug!(%field, hit_score, weight, "hit");
            total += hit_score * weight;
        }
        Ok(total)
    }

    /// Like [`ProductIndex::try_score`], but a category that cannot be parsed or
    /// searched scores 0 so one bad taxonomy line never stops the run.
    pub fn score(&self, category: &CategoryPath, weights: &FieldWeights) -> MatchScore {
        match self.try_score(category, weights) {
            Ok(score) => score,
            Err(err @ IndexError::Query { .. }) => {
                debug!(category = %category, error = %err, "skipping unparsable category");
                0.0
            }
            Err(err) => {
                warn!(category = %category, error = %err, "category search failed");
                0.0
            }
        }
    }
}

impl CategoryScorer for ProductIndex {
    fn score(&self, category: &CategoryPath, weights: &FieldWeights) -> MatchScore {
        ProductIndex::score(self, category, weights)
    }
}

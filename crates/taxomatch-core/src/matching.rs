//! Per-product aggregation of category scores and winner selection.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::traits::CategoryScorer;
use crate::types::{BestMatch, CategoryPath, FieldWeights, MatchScore};

/// Scores every category of `categories` with `scorer` and picks the winner.
///
/// Empty category strings are skipped. Identical paths accumulate their
/// scores; distinct paths never share score. Returns `None` when nothing
/// scored above zero, which is always the case for an empty taxonomy.
pub fn aggregate<'a, S, I>(scorer: &S, categories: I, weights: &FieldWeights) -> Option<BestMatch>
where
    S: CategoryScorer + ?Sized,
    I: IntoIterator<Item = &'a CategoryPath>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<(&'a CategoryPath, MatchScore)> = Vec::new();

    for category in categories {
        if category.is_empty() {
            continue;
        }
        let score = scorer.score(category, weights);
        if score <= 0.0 {
            continue;
        }
        match positions.get(category.as_str()) {
            Some(&pos) => totals[pos].1 += score,
            None => {
                positions.insert(category.as_str(), totals.len());
                totals.push((category, score));
            }
        }
    }

    debug!(matched = totals.len(), "aggregated category scores");
    best_match(totals.into_iter().map(|(category, score)| (category.clone(), score)))
}

/// Folds `(category, score)` pairs into the best match.
///
/// A higher score always wins. On equal scores the deeper category wins.
/// On equal score and depth the lexicographically smaller path wins, so the
/// result does not depend on the order of `pairs`. Non-positive scores never
/// win.
pub fn best_match<I>(pairs: I) -> Option<BestMatch>
where
    I: IntoIterator<Item = (CategoryPath, MatchScore)>,
{
    pairs
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .fold(None, |best: Option<BestMatch>, (category, score)| match best {
            None => Some(BestMatch { category, score }),
            Some(current) => {
                if prefer(&category, score, &current) {
                    Some(BestMatch { category, score })
                } else {
                    Some(current)
                }
            }
        })
}

fn prefer(category: &CategoryPath, score: MatchScore, current: &BestMatch) -> bool {
    if score > current.score {
        return true;
    }
    if score < current.score {
        return false;
    }
    match category.depth().cmp(&current.category.depth()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => category.as_str() < current.category.as_str(),
    }
}

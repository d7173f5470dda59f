use crate::types::{BestMatch, CategoryPath, FieldWeights, MatchScore};

/// Scores one taxonomy category against an already indexed product.
///
/// Implementations must be pure with respect to the category: scoring one
/// category never changes the score of another on the same index.
pub trait CategoryScorer {
    fn score(&self, category: &CategoryPath, weights: &FieldWeights) -> MatchScore;
}

impl<S: CategoryScorer + ?Sized> CategoryScorer for &S {
    fn score(&self, category: &CategoryPath, weights: &FieldWeights) -> MatchScore {
        (**self).score(category, weights)
    }
}

/// Called by the row driver after every row has been decided.
///
/// `row` is the zero-based position in the catalog; `best` is `None` when no
/// category scored above zero. Calls may arrive out of row order when rows
/// are matched in parallel.
pub trait RowObserver: Send + Sync {
    fn row_finished(&self, row: usize, best: Option<&BestMatch>);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RowObserver for NoopObserver {
    fn row_finished(&self, _row: usize, _best: Option<&BestMatch>) {}
}

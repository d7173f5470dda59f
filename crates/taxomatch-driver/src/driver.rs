use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use taxomatch_core::matching::aggregate;
use taxomatch_core::traits::RowObserver;
use taxomatch_core::types::{BestMatch, CategoryPath, FieldWeights, ProductDocument};
use taxomatch_text::ProductIndex;

/// Matches one product against the whole taxonomy.
///
/// The product index lives only for this call. A product whose index cannot
/// be built is logged and reported as having no match.
pub fn match_row(document: ProductDocument, taxonomy: &[CategoryPath], weights: &FieldWeights) -> Option<BestMatch> {
    let index = match ProductIndex::build(document) {
        Ok(index) => index,
        Err(err) => {
            warn!(error = %err, "failed to index product, leaving it unmatched");
            return None;
        }
    };
    aggregate(&index, taxonomy, weights)
}

/// Matches every document on up to `workers` blocking threads.
///
/// Rows are split into contiguous shards, one per worker. The returned vector
/// is in the same order as `documents`, whatever order the workers finish in.
pub async fn match_rows(
    documents: Vec<ProductDocument>,
    taxonomy: Arc<[CategoryPath]>,
    weights: Arc<FieldWeights>,
    workers: usize,
    observer: Arc<dyn RowObserver>,
) -> Result<Vec<Option<BestMatch>>> {
    let total = documents.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, total);
    let shard_size = total.div_ceil(workers);
    info!(rows = total, workers, categories = taxonomy.len(), "matching catalog rows");

    let mut rows = documents.into_iter().enumerate().peekable();
    let mut handles = Vec::with_capacity(workers);
    while rows.peek().is_some() {
        let shard: Vec<(usize, ProductDocument)> = rows.by_ref().take(shard_size).collect();
        let taxonomy = Arc::clone(&taxonomy);
        let weights = Arc::clone(&weights);
        let observer = Arc::clone(&observer);
        handles.push(tokio::task::spawn_blocking(move || {
            shard
                .into_iter()
                .map(|(row, document)| {
                    let best = match_row(document, &taxonomy, &weights);
                    match &best {
                        Some(hit) => debug!(row, category = %hit.category, score = hit.score, "row matched"),
                        None => debug!(row, "row unmatched"),
                    }
                    observer.row_finished(row, best.as_ref());
                    (row, best)
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut results: Vec<Option<BestMatch>> = vec![None; total];
    for handle in handles {
        for (row, best) in handle.await.context("matching worker panicked")? {
            results[row] = best;
        }
    }
    Ok(results)
}

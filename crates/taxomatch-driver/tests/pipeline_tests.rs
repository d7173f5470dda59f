use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use taxomatch_core::taxonomy::parse_taxonomy;
use taxomatch_core::traits::RowObserver;
use taxomatch_core::types::{BestMatch, CategoryPath, FieldWeights};
use taxomatch_driver::{match_rows, Catalog};

const TAXONOMY: &str = "\
# Google_Product_Taxonomy_Version: test
Furniture
Furniture > Chairs
Furniture > Chairs > Office Chairs
Furniture > Sofas
Furniture > Tables
Home & Garden > Lighting > Lamps
";

#[derive(Default)]
struct Counter(AtomicUsize);

impl RowObserver for Counter {
    fn row_finished(&self, _row: usize, _best: Option<&BestMatch>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn weights() -> Arc<FieldWeights> {
    Arc::new(FieldWeights::new().with("title", 3.0).with("product type", 2.0).with("description", 1.0))
}

#[tokio::test]
async fn catalog_round_trip_fills_missing_categories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("product.csv");
    let output = dir.path().join("product.matched.csv");

    let mut text = String::from("id\ttitle\tproduct type\tdescription\tgoogle product category\n");
    let titles = ["Mesh office chair", "Three seat sofa", "Brass floor lamp", "Oak dining table", "Mystery box"];
    for i in 0..40 {
        let title = titles[i % titles.len()];
        let existing = if i == 1 { "Furniture > Sofas" } else { "" };
        text.push_str(&format!("{i}\t{title}\t\tA {title}\t{existing}\n"));
    }
    fs::write(&input, text).expect("write input");

    let taxonomy: Arc<[CategoryPath]> = parse_taxonomy(TAXONOMY, &[]).into();
    let mut catalog = Catalog::read(&input, b'\t').expect("read");
    assert_eq!(catalog.len(), 40);
    let fields = vec!["title".to_string(), "product type".to_string(), "description".to_string()];
    let documents = catalog.documents(&fields).expect("documents");

    let counter = Arc::new(Counter::default());
    let matches = match_rows(documents, taxonomy, weights(), 4, counter.clone()).await.expect("match");
    assert_eq!(matches.len(), 40);
    assert_eq!(counter.0.load(Ordering::SeqCst), 40);

    for (i, best) in matches.iter().enumerate() {
        let expected = match i % titles.len() {
            0 => Some("Furniture > Chairs > Office Chairs"),
            1 => Some("Furniture > Sofas"),
            2 => Some("Home & Garden > Lighting > Lamps"),
            3 => Some("Furniture > Tables"),
            _ => None,
        };
        assert_eq!(best.as_ref().map(|b| b.category.as_str()), expected, "row {i}");
    }

    let replaced = catalog.apply_matches("google product category", &matches, false);
    // 32 matched rows, one of which already had a category.
    assert_eq!(replaced, 31);
    catalog.write(&output, b'\t').expect("write");

    let reread = Catalog::read(&output, b'\t').expect("reread");
    assert_eq!(reread.headers(), catalog.headers());
    assert_eq!(reread.value(0, "google product category"), Some("Furniture > Chairs > Office Chairs"));
    assert_eq!(reread.value(4, "google product category"), Some(""));
    assert_eq!(reread.value(39, "title"), Some("Mystery box"));
}

#[tokio::test]
async fn overwrite_replaces_every_matched_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("product.csv");
    fs::write(&input, "title\tcategory\nLeather sofa\tOld > Value\nBox\tKeep > Me\n").expect("write input");

    let mut catalog = Catalog::read(&input, b'\t').expect("read");
    let documents = catalog.documents(&["title".to_string()]).expect("documents");
    let taxonomy: Arc<[CategoryPath]> = parse_taxonomy(TAXONOMY, &[]).into();
    let matches = match_rows(documents, taxonomy, weights(), 2, Arc::new(Counter::default())).await.expect("match");

    assert_eq!(catalog.apply_matches("category", &matches, true), 1);
    assert_eq!(catalog.value(0, "category"), Some("Furniture > Sofas"));
    assert_eq!(catalog.value(1, "category"), Some("Keep > Me"));
}

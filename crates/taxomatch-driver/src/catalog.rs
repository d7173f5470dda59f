use anyhow::{Context, Result};
use std::path::Path;

use taxomatch_core::error::Error;
use taxomatch_core::types::{BestMatch, ProductDocument};

/// A delimited product file held in memory: one header row, then one row
/// per product. Cells are kept verbatim so the file can be written back
/// with only the category column changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Catalog {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut catalog = Self { headers, rows };
        catalog.pad_rows();
        catalog
    }

    pub fn read(path: &Path, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;
        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read row {} of {}", i + 1, path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::new(headers, rows))
    }

    pub fn write(&self, path: &Path, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] { &self.headers }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column(column)?;
        self.rows.get(row).and_then(|r| r.get(idx)).map(String::as_str)
    }

    /// One product document per row, built from the searched `fields`.
    /// Every field must be a column of the catalog.
    pub fn documents(&self, fields: &[String]) -> Result<Vec<ProductDocument>> {
        let columns = fields
            .iter()
            .map(|f| {
                self.column(f)
                    .map(|idx| (f.as_str(), idx))
                    .ok_or_else(|| {
                        Error::InvalidConfig(format!("catalog has no column '{}' (columns: {})", f, self.headers.join(", ")))
                    })
            })
            .collect::<std::result::Result<Vec<_>, Error>>()?;
        Ok(self
            .rows
            .iter()
            .map(|row| columns.iter().map(|&(name, idx)| (name, row[idx].as_str())).collect::<ProductDocument>())
            .collect())
    }

    /// Writes each match into `column` (appended if missing) when the row's
    /// cell is empty or `overwrite` is set. A cell holding only whitespace
    /// counts as filled. Returns the number of rows
    /// changed.
    pub fn apply_matches(&mut self, column: &str, matches: &[Option<BestMatch>], overwrite: bool) -> usize {
        let idx = match self.column(column) {
            Some(idx) => idx,
            None => {
                self.headers.push(column.to_string());
                self.pad_rows();
                self.headers.len() - 1
            }
        };
        let mut replacements = 0;
        for (row, best) in self.rows.iter_mut().zip(matches) {
            let Some(best) = best else { continue };
            if overwrite || row[idx].is_empty() {
                row[idx] = best.category.to_string();
                replacements += 1;
            }
        }
        replacements
    }

    fn pad_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxomatch_core::types::CategoryPath;

    fn catalog() -> Catalog {
        Catalog::new(
            vec!["id".into(), "title".into(), "google product category".into()],
            vec![
                vec!["1".into(), "Office chair".into(), "".into()],
                vec!["2".into(), "Sofa".into(), "Furniture > Sofas".into()],
                vec!["3".into()],
            ],
        )
    }

    fn hit(path: &str) -> Option<BestMatch> {
        Some(BestMatch { category: CategoryPath::new(path), score: 1.0 })
    }

    #[test]
    fn short_rows_are_padded() {
        let c = catalog();
        assert_eq!(c.value(2, "title"), Some(""));
        assert_eq!(c.value(2, "google product category"), Some(""));
    }

    #[test]
    fn documents_use_configured_columns_only() {
        let docs = catalog().documents(&["title".to_string()]).expect("documents");
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].get("title"), Some("Office chair"));
        assert_eq!(docs[0].get("id"), None);
        assert!(docs[2].is_empty());
    }

    #[test]
    fn missing_field_column_is_an_error() {
        let err = catalog().documents(&["description".to_string()]).expect_err("missing column");
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))));
    }

    #[test]
    fn existing_categories_survive_without_overwrite() {
        let mut c = catalog();
        let matches = vec![hit("Furniture > Chairs"), hit("Furniture > Chairs"), None];
        assert_eq!(c.apply_matches("google product category", &matches, false), 1);
        assert_eq!(c.value(0, "google product category"), Some("Furniture > Chairs"));
        assert_eq!(c.value(1, "google product category"), Some("Furniture > Sofas"));
        assert_eq!(c.value(2, "google product category"), Some(""));
    }

    #[test]
    fn whitespace_category_counts_as_filled() {
        let mut c = Catalog::new(vec!["title".into(), "category".into()], vec![vec!["Chair".into(), " ".into()]]);
        assert_eq!(c.apply_matches("category", &[hit("Furniture > Chairs")], false), 0);
        assert_eq!(c.value(0, "category"), Some(" "));
        assert_eq!(c.apply_matches("category", &[hit("Furniture > Chairs")], true), 1);
        assert_eq!(c.value(0, "category"), Some("Furniture > Chairs"));
    }

    #[test]
    fn overwrite_replaces_existing_categories() {
        let mut c = catalog();
        let matches = vec![None, hit("Furniture > Chairs"), None];
        assert_eq!(c.apply_matches("google product category", &matches, true), 1);
        assert_eq!(c.value(1, "google product category"), Some("Furniture > Chairs"));
    }

    #[test]
    fn missing_category_column_is_appended() {
        let mut c = Catalog::new(vec!["title".into()], vec![vec!["Chair".into()]]);
        assert_eq!(c.apply_matches("category", &[hit("Furniture > Chairs")], false), 1);
        assert_eq!(c.headers(), &["title".to_string(), "category".to_string()]);
        assert_eq!(c.value(0, "category"), Some("Furniture > Chairs"));
    }
}

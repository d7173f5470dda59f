//! Domain types shared by the indexer, the scorer and the row driver.

use std::collections::HashMap;
use std::fmt;

/// Relevance of one category for one product. Higher is better; values are
/// only comparable within a single product.
pub type MatchScore = f32;

/// The text fields of exactly one catalog row, in configured column order.
///
/// Empty (or whitespace-only) values are never stored, so every field that
/// reaches the indexer carries searchable text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDocument {
    fields: Vec<(String, String)>,
}

impl ProductDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `field`. Returns `false` when the value was skipped
    /// because it holds no text. A repeated field name replaces the old value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        true
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for ProductDocument {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ProductDocument
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

/// A taxonomy line such as `"Furniture > Chairs > Office Chairs"`.
///
/// The raw string is kept verbatim since it is both the accumulation key and
/// the value written back to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryPath(String);

impl CategoryPath {
    pub const SEPARATOR: char = '>';

    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, trimmed. Empty for `""` and for paths ending in `>`.
    pub fn leaf(&self) -> &str {
        self.0
            .rsplit(Self::SEPARATOR)
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Zero-based index of the leaf, i.e. the number of ancestor segments.
    pub fn depth(&self) -> usize {
        self.0.matches(Self::SEPARATOR).count()
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-field multipliers applied to hit relevance. Unknown fields weigh 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldWeights {
    weights: HashMap<String, f32>,
}

impl FieldWeights {
    pub const DEFAULT_WEIGHT: f32 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, weight: f32) -> Self {
        self.weights.insert(field.into(), weight);
        self
    }

    pub fn weight(&self, field: &str) -> f32 {
        self.weights
            .get(field)
            .copied()
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for FieldWeights {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }
}

/// The winning category for one product together with its cumulative score.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub category: CategoryPath,
    pub score: MatchScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_and_depth_follow_separators() {
        let path = CategoryPath::new("Furniture > Chairs > Office Chairs");
        assert_eq!(path.leaf(), "Office Chairs");
        assert_eq!(path.depth(), 2);

        let root = CategoryPath::new("Furniture");
        assert_eq!(root.leaf(), "Furniture");
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn leaf_is_empty_for_trailing_separator() {
        let path = CategoryPath::new("Furniture > ");
        assert_eq!(path.leaf(), "");
        assert_eq!(path.depth(), 1);
        assert_eq!(CategoryPath::new("").leaf(), "");
    }

    #[test]
    fn document_skips_blank_values() {
        let mut doc = ProductDocument::new();
        assert!(doc.insert("title", "Oak table"));
        assert!(!doc.insert("description", "   "));
        assert!(!doc.insert("product type", ""));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("title"), Some("Oak table"));
        assert_eq!(doc.get("description"), None);
    }

    #[test]
    fn document_keeps_insertion_order_and_replaces_duplicates() {
        let mut doc: ProductDocument = [("title", "a"), ("description", "b")].into_iter().collect();
        doc.insert("title", "c");
        let fields: Vec<_> = doc.iter().collect();
        assert_eq!(fields, vec![("title", "c"), ("description", "b")]);
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let weights = FieldWeights::new().with("title", 3.0);
        assert_eq!(weights.weight("title"), 3.0);
        assert_eq!(weights.weight("description"), 1.0);
    }
}

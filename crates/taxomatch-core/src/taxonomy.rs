//! Taxonomy loading: read the category list from a file or URL and keep only
//! the lines below the requested base categories.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::CategoryPath;

/// Where the taxonomy text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomySource {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for TaxonomySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Reads and filters the taxonomy in one step.
pub async fn load_taxonomy(source: &TaxonomySource, base_categories: &[String]) -> Result<Vec<CategoryPath>> {
    let text = read_taxonomy(source).await?;
    let categories = parse_taxonomy(&text, base_categories);
    info!(%source, categories = categories.len(), "loaded taxonomy");
    Ok(categories)
}

pub async fn read_taxonomy(source: &TaxonomySource) -> Result<String> {
    match source {
        TaxonomySource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| Error::Io {
            path: path.display().to_string(),
            source: e,
        }),
        TaxonomySource::Url(url) => {
            debug!(%url, "fetching taxonomy");
            let http = |e: reqwest::Error| Error::Http { url: url.clone(), source: e };
            reqwest::get(url)
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(http)?
                .text()
                .await
                .map_err(http)
        }
    }
}

/// Splits taxonomy text into category paths.
///
/// Blank lines and `#` comment lines are dropped. When `base_categories` is
/// non-empty, a line is kept iff its trimmed, lower-cased text starts with
/// one of the trimmed, lower-cased prefixes. File order is preserved and
/// every line appears at most once per occurrence in the file.
pub fn parse_taxonomy(text: &str, base_categories: &[String]) -> Vec<CategoryPath> {
    let prefixes: Vec<String> = base_categories
        .iter()
        .map(|bc| bc.trim().to_lowercase())
        .filter(|bc| !bc.is_empty())
        .collect();

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .filter(|line| {
            if prefixes.is_empty() {
                return true;
            }
            let normalized = line.trim().to_lowercase();
            prefixes.iter().any(|p| normalized.starts_with(p.as_str()))
        })
        .map(CategoryPath::new)
        .collect()
}

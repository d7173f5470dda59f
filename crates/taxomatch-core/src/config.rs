//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_CATALOG__OVERWRITE_CATEGORY=true`). Provides helpers to expand `~`
//! and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::taxonomy::TaxonomySource;
use crate::types::FieldWeights;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self::from_figment(figment))
    }

    /// Wraps an already assembled figment, e.g. one built in a test.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extracts the full typed settings and validates them.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub taxonomy: TaxonomySettings,
    pub catalog: CatalogSettings,
    /// Searched product columns, in indexing order, with their weights.
    pub fields: Vec<FieldSpec>,
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomySettings {
    pub file: String,
    pub url: String,
    pub fetch_online: bool,
    #[serde(default)]
    pub base_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    pub product_file: String,
    pub output_file: String,
    pub category_column: String,
    pub overwrite_category: bool,
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomySettings {
                file: "taxonomy.en-US.txt".to_string(),
                url: "http://www.google.com/basepages/producttype/taxonomy.en-GB.txt".to_string(),
                fetch_online: true,
                base_categories: Vec::new(),
            },
            catalog: CatalogSettings {
                product_file: "product.csv".to_string(),
                output_file: "product.matched.csv".to_string(),
                category_column: "google product category".to_string(),
                overwrite_category: false,
                delimiter: '\t',
            },
            fields: vec![
                FieldSpec { name: "title".to_string(), weight: 3.0 },
                FieldSpec { name: "product type".to_string(), weight: 2.0 },
                FieldSpec { name: "description".to_string(), weight: 1.0 },
            ],
            matching: MatchingSettings {
                workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            },
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::InvalidConfig("at least one product field is required".to_string()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(Error::InvalidConfig("product field names must not be empty".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate product field '{}'", field.name)));
            }
            if !field.weight.is_finite() || field.weight <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "weight of field '{}' must be a positive number, got {}",
                    field.name, field.weight
                )));
            }
        }
        if self.catalog.category_column.trim().is_empty() {
            return Err(Error::InvalidConfig("catalog.category_column must not be empty".to_string()));
        }
        if !self.catalog.delimiter.is_ascii() {
            return Err(Error::InvalidConfig(format!(
                "catalog.delimiter must be a single ASCII character, got {:?}",
                self.catalog.delimiter
            )));
        }
        if self.matching.workers == 0 {
            return Err(Error::InvalidConfig("matching.workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn field_weights(&self) -> FieldWeights {
        self.fields.iter().map(|f| (f.name.clone(), f.weight)).collect()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// The configured taxonomy location: the URL when fetching online,
    /// otherwise the expanded local file path.
    pub fn taxonomy_source(&self) -> TaxonomySource {
        if self.taxonomy.fetch_online {
            TaxonomySource::Url(self.taxonomy.url.clone())
        } else {
            TaxonomySource::File(expand_path(&self.taxonomy.file))
        }
    }

    /// The delimiter as a byte; `validate` guarantees it is ASCII.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.catalog.delimiter).unwrap_or(b'\t')
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taxomatch_core::config::{expand_path, Config};
use taxomatch_core::taxonomy::load_taxonomy;
use taxomatch_core::traits::RowObserver;
use taxomatch_core::types::{BestMatch, CategoryPath};
use taxomatch_driver::{match_rows, Catalog};

/// Assign taxonomy categories to the products of a catalog file.
#[derive(Parser, Debug)]
#[command(name = "taxomatch", version, about, long_about = None)]
struct Cli {
    /// Only consider categories under these top-level paths, e.g. "Furniture".
    base_category: Vec<String>,

    /// Replace categories already present in the catalog.
    #[arg(short = 'o', long)]
    overwrite: bool,

    /// Log filter, e.g. "debug" or "taxomatch_text=trace". Defaults to RUST_LOG, then "info".
    #[arg(long, value_name = "LEVEL")]
    log: Option<String>,

    /// Catalog to read instead of catalog.product_file.
    #[arg(long, value_name = "PATH")]
    input: Option<String>,

    /// File to write instead of catalog.output_file.
    #[arg(long, value_name = "PATH")]
    output: Option<String>,

    /// Parallel matching workers instead of matching.workers.
    #[arg(long, value_name = "N")]
    workers: Option<usize>,
}

struct ProgressObserver(ProgressBar);

impl RowObserver for ProgressObserver {
    fn row_finished(&self, _row: usize, _best: Option<&BestMatch>) {
        self.0.inc(1);
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("Invalid log filter '{}'", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let mut settings = Config::load()?.settings()?;
    if !cli.base_category.is_empty() {
        settings.taxonomy.base_categories = cli.base_category.clone();
    }
    if let Some(workers) = cli.workers {
        settings.matching.workers = workers;
    }
    settings.validate()?;
    if settings.taxonomy.base_categories.is_empty() {
        warn!("No base category given; matching against the full taxonomy is slow");
    }

    let taxonomy = load_taxonomy(&settings.taxonomy_source(), &settings.taxonomy.base_categories).await?;
    if taxonomy.is_empty() {
        warn!(base_categories = ?settings.taxonomy.base_categories, "Taxonomy is empty, no product will be matched");
    }
    let taxonomy: Arc<[CategoryPath]> = taxonomy.into();

    let input: PathBuf = expand_path(cli.input.as_deref().unwrap_or(&settings.catalog.product_file));
    let output: PathBuf = expand_path(cli.output.as_deref().unwrap_or(&settings.catalog.output_file));
    let delimiter = settings.delimiter_byte();

    let mut catalog = Catalog::read(&input, delimiter)?;
    let documents = catalog.documents(&settings.field_names())?;
    info!(rows = catalog.len(), input = %input.display(), "Loaded catalog");

    let pb = ProgressBar::new(catalog.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let observer = Arc::new(ProgressObserver(pb.clone()));
    let matches = match_rows(
        documents,
        taxonomy,
        Arc::new(settings.field_weights()),
        settings.matching.workers,
        observer,
    )
    .await?;
    pb.finish_with_message("matched");

    let overwrite = cli.overwrite || settings.catalog.overwrite_category;
    let replacements = catalog.apply_matches(&settings.catalog.category_column, &matches, overwrite);
    catalog.write(&output, delimiter)?;

    println!("Rows processed: {}", catalog.len());
    println!("Categories written: {}", replacements);
    println!("Output: {}", output.display());
    Ok(())
}

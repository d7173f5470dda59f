use tantivy::query::QueryParserError;
use tantivy::TantivyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index operation failed: {0}")]
    Tantivy(#[from] TantivyError),

    #[error("Could not parse query '{query}': {source}")]
    Query {
        query: String,
        #[source]
        source: QueryParserError,
    },
}

pub type Result<T> = std::result::Result<T, IndexError>;

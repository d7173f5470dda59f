use tantivy::schema::{Field, Value};
use tantivy::{doc, DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument};
use tracing::trace;

use taxomatch_core::types::ProductDocument;

use crate::error::Result;
use crate::tantivy_utils::{build_schema, register_tokenizer, CONTENT, FIELD_NAME};

/// Smallest per-thread arena tantivy accepts for a writer.
const WRITER_MEMORY_BYTES: usize = 15_000_000;

/// An in-RAM index over the fields of a single product.
///
/// Every non-empty product field becomes its own document, so each search
/// hit can be attributed to the column it came from. The index is built
/// once, queried many times and dropped with the row.
pub struct ProductIndex {
	index: Index,
	searcher: Searcher,
	field_name: Field,
	content: Field,
}

impl ProductIndex {
	pub fn build(document: ProductDocument) -> Result<Self> {
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let field_name = schema.get_field(FIELD_NAME)?;
		let content = schema.get_field(CONTENT)?;

		let mut index_writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
		for (name, text) in document {
			trace!(field = %name, "indexing product field");
			index_writer.add_document(doc!(field_name => name, content => text))?;
		}
		index_writer.commit()?;

		let reader: IndexReader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let searcher = reader.searcher();
		Ok(Self { index, searcher, field_name, content })
	}

	pub fn index(&self) -> &Index { &self.index }

	pub fn searcher(&self) -> &Searcher { &self.searcher }

	pub fn content_field(&self) -> Field { self.content }

	/// Number of indexed product fields.
	pub fn num_fields(&self) -> u64 { self.searcher.num_docs() }

	pub fn is_empty(&self) -> bool { self.num_fields() == 0 }

	/// Product column name stored with the hit document.
	pub fn field_of(&self, address: DocAddress) -> Result<String> {
		let doc: TantivyDocument = self.searcher.doc(address)?;
		Ok(doc.get_first(self.field_name).and_then(|v| v.as_str()).unwrap_or("").to_string())
	}
}

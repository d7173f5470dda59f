use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

/// Name of the stored field holding the product column a document came from.
pub const FIELD_NAME: &str = "field";
/// Name of the analyzed text field.
pub const CONTENT: &str = "content";
/// Tokenizer registered on every product index.
pub const STEM_TOKENIZER: &str = "en_stem";

const STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
];

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _field_name = schema_builder.add_text_field(FIELD_NAME, STRING | STORED);
	let content_indexing = TextFieldIndexing::default().set_tokenizer(STEM_TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let content_options = TextOptions::default().set_indexing_options(content_indexing);
	let _content = schema_builder.add_text_field(CONTENT, content_options);
	schema_builder.build()
}

/// Registers the stemming analyzer used for both product text and category
/// queries, so "Chair" in the taxonomy matches "chairs" in a title.
pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string())))
		.filter(Stemmer::new(Language::English))
		.build();
	index.tokenizers().register(STEM_TOKENIZER, tokenizer);
}

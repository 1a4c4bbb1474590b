pub mod analysis;
pub mod extractor;

pub use analysis::{AzureDocumentAnalyzer, DocumentAnalyzer};
pub use extractor::{extract_fields, Extraction, FieldSources, ReceiptExtractor};

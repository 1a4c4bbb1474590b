pub mod analysis;
pub mod record;

pub use analysis::{AnalyzeResult, AnalyzedDocument, DocumentField};
pub use record::{
    ExtractedRecord, NewRecord, RecordUpdate, StoredRecord, Unit, NOT_FOUND,
    PLACEHOLDER_IMAGE_URL,
};

pub mod url;

pub use self::url::{extract_from_html, merge_ai_result, process, Extraction, ExtractionMethod};

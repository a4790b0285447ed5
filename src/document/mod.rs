mod extractor;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{extract, extract_file, extract_upload, join_pages, ExtractedText};

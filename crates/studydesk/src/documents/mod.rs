pub mod download;
pub mod generator;

pub use download::{filename_from_content_disposition, DownloadedDocument, DEFAULT_DOWNLOAD_NAME};
pub use generator::{
    DocumentError, DocumentGenerator, GenerationView, AI_GENERATED_SECTIONS, ALL_SECTIONS,
    BASIC_SECTIONS, REQUIRED_SECTION,
};

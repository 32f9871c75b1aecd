//! Filename resolution for downloaded documents.

/// Fallback name when the server sends no usable Content-Disposition.
pub const DEFAULT_DOWNLOAD_NAME: &str = "generated_document.docx";

/// A downloaded document ready to be written wherever the caller wants.
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Resolves the download filename from a Content-Disposition header,
/// falling back to [`DEFAULT_DOWNLOAD_NAME`] when the header is absent
/// or malformed.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    header
        .and_then(parse_filename)
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

fn parse_filename(header: &str) -> Option<String> {
    let start = header.find("filename=")?;
    let rest = &header[start + "filename=".len()..];
    let token = rest.split(';').next()?.trim();
    let name = token.trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

//! Mimetype detection
//!
//! Extension first, then a look at the leading bytes for files whose name
//! says nothing.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Fallback when nothing matches
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Bytes read for content sniffing
const SNIFF_LEN: usize = 512;

/// Lowercase a mimetype and drop parameters (`text/plain; charset=utf-8`)
pub fn normalize_mimetype(mimetype: &str) -> String {
    mimetype
        .split(';')
        .next()
        .unwrap_or(mimetype)
        .trim()
        .to_ascii_lowercase()
}

/// Detect the mimetype of the file at `path`
pub fn detect_mimetype(path: &Path) -> String {
    if let Some(mimetype) = mime_guess::from_path(path).first_raw() {
        debug!("Mimetype of {} from extension: {}", path.display(), mimetype);
        return mimetype.to_string();
    }

    let sniffed = sniff_mimetype(path).unwrap_or(OCTET_STREAM);
    debug!("Mimetype of {} from content: {}", path.display(), sniffed);
    sniffed.to_string()
}

fn sniff_mimetype(path: &Path) -> Option<&'static str> {
    let mut file = File::open(path).ok()?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.by_ref()
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)
        .ok()?;

    sniff_bytes(&header)
}

/// Classify a file header
pub fn sniff_bytes(header: &[u8]) -> Option<&'static str> {
    if header.is_empty() {
        return None;
    }
    if header.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if let Ok(format) = image::guess_format(header) {
        return Some(format.to_mime_type());
    }
    if looks_like_text(header) {
        return Some("text/plain");
    }
    None
}

/// Valid UTF-8 without NUL bytes; a multi-byte char cut off at the end of
/// the header still counts.
fn looks_like_text(header: &[u8]) -> bool {
    if header.contains(&0) {
        return false;
    }
    match std::str::from_utf8(header) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

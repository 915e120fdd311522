//! Plain text previews

use crate::builder::mimetype::detect_mimetype;
use crate::builder::traits::{BuildTarget, BuilderFamily, PreviewBuilder};
use crate::cache::publish_atomically;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{ImgDims, PreviewKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

const TEXT_MIMETYPES: &[&str] = &[
    "text/plain",
    "text/csv",
    "text/markdown",
    "text/x-markdown",
    "text/html",
    "text/xml",
    "text/css",
    "text/javascript",
    "text/x-python",
    "text/x-rust",
    "text/x-yaml",
    "text/x-toml",
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-sh",
    "application/toml",
    "application/x-yaml",
    "image/svg+xml",
];

const TEXT_CAPABILITIES: &[PreviewKind] = &[PreviewKind::Text, PreviewKind::Html, PreviewKind::Json];

fn read_text(path: &Path) -> PreviewResult<String> {
    let bytes =
        fs::read(path).map_err(|e| PreviewError::io(format!("reading {}", path.display()), e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_artifact(out: &Path, content: &[u8]) -> PreviewResult<()> {
    publish_atomically(out, |tmp| {
        fs::write(tmp, content).map_err(|e| PreviewError::io(format!("writing {}", tmp.display()), e))
    })
}

/// Standalone HTML page showing `content` verbatim
fn render_html(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        html_escape::encode_text(title),
        html_escape::encode_text(content)
    )
}

/// JSON metadata written for text files
#[derive(Debug, Serialize)]
struct TextMetadata {
    size: u64,
    mimetype: String,
    lines: usize,
    characters: usize,
    modified: Option<String>,
}

/// Builder for plain text and text-like formats
#[derive(Debug, Default)]
pub struct PlainTextPreviewBuilder;

impl PlainTextPreviewBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl PreviewBuilder for PlainTextPreviewBuilder {
    fn name(&self) -> &'static str {
        "text"
    }

    fn family(&self) -> BuilderFamily {
        BuilderFamily::Text
    }

    fn mimetypes(&self) -> &'static [&'static str] {
        TEXT_MIMETYPES
    }

    fn capabilities(&self) -> &'static [PreviewKind] {
        TEXT_CAPABILITIES
    }

    fn get_original_size(&self, _path: &Path, _page: Option<u32>) -> PreviewResult<ImgDims> {
        Err(PreviewError::OriginalSizeUnavailable {
            builder: self.name(),
        })
    }

    fn get_page_number(&self, _path: &Path, _cache_key: &str, _cache_dir: &Path) -> PreviewResult<u32> {
        Ok(1)
    }

    fn build_text_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let content = read_text(path)?;
        let out = target.path();
        write_artifact(&out, content.as_bytes())?;
        info!("Built text preview {} from {}", out.display(), path.display());
        Ok(())
    }

    fn build_html_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let content = read_text(path)?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let out = target.path();
        write_artifact(&out, render_html(&title, &content).as_bytes())?;
        info!("Built HTML preview {} from {}", out.display(), path.display());
        Ok(())
    }

    fn build_json_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let content = read_text(path)?;
        let file_meta = fs::metadata(path)
            .map_err(|e| PreviewError::io(format!("reading metadata of {}", path.display()), e))?;

        let metadata = TextMetadata {
            size: file_meta.len(),
            mimetype: detect_mimetype(path),
            lines: content.lines().count(),
            characters: content.chars().count(),
            modified: file_meta
                .modified()
                .ok()
                .map(|time| DateTime::<Utc>::from(time).to_rfc3339()),
        };

        let out = target.path();
        write_artifact(&out, &serde_json::to_vec_pretty(&metadata)?)?;
        info!("Built JSON preview {} from {}", out.display(), path.display());
        Ok(())
    }
}

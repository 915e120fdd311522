//! Preview builder abstraction
//!
//! A builder converts documents of one mimetype family into preview
//! artifacts. The manager only ever talks to builders through this trait:
//! - images: `image` crate
//! - PDF: poppler command-line tools
//! - office documents: LibreOffice (PDF only, JPEG via the PDF builder)
//! - plain text

use crate::cache::artifact_path;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{ImgDims, PreviewKind};
use std::path::{Path, PathBuf};

/// Mimetype families with distinct conversion strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderFamily {
    /// Raster images decoded in-process
    Image,
    /// PDF documents
    Pdf,
    /// Office documents that can only be converted to PDF
    Office,
    /// Plain text and text-like formats
    Text,
}

impl BuilderFamily {
    /// Get a human-readable family name
    pub fn name(&self) -> &'static str {
        match self {
            BuilderFamily::Image => "image",
            BuilderFamily::Pdf => "pdf",
            BuilderFamily::Office => "office",
            BuilderFamily::Text => "text",
        }
    }
}

/// Where a build must leave its artifact: `<cache_dir>/<cache_key><extension>`
#[derive(Debug, Clone, Copy)]
pub struct BuildTarget<'a> {
    pub cache_key: &'a str,
    pub cache_dir: &'a Path,
    pub extension: &'a str,
}

impl<'a> BuildTarget<'a> {
    pub fn new(cache_key: &'a str, cache_dir: &'a Path, extension: &'a str) -> Self {
        Self {
            cache_key,
            cache_dir,
            extension,
        }
    }

    /// Full artifact path
    pub fn path(&self) -> PathBuf {
        artifact_path(self.cache_dir, self.cache_key, self.extension)
    }
}

/// Per-mimetype-family preview converter.
///
/// Each build operation either leaves a readable file at
/// [`BuildTarget::path`] or fails. Kinds outside [`capabilities`] fail with
/// `UnavailablePreviewType`, which is what the provided methods do.
///
/// [`capabilities`]: PreviewBuilder::capabilities
pub trait PreviewBuilder: Send + Sync {
    /// Short builder name for logs and errors
    fn name(&self) -> &'static str;

    /// Family this builder belongs to
    fn family(&self) -> BuilderFamily;

    /// Mimetypes this builder registers for
    fn mimetypes(&self) -> &'static [&'static str];

    /// Preview kinds this builder can produce
    fn capabilities(&self) -> &'static [PreviewKind];

    /// Whether `kind` is in [`PreviewBuilder::capabilities`]
    fn supports(&self, kind: PreviewKind) -> bool {
        self.capabilities().contains(&kind)
    }

    /// Native size of the document (or of `page` for paged documents)
    fn get_original_size(&self, path: &Path, page: Option<u32>) -> PreviewResult<ImgDims>;

    /// Number of pages. `cache_key`/`cache_dir` let the builder reuse or
    /// store intermediate artifacts.
    fn get_page_number(&self, path: &Path, cache_key: &str, cache_dir: &Path)
        -> PreviewResult<u32>;

    fn build_jpeg_preview(
        &self,
        _path: &Path,
        _target: &BuildTarget<'_>,
        _page: Option<u32>,
        _size: Option<ImgDims>,
    ) -> PreviewResult<()> {
        Err(self.unavailable(PreviewKind::Jpeg))
    }

    fn build_pdf_preview(
        &self,
        _path: &Path,
        _target: &BuildTarget<'_>,
        _page: Option<u32>,
    ) -> PreviewResult<()> {
        Err(self.unavailable(PreviewKind::Pdf))
    }

    fn build_text_preview(&self, _path: &Path, _target: &BuildTarget<'_>) -> PreviewResult<()> {
        Err(self.unavailable(PreviewKind::Text))
    }

    fn build_html_preview(&self, _path: &Path, _target: &BuildTarget<'_>) -> PreviewResult<()> {
        Err(self.unavailable(PreviewKind::Html))
    }

    fn build_json_preview(&self, _path: &Path, _target: &BuildTarget<'_>) -> PreviewResult<()> {
        Err(self.unavailable(PreviewKind::Json))
    }

    /// The error for a kind this builder cannot produce
    fn unavailable(&self, kind: PreviewKind) -> PreviewError {
        PreviewError::UnavailablePreviewType {
            builder: self.name(),
            kind,
        }
    }
}

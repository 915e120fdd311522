//! Preview kinds, request options and the caching manager

mod manager;

pub use manager::PreviewManager;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default JPEG preview height in pixels
pub const DEFAULT_JPEG_HEIGHT: u32 = 256;

/// Output kinds a builder may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Jpeg,
    Pdf,
    Text,
    Html,
    Json,
}

impl PreviewKind {
    /// Cache file extension, dot included
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => ".jpeg",
            Self::Pdf => ".pdf",
            Self::Text => ".txt",
            Self::Html => ".html",
            Self::Json => ".json",
        }
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImgDims {
    pub width: u32,
    pub height: u32,
}

impl ImgDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ImgDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Options for a JPEG preview request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Page to render; `None` means the builder's default page
    pub page: Option<u32>,
    /// Target height
    pub height: u32,
    /// Target width; `None` means same as height
    pub width: Option<u32>,
    /// Rebuild even if the artifact exists
    pub force: bool,
    /// Prefix the key with the source base name (only honoured for the
    /// intermediate PDF of office documents)
    pub use_original_filename: bool,
    /// Ignore width/height and keep the source's native size
    pub with_original_size: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            page: None,
            height: DEFAULT_JPEG_HEIGHT,
            width: None,
            force: false,
            use_original_filename: false,
            with_original_size: false,
        }
    }
}

impl JpegOptions {
    /// Dimensions handed to the builder.
    ///
    /// `None` asks the builder for the source's native size.
    pub fn target_size(&self) -> Option<ImgDims> {
        if self.with_original_size {
            return None;
        }
        let width = self.width.unwrap_or(self.height);
        Some(ImgDims::new(width, self.height))
    }
}

/// Options shared by the PDF, text, HTML and JSON preview requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Page selection (PDF only)
    pub page: Option<u32>,
    /// Rebuild even if the artifact exists
    pub force: bool,
    /// Prefix the key with the source base name
    pub use_original_filename: bool,
}

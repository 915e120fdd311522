//! Configuration schema for docpreview
//!
//! Configuration is stored at `~/.config/docpreview/config.toml`

use crate::preview::DEFAULT_JPEG_HEIGHT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache directory settings
    pub cache: CacheConfig,

    /// JPEG preview defaults
    pub jpeg: JpegConfig,

    /// External conversion tools
    pub tools: ToolsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Cache directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory (defaults to the platform cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Create the cache directory when missing
    pub create_folder: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            create_folder: true,
        }
    }
}

/// JPEG preview defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    /// Height used when none is given
    pub default_height: u32,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_JPEG_HEIGHT,
        }
    }
}

/// External conversion tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// LibreOffice executable
    pub libreoffice: String,

    /// poppler `pdftoppm`
    pub pdftoppm: String,

    /// poppler `pdftotext`
    pub pdftotext: String,

    /// poppler `pdfinfo`
    pub pdfinfo: String,

    /// poppler `pdfseparate`
    pub pdfseparate: String,

    /// Rasterisation resolution for PDF pages
    pub render_dpi: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            libreoffice: "soffice".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            pdftotext: "pdftotext".to_string(),
            pdfinfo: "pdfinfo".to_string(),
            pdfseparate: "pdfseparate".to_string(),
            render_dpi: 150,
        }
    }
}

//! Error types for docpreview
//!
//! All modules use `PreviewResult<T>` as their return type.

use crate::preview::PreviewKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docpreview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// All errors that can occur while resolving or building a preview
#[derive(Error, Debug)]
pub enum PreviewError {
    // Dispatch errors
    #[error("Unsupported mimetype: {0}")]
    UnsupportedMimetype(String),

    #[error("Unavailable preview type: {builder} cannot produce a {kind} preview")]
    UnavailablePreviewType {
        builder: &'static str,
        kind: PreviewKind,
    },

    #[error("Original size unavailable: {builder} does not report page dimensions")]
    OriginalSizeUnavailable { builder: &'static str },

    #[error("Page out of range: {0}")]
    PageOutOfRange(u32),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // External tool errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Unexpected output from {command}: {reason}")]
    ToolOutput { command: String, reason: String },

    // Codec and serialization errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PreviewError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedMimetype(_) => {
                Some("Run: docpreview mimetype <file> to see what was detected")
            }
            Self::UnavailablePreviewType { .. } => {
                Some("Pick another preview kind for this document type")
            }
            Self::PageOutOfRange(_) => Some("Pages are 0-based; run: docpreview pages <file>"),
            Self::CommandFailed { command, .. } if command.starts_with("soffice") => {
                Some("Install LibreOffice or set tools.libreoffice in the config")
            }
            Self::CommandFailed { command, .. } if command.starts_with("pdf") => {
                Some("Install poppler-utils (pdftoppm, pdftotext, pdfinfo, pdfseparate)")
            }
            _ => None,
        }
    }
}

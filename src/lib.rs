//! docpreview - cached document previews
//!
//! Turns images, PDFs, office documents and text files into JPEG, PDF,
//! text, HTML and JSON previews, stored in a flat cache directory under
//! deterministic names.

pub mod builder;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod preview;

pub use error::{PreviewError, PreviewResult};
pub use preview::{ImgDims, JpegOptions, PreviewKind, PreviewManager, PreviewOptions};

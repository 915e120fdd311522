//! Preview builders
//!
//! Provides the per-mimetype conversion backends:
//! - Images: decoded in-process
//! - PDF: poppler tools
//! - Office documents: LibreOffice, PDF only
//! - Plain text

mod command;
mod factory;
mod raster;
pub mod mimetype;
mod office;
pub mod pdf;
mod text;
mod traits;

pub use factory::BuilderFactory;
pub use raster::ImagePreviewBuilder;
pub use mimetype::detect_mimetype;
pub use office::OfficePreviewBuilder;
pub use pdf::PdfPreviewBuilder;
pub use text::PlainTextPreviewBuilder;
pub use traits::{BuildTarget, BuilderFamily, PreviewBuilder};

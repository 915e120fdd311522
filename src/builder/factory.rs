//! Builder registry keyed by mimetype
//!
//! Owned by the manager and reused across requests. Nothing here caches a
//! per-file decision: the mimetype is detected again on every request.

use crate::builder::raster::ImagePreviewBuilder;
use crate::builder::mimetype::{detect_mimetype, normalize_mimetype};
use crate::builder::office::OfficePreviewBuilder;
use crate::builder::pdf::PdfPreviewBuilder;
use crate::builder::text::PlainTextPreviewBuilder;
use crate::builder::traits::PreviewBuilder;
use crate::config::ToolsConfig;
use crate::error::{PreviewError, PreviewResult};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const TEXT_PREFIX: &str = "text/";
const TEXT_FALLBACK: &str = "text/plain";

/// Registry mapping mimetypes to builders
#[derive(Clone, Default)]
pub struct BuilderFactory {
    builders: HashMap<String, Arc<dyn PreviewBuilder>>,
}

impl BuilderFactory {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the image, PDF, office and plain text builders
    pub fn with_default_builders(tools: &ToolsConfig) -> Self {
        let mut factory = Self::new();
        factory.register(Arc::new(ImagePreviewBuilder::new()));
        factory.register(Arc::new(PdfPreviewBuilder::new(tools.clone())));
        factory.register(Arc::new(OfficePreviewBuilder::new(tools.clone())));
        factory.register(Arc::new(PlainTextPreviewBuilder::new()));
        factory
    }

    /// Register `builder` for each of its mimetypes. Later registrations
    /// replace earlier ones.
    pub fn register(&mut self, builder: Arc<dyn PreviewBuilder>) {
        for mimetype in builder.mimetypes() {
            self.builders
                .insert(normalize_mimetype(mimetype), Arc::clone(&builder));
        }
    }

    /// Detect the mimetype of `path`
    pub fn detect_mimetype(&self, path: &Path) -> String {
        detect_mimetype(path)
    }

    /// Builder registered for `mimetype`, if any. Unregistered `text/*`
    /// types fall back to the `text/plain` builder.
    pub fn find_builder(&self, mimetype: &str) -> Option<Arc<dyn PreviewBuilder>> {
        let mimetype = normalize_mimetype(mimetype);
        self.builders
            .get(&mimetype)
            .or_else(|| {
                mimetype
                    .starts_with(TEXT_PREFIX)
                    .then(|| self.builders.get(TEXT_FALLBACK))
                    .flatten()
            })
            .cloned()
    }

    /// Builder registered for `mimetype`
    pub fn select_builder(&self, mimetype: &str) -> PreviewResult<Arc<dyn PreviewBuilder>> {
        let builder = self
            .find_builder(mimetype)
            .ok_or_else(|| PreviewError::UnsupportedMimetype(mimetype.to_string()))?;
        debug!(
            "Selected {} builder ({} family) for {}",
            builder.name(),
            builder.family().name(),
            mimetype
        );
        Ok(builder)
    }

    /// All registered mimetypes, sorted
    pub fn mimetypes(&self) -> Vec<&str> {
        let mut mimetypes: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        mimetypes.sort_unstable();
        mimetypes
    }
}

impl fmt::Debug for BuilderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderFactory")
            .field("mimetypes", &self.mimetypes())
            .finish()
    }
}

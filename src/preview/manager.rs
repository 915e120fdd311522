//! Preview manager
//!
//! Every preview request runs the same sequence:
//! resolve builder -> check capability -> derive key -> check cache -> build.
//! The check-then-build part runs under a per-artifact lock.

use crate::builder::{BuildTarget, BuilderFactory, BuilderFamily, PreviewBuilder};
use crate::cache::{derive_cache_key, CacheStore, KeyLocks};
use crate::config::ToolsConfig;
use crate::error::PreviewResult;
use crate::preview::{ImgDims, JpegOptions, PreviewKind, PreviewOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const PDF_MIMETYPE: &str = "application/pdf";

/// Cached preview generation for a single cache directory
#[derive(Debug)]
pub struct PreviewManager {
    store: CacheStore,
    factory: BuilderFactory,
    locks: KeyLocks,
}

impl PreviewManager {
    /// Manager with the default builders.
    ///
    /// With `create_folder`, the cache directory is created if missing. A
    /// failure to do so is logged and the manager is still returned.
    pub fn new(cache_dir: impl Into<PathBuf>, create_folder: bool) -> Self {
        let factory = BuilderFactory::with_default_builders(&ToolsConfig::default());
        Self::with_factory(cache_dir, factory, create_folder)
    }

    /// Manager using an explicit builder registry
    pub fn with_factory(
        cache_dir: impl Into<PathBuf>,
        factory: BuilderFactory,
        create_folder: bool,
    ) -> Self {
        let store = CacheStore::new(cache_dir);
        if create_folder {
            store.ensure_dir();
        }
        Self {
            store,
            factory,
            locks: KeyLocks::new(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        self.store.dir()
    }

    pub fn factory(&self) -> &BuilderFactory {
        &self.factory
    }

    /// Detected mimetype of `path`
    pub fn get_mimetype(&self, path: &Path) -> String {
        self.factory.detect_mimetype(path)
    }

    /// Whether `<cache_dir>/<key><extension>` exists
    pub fn exists_preview(&self, key: &str, extension: &str) -> bool {
        self.store.exists(key, extension)
    }

    /// Whether a `kind` preview of `path` can be built, without building it
    pub fn has_preview(&self, path: &Path, kind: PreviewKind) -> PreviewResult<bool> {
        let builder = self.resolve(path)?;
        if builder.supports(kind) {
            return Ok(true);
        }
        if kind == PreviewKind::Jpeg && builder.family() == BuilderFamily::Office {
            return Ok(builder.supports(PreviewKind::Pdf)
                && self
                    .factory
                    .find_builder(PDF_MIMETYPE)
                    .is_some_and(|pdf| pdf.supports(PreviewKind::Jpeg)));
        }
        Ok(false)
    }

    /// Native size of `path` (or of one page). Never cached.
    pub fn get_original_size(&self, path: &Path, page: Option<u32>) -> PreviewResult<ImgDims> {
        self.resolve(path)?.get_original_size(path, page)
    }

    /// Number of pages of `path`.
    ///
    /// The key handed to the builder lets it reuse intermediate artifacts;
    /// a builder that does so may report a stale count after the source
    /// changes.
    pub fn get_nb_page(&self, path: &Path) -> PreviewResult<u32> {
        let builder = self.resolve(path)?;
        let key = derive_cache_key(&path.to_string_lossy(), None, None, false);
        builder.get_page_number(path, &key, self.store.dir())
    }

    /// JPEG preview of `path`.
    ///
    /// Office documents are first converted to a cached PDF, which is then
    /// rendered by whichever builder handles PDF.
    pub fn get_jpeg_preview(&self, path: &Path, options: &JpegOptions) -> PreviewResult<PathBuf> {
        let mut source = path.to_path_buf();
        let mut builder = self.resolve(&source)?;

        if builder.family() == BuilderFamily::Office {
            let pdf_options = PreviewOptions {
                page: None,
                force: options.force,
                use_original_filename: options.use_original_filename,
            };
            source = self.get_pdf_preview(path, &pdf_options)?;
            builder = self.resolve(&source)?;
        }
        self.ensure_supported(builder.as_ref(), PreviewKind::Jpeg)?;

        let size = options.target_size();
        let key = derive_cache_key(&source.to_string_lossy(), size, options.page, false);
        self.fetch(PreviewKind::Jpeg, &key, options.force, |target| {
            builder.build_jpeg_preview(&source, target, options.page, size)
        })
    }

    /// PDF preview of `path`, optionally restricted to one page
    pub fn get_pdf_preview(&self, path: &Path, options: &PreviewOptions) -> PreviewResult<PathBuf> {
        let builder = self.resolve(path)?;
        self.ensure_supported(builder.as_ref(), PreviewKind::Pdf)?;

        let key = derive_cache_key(
            &path.to_string_lossy(),
            None,
            options.page,
            options.use_original_filename,
        );
        self.fetch(PreviewKind::Pdf, &key, options.force, |target| {
            builder.build_pdf_preview(path, target, options.page)
        })
    }

    /// Plain text preview of `path`
    pub fn get_text_preview(&self, path: &Path, options: &PreviewOptions) -> PreviewResult<PathBuf> {
        self.simple_preview(path, PreviewKind::Text, options, |builder, target| {
            builder.build_text_preview(path, target)
        })
    }

    /// HTML preview of `path`
    pub fn get_html_preview(&self, path: &Path, options: &PreviewOptions) -> PreviewResult<PathBuf> {
        self.simple_preview(path, PreviewKind::Html, options, |builder, target| {
            builder.build_html_preview(path, target)
        })
    }

    /// JSON metadata preview of `path`
    pub fn get_json_preview(&self, path: &Path, options: &PreviewOptions) -> PreviewResult<PathBuf> {
        self.simple_preview(path, PreviewKind::Json, options, |builder, target| {
            builder.build_json_preview(path, target)
        })
    }

    /// Shared flow for the single-artifact kinds (text, HTML, JSON), which
    /// ignore the page selection
    fn simple_preview<F>(
        &self,
        path: &Path,
        kind: PreviewKind,
        options: &PreviewOptions,
        build: F,
    ) -> PreviewResult<PathBuf>
    where
        F: FnOnce(&dyn PreviewBuilder, &BuildTarget<'_>) -> PreviewResult<()>,
    {
        let builder = self.resolve(path)?;
        self.ensure_supported(builder.as_ref(), kind)?;

        let key = derive_cache_key(
            &path.to_string_lossy(),
            None,
            None,
            options.use_original_filename,
        );
        self.fetch(kind, &key, options.force, |target| {
            build(builder.as_ref(), target)
        })
    }

    fn resolve(&self, path: &Path) -> PreviewResult<Arc<dyn PreviewBuilder>> {
        let mimetype = self.factory.detect_mimetype(path);
        self.factory.select_builder(&mimetype)
    }

    fn ensure_supported(&self, builder: &dyn PreviewBuilder, kind: PreviewKind) -> PreviewResult<()> {
        if builder.supports(kind) {
            Ok(())
        } else {
            Err(builder.unavailable(kind))
        }
    }

    /// Return the artifact path for `key`, building it first on a miss or
    /// when `force` is set
    fn fetch<F>(&self, kind: PreviewKind, key: &str, force: bool, build: F) -> PreviewResult<PathBuf>
    where
        F: FnOnce(&BuildTarget<'_>) -> PreviewResult<()>,
    {
        let extension = kind.extension();
        let target = BuildTarget::new(key, self.store.dir(), extension);
        let artifact = target.path();

        let lock_name = format!("{}{}", key, extension);
        self.locks.with_lock(&lock_name, || -> PreviewResult<()> {
            if !force && self.store.exists(key, extension) {
                debug!("Cache hit: {}", artifact.display());
                return Ok(());
            }
            debug!("Cache miss: {} (force: {})", artifact.display(), force);
            build(&target)?;
            info!("Built {} preview {}", kind, artifact.display());
            Ok(())
        })?;

        Ok(artifact)
    }
}

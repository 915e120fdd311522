//! Office document previews via headless LibreOffice
//!
//! Office documents only convert to PDF here. JPEG previews go through the
//! manager, which renders the cached PDF with the PDF builder.

use crate::builder::command::run_tool;
use crate::builder::pdf::{pdf_page_count, pdf_page_size};
use crate::builder::traits::{BuildTarget, BuilderFamily, PreviewBuilder};
use crate::cache::{artifact_path, publish_atomically};
use crate::config::ToolsConfig;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{ImgDims, PreviewKind};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const OFFICE_MIMETYPES: &[&str] = &[
    "application/vnd.oasis.opendocument.text",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.presentation",
    "application/vnd.oasis.opendocument.graphics",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/rtf",
    "text/rtf",
];

const OFFICE_CAPABILITIES: &[PreviewKind] = &[PreviewKind::Pdf];

const PDF_EXTENSION: &str = ".pdf";

/// Builder for office documents
#[derive(Debug, Default)]
pub struct OfficePreviewBuilder {
    tools: ToolsConfig,
}

impl OfficePreviewBuilder {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }

    /// Arguments for `soffice` converting `source` into `outdir`.
    ///
    /// A private user profile keeps concurrent conversions from fighting
    /// over the default profile lock.
    fn convert_args(source: &Path, outdir: &Path, profile: &Path) -> Vec<OsString> {
        let mut profile_arg = OsString::from("-env:UserInstallation=file://");
        profile_arg.push(profile.as_os_str());

        vec![
            profile_arg,
            OsString::from("--headless"),
            OsString::from("--convert-to"),
            OsString::from("pdf"),
            OsString::from("--outdir"),
            outdir.as_os_str().to_os_string(),
            source.as_os_str().to_os_string(),
        ]
    }

    /// Convert `source` to PDF inside `workdir` and return the produced file
    fn convert_to_pdf(&self, source: &Path, workdir: &Path) -> PreviewResult<PathBuf> {
        let outdir = workdir.join("out");
        let profile = workdir.join("profile");
        run_tool(&self.tools.libreoffice, Self::convert_args(source, &outdir, &profile))?;

        let stem = source
            .file_stem()
            .ok_or_else(|| PreviewError::PathNotFound(source.to_path_buf()))?;
        let mut file_name = stem.to_os_string();
        file_name.push(PDF_EXTENSION);
        let produced = outdir.join(file_name);
        if !produced.exists() {
            return Err(PreviewError::ToolOutput {
                command: self.tools.libreoffice.clone(),
                reason: format!("no PDF produced for {}", source.display()),
            });
        }
        Ok(produced)
    }

    /// Cached full-document PDF at `<cache_dir>/<cache_key>.pdf`, converted
    /// on first use. Never refreshed afterwards.
    fn cached_pdf(&self, source: &Path, cache_key: &str, cache_dir: &Path) -> PreviewResult<PathBuf> {
        let path = artifact_path(cache_dir, cache_key, PDF_EXTENSION);
        if path.exists() {
            debug!("Reusing converted PDF {}", path.display());
            return Ok(path);
        }

        let target = BuildTarget::new(cache_key, cache_dir, PDF_EXTENSION);
        self.build_pdf_preview(source, &target, None)?;
        Ok(path)
    }
}

impl PreviewBuilder for OfficePreviewBuilder {
    fn name(&self) -> &'static str {
        "office"
    }

    fn family(&self) -> BuilderFamily {
        BuilderFamily::Office
    }

    fn mimetypes(&self) -> &'static [&'static str] {
        OFFICE_MIMETYPES
    }

    fn capabilities(&self) -> &'static [PreviewKind] {
        OFFICE_CAPABILITIES
    }

    fn get_original_size(&self, path: &Path, page: Option<u32>) -> PreviewResult<ImgDims> {
        let workdir = tempfile::tempdir()
            .map_err(|e| PreviewError::io("creating conversion directory", e))?;
        let pdf = self.convert_to_pdf(path, workdir.path())?;
        pdf_page_size(&self.tools, &pdf, page)
    }

    fn get_page_number(&self, path: &Path, cache_key: &str, cache_dir: &Path) -> PreviewResult<u32> {
        let pdf = self.cached_pdf(path, cache_key, cache_dir)?;
        pdf_page_count(&self.tools, &pdf)
    }

    /// Always converts the whole document; page selection happens when the
    /// PDF is rendered.
    fn build_pdf_preview(
        &self,
        path: &Path,
        target: &BuildTarget<'_>,
        _page: Option<u32>,
    ) -> PreviewResult<()> {
        let workdir = tempfile::tempdir()
            .map_err(|e| PreviewError::io("creating conversion directory", e))?;
        let produced = self.convert_to_pdf(path, workdir.path())?;

        let out = target.path();
        publish_atomically(&out, |tmp| {
            fs::copy(&produced, tmp)
                .map(|_| ())
                .map_err(|e| PreviewError::io(format!("copying {}", produced.display()), e))
        })?;
        info!("Built PDF preview {} from {}", out.display(), path.display());
        Ok(())
    }
}

//! PDF previews using the poppler command-line tools
//!
//! - `pdfinfo` for page count, page size and document metadata
//! - `pdftoppm` to rasterise one page, which is then fit/padded in-process
//! - `pdftotext` for text extraction
//! - `pdfseparate` to extract a single page as its own PDF

use crate::builder::command::run_tool;
use crate::builder::raster::write_jpeg;
use crate::builder::traits::{BuildTarget, BuilderFamily, PreviewBuilder};
use crate::cache::publish_atomically;
use crate::config::ToolsConfig;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{ImgDims, PreviewKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use tracing::info;

const PDF_MIMETYPES: &[&str] = &["application/pdf", "application/x-pdf"];

const PDF_CAPABILITIES: &[PreviewKind] = &[
    PreviewKind::Jpeg,
    PreviewKind::Pdf,
    PreviewKind::Text,
    PreviewKind::Json,
];

/// Parsed `pdfinfo` output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PdfInfo {
    /// Every `Key: value` line, verbatim
    pub fields: BTreeMap<String, String>,
    /// Page count
    pub pages: u32,
    /// Document-wide page size (`Page size:`), in points
    #[serde(skip)]
    pub page_size: Option<ImgDims>,
    /// Per-page sizes (`Page    N size:`), 1-based, in points
    #[serde(skip)]
    pub page_sizes: BTreeMap<u32, ImgDims>,
}

impl PdfInfo {
    /// Size of a 0-based page, falling back to the document-wide size.
    /// Points map 1:1 to pixels at 72 dpi.
    pub fn size_of(&self, page: Option<u32>) -> Option<ImgDims> {
        page.unwrap_or(0)
            .checked_add(1)
            .and_then(|number| self.page_sizes.get(&number).copied())
            .or(self.page_size)
    }
}

/// 1-based page number passed to the poppler tools
fn page_number(page: u32) -> PreviewResult<u32> {
    page.checked_add(1).ok_or(PreviewError::PageOutOfRange(page))
}

/// Parse `612 x 792 pts (letter)` into rounded dimensions
fn parse_page_size(value: &str) -> Option<ImgDims> {
    let mut parts = value.split_whitespace();
    let width: f64 = parts.next()?.parse().ok()?;
    if parts.next()? != "x" {
        return None;
    }
    let height: f64 = parts.next()?.parse().ok()?;
    Some(ImgDims::new(width.round() as u32, height.round() as u32))
}

/// Parse the text printed by `pdfinfo`
pub fn parse_pdfinfo(output: &str) -> PdfInfo {
    let mut info = PdfInfo::default();

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == "Pages" {
            info.pages = value.parse().unwrap_or(0);
        } else if key == "Page size" {
            info.page_size = parse_page_size(value);
        } else if let Some(number) = key
            .strip_prefix("Page")
            .and_then(|rest| rest.strip_suffix("size"))
            .and_then(|n| n.trim().parse::<u32>().ok())
        {
            if let Some(size) = parse_page_size(value) {
                info.page_sizes.insert(number, size);
            }
            continue;
        }

        info.fields.insert(key.to_string(), value.to_string());
    }

    info
}

/// Run `pdfinfo`, restricted to one 0-based page when given
pub(crate) fn pdfinfo(tools: &ToolsConfig, path: &Path, page: Option<u32>) -> PreviewResult<PdfInfo> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(page) = page {
        let number = page_number(page)?.to_string();
        args.extend(["-f", number.as_str(), "-l", number.as_str()].map(OsString::from));
    }
    args.push(path.as_os_str().to_os_string());

    let output = run_tool(&tools.pdfinfo, &args)?;
    Ok(parse_pdfinfo(&String::from_utf8_lossy(&output.stdout)))
}

/// Page count of a PDF via `pdfinfo`
pub(crate) fn pdf_page_count(tools: &ToolsConfig, path: &Path) -> PreviewResult<u32> {
    let info = pdfinfo(tools, path, None)?;
    if info.pages == 0 {
        return Err(PreviewError::ToolOutput {
            command: tools.pdfinfo.clone(),
            reason: format!("no page count reported for {}", path.display()),
        });
    }
    Ok(info.pages)
}

/// Size of a PDF page via `pdfinfo`
pub(crate) fn pdf_page_size(
    tools: &ToolsConfig,
    path: &Path,
    page: Option<u32>,
) -> PreviewResult<ImgDims> {
    pdfinfo(tools, path, Some(page.unwrap_or(0)))?
        .size_of(page)
        .ok_or_else(|| PreviewError::ToolOutput {
            command: tools.pdfinfo.clone(),
            reason: format!("no page size reported for {}", path.display()),
        })
}

/// JSON metadata written for PDFs
#[derive(Debug, Serialize)]
struct PdfMetadata<'a> {
    pages: u32,
    size: u64,
    width: Option<u32>,
    height: Option<u32>,
    info: &'a BTreeMap<String, String>,
}

/// Builder for PDF documents
#[derive(Debug, Default)]
pub struct PdfPreviewBuilder {
    tools: ToolsConfig,
}

impl PdfPreviewBuilder {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }
}

impl PreviewBuilder for PdfPreviewBuilder {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn family(&self) -> BuilderFamily {
        BuilderFamily::Pdf
    }

    fn mimetypes(&self) -> &'static [&'static str] {
        PDF_MIMETYPES
    }

    fn capabilities(&self) -> &'static [PreviewKind] {
        PDF_CAPABILITIES
    }

    fn get_original_size(&self, path: &Path, page: Option<u32>) -> PreviewResult<ImgDims> {
        pdf_page_size(&self.tools, path, page)
    }

    fn get_page_number(&self, path: &Path, _cache_key: &str, _cache_dir: &Path) -> PreviewResult<u32> {
        pdf_page_count(&self.tools, path)
    }

    fn build_jpeg_preview(
        &self,
        path: &Path,
        target: &BuildTarget<'_>,
        page: Option<u32>,
        size: Option<ImgDims>,
    ) -> PreviewResult<()> {
        let number = page_number(page.unwrap_or(0))?.to_string();
        let workdir = tempfile::tempdir()
            .map_err(|e| PreviewError::io("creating render directory", e))?;
        let prefix = workdir.path().join("page");
        let dpi = self.tools.render_dpi.to_string();

        let args: Vec<&OsStr> = vec![
            OsStr::new("-jpeg"),
            OsStr::new("-r"),
            OsStr::new(&dpi),
            OsStr::new("-f"),
            OsStr::new(&number),
            OsStr::new("-l"),
            OsStr::new(&number),
            OsStr::new("-singlefile"),
            path.as_os_str(),
            prefix.as_os_str(),
        ];
        run_tool(&self.tools.pdftoppm, &args)?;

        let rendered = workdir.path().join("page.jpg");
        if !rendered.exists() {
            return Err(PreviewError::ToolOutput {
                command: self.tools.pdftoppm.clone(),
                reason: format!("page {} of {} was not rendered", number, path.display()),
            });
        }

        let image = image::open(&rendered)?;
        let out = target.path();
        write_jpeg(&image, size, &out)?;
        info!("Built JPEG preview {} from {} page {}", out.display(), path.display(), number);
        Ok(())
    }

    fn build_pdf_preview(
        &self,
        path: &Path,
        target: &BuildTarget<'_>,
        page: Option<u32>,
    ) -> PreviewResult<()> {
        let out = target.path();
        match page {
            None => publish_atomically(&out, |tmp| {
                fs::copy(path, tmp)
                    .map(|_| ())
                    .map_err(|e| PreviewError::io(format!("copying {}", path.display()), e))
            })?,
            Some(page) => {
                let number = page_number(page)?.to_string();
                publish_atomically(&out, |tmp| {
                    let args: Vec<&OsStr> = vec![
                        OsStr::new("-f"),
                        OsStr::new(&number),
                        OsStr::new("-l"),
                        OsStr::new(&number),
                        path.as_os_str(),
                        tmp.as_os_str(),
                    ];
                    run_tool(&self.tools.pdfseparate, &args).map(|_| ())
                })?
            }
        }
        info!("Built PDF preview {} from {}", out.display(), path.display());
        Ok(())
    }

    fn build_text_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let out = target.path();
        publish_atomically(&out, |tmp| {
            let args: Vec<&OsStr> = vec![
                OsStr::new("-layout"),
                OsStr::new("-enc"),
                OsStr::new("UTF-8"),
                path.as_os_str(),
                tmp.as_os_str(),
            ];
            run_tool(&self.tools.pdftotext, &args).map(|_| ())
        })?;
        info!("Built text preview {} from {}", out.display(), path.display());
        Ok(())
    }

    fn build_json_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let info = pdfinfo(&self.tools, path, None)?;
        let size = fs::metadata(path)
            .map_err(|e| PreviewError::io(format!("reading metadata of {}", path.display()), e))?
            .len();
        let first_page = info.size_of(None);

        let metadata = PdfMetadata {
            pages: info.pages,
            size,
            width: first_page.map(|d| d.width),
            height: first_page.map(|d| d.height),
            info: &info.fields,
        };
        let content = serde_json::to_vec_pretty(&metadata)?;

        let out = target.path();
        publish_atomically(&out, |tmp| {
            fs::write(tmp, &content)
                .map_err(|e| PreviewError::io(format!("writing {}", tmp.display()), e))
        })?;
        info!("Built JSON preview {} from {}", out.display(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDFINFO_OUTPUT: &str = "\
Title:          Quarterly report
Producer:       LibreOffice 7.6
Tagged:         no
Pages:          3
Encrypted:      no
Page size:      595.276 x 841.89 pts (A4)
Page rot:       0
File size:      48213 bytes
PDF version:    1.7
";

    const PDFINFO_PAGE_OUTPUT: &str = "\
Pages:          3
Page    2 size: 842 x 595 pts (A4)
Page    2 rot:  90
";

    #[test]
    fn parses_document_info() {
        let info = parse_pdfinfo(PDFINFO_OUTPUT);
        assert_eq!(info.pages, 3);
        assert_eq!(info.page_size, Some(ImgDims::new(595, 842)));
        assert_eq!(info.fields["Title"], "Quarterly report");
        assert_eq!(info.fields["PDF version"], "1.7");
    }

    #[test]
    fn parses_per_page_sizes() {
        let info = parse_pdfinfo(PDFINFO_PAGE_OUTPUT);
        assert_eq!(info.page_sizes.get(&2), Some(&ImgDims::new(842, 595)));
        assert_eq!(info.size_of(Some(1)), Some(ImgDims::new(842, 595)));
        assert!(!info.fields.contains_key("Page    2 size"));
    }

    #[test]
    fn size_of_falls_back_to_document_size() {
        let info = parse_pdfinfo(PDFINFO_OUTPUT);
        assert_eq!(info.size_of(Some(2)), Some(ImgDims::new(595, 842)));
    }

    #[test]
    fn page_size_rejects_garbage() {
        assert_eq!(parse_page_size("612 by 792"), None);
        assert_eq!(parse_page_size(""), None);
        assert_eq!(parse_page_size("612 x 792 pts"), Some(ImgDims::new(612, 792)));
    }

    #[test]
    fn missing_tool_surfaces_command_failed() {
        let tools = ToolsConfig {
            pdfinfo: "docpreview-missing-pdfinfo".to_string(),
            ..ToolsConfig::default()
        };
        let builder = PdfPreviewBuilder::new(tools);
        let err = builder
            .get_page_number(Path::new("/nonexistent.pdf"), "key", Path::new("/tmp"))
            .unwrap_err();
        assert!(matches!(err, PreviewError::CommandFailed { .. }));
    }

    #[test]
    fn last_page_index_is_rejected_before_running_tools() {
        let tools = ToolsConfig {
            pdfinfo: "docpreview-missing-pdfinfo".to_string(),
            pdftoppm: "docpreview-missing-pdftoppm".to_string(),
            pdfseparate: "docpreview-missing-pdfseparate".to_string(),
            ..ToolsConfig::default()
        };
        let builder = PdfPreviewBuilder::new(tools);
        let dir = tempfile::tempdir().unwrap();
        let source = Path::new("/nonexistent.pdf");

        let jpeg = BuildTarget::new("key", dir.path(), PreviewKind::Jpeg.extension());
        let err = builder
            .build_jpeg_preview(source, &jpeg, Some(u32::MAX), None)
            .unwrap_err();
        assert!(matches!(err, PreviewError::PageOutOfRange(u32::MAX)));

        let pdf = BuildTarget::new("key", dir.path(), PreviewKind::Pdf.extension());
        let err = builder
            .build_pdf_preview(source, &pdf, Some(u32::MAX))
            .unwrap_err();
        assert!(matches!(err, PreviewError::PageOutOfRange(u32::MAX)));

        let err = builder
            .get_original_size(source, Some(u32::MAX))
            .unwrap_err();
        assert!(matches!(err, PreviewError::PageOutOfRange(u32::MAX)));
        assert!(!pdf.path().exists());
    }

    #[test]
    fn size_of_last_page_index_uses_document_size() {
        let info = parse_pdfinfo(PDFINFO_OUTPUT);
        assert_eq!(info.size_of(Some(u32::MAX)), Some(ImgDims::new(595, 842)));
    }

    #[test]
    fn html_is_unavailable() {
        let builder = PdfPreviewBuilder::default();
        assert!(!builder.supports(PreviewKind::Html));
        assert!(builder.supports(PreviewKind::Pdf));
    }
}

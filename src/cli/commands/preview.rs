//! Preview commands - build (or reuse) an artifact and print its path

use crate::cli::args::{DocumentArgs, JpegArgs, PdfArgs};
use crate::cli::commands::preview_manager;
use crate::config::Config;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{JpegOptions, PreviewOptions};
use std::path::{Path, PathBuf};

/// Execute the jpeg command
pub fn jpeg(args: JpegArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let options = JpegOptions {
        page: args.page,
        height: args.height.unwrap_or(config.jpeg.default_height),
        width: args.width,
        force: args.force,
        use_original_filename: args.original_filename,
        with_original_size: args.original_size,
    };

    let path = preview_manager(config).get_jpeg_preview(&args.file, &options)?;
    print_path(&path);
    Ok(())
}

/// Execute the pdf command
pub fn pdf(args: PdfArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let options = PreviewOptions {
        page: args.page,
        force: args.force,
        use_original_filename: args.original_filename,
    };

    let path = preview_manager(config).get_pdf_preview(&args.file, &options)?;
    print_path(&path);
    Ok(())
}

/// Execute the text command
pub fn text(args: DocumentArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let path = preview_manager(config).get_text_preview(&args.file, &document_options(&args))?;
    print_path(&path);
    Ok(())
}

/// Execute the html command
pub fn html(args: DocumentArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let path = preview_manager(config).get_html_preview(&args.file, &document_options(&args))?;
    print_path(&path);
    Ok(())
}

/// Execute the json command
pub fn json(args: DocumentArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let path = preview_manager(config).get_json_preview(&args.file, &document_options(&args))?;
    print_path(&path);
    Ok(())
}

fn document_options(args: &DocumentArgs) -> PreviewOptions {
    PreviewOptions {
        page: None,
        force: args.force,
        use_original_filename: args.original_filename,
    }
}

/// Fail early with `PathNotFound` instead of a builder-specific error
pub(crate) fn require_file(path: &Path) -> PreviewResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PreviewError::PathNotFound(PathBuf::from(path)))
    }
}

fn print_path(path: &Path) {
    println!("{}", path.display());
}

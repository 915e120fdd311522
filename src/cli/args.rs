//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// docpreview - cached document previews
///
/// Builds JPEG, PDF, text, HTML and JSON previews of documents and prints
/// the path of the cached artifact.
#[derive(Parser, Debug)]
#[command(name = "docpreview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCPREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Preview cache directory (overrides the configured one)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a JPEG preview
    Jpeg(JpegArgs),

    /// Build a PDF preview
    Pdf(PdfArgs),

    /// Build a plain text preview
    Text(DocumentArgs),

    /// Build an HTML preview
    Html(DocumentArgs),

    /// Build a JSON metadata preview
    Json(DocumentArgs),

    /// Print the native size of a document or page
    Size(SizeArgs),

    /// Print the number of pages of a document
    Pages(FileArgs),

    /// Print the detected mimetype of a file
    Mimetype(FileArgs),

    /// Inspect the preview cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the jpeg command
#[derive(Parser, Debug)]
pub struct JpegArgs {
    /// Source document
    pub file: PathBuf,

    /// Page to render (defaults to the first)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Preview height in pixels (default: from config)
    #[arg(long)]
    pub height: Option<u32>,

    /// Preview width in pixels (defaults to the height)
    #[arg(long)]
    pub width: Option<u32>,

    /// Keep the source's native size (ignores --height and --width)
    #[arg(long)]
    pub original_size: bool,

    /// Rebuild even if a cached preview exists
    #[arg(short, long)]
    pub force: bool,

    /// Include the source file name in the cache key
    #[arg(long)]
    pub original_filename: bool,
}

/// Arguments for the pdf command
#[derive(Parser, Debug)]
pub struct PdfArgs {
    /// Source document
    pub file: PathBuf,

    /// Extract a single page (defaults to the whole document)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Rebuild even if a cached preview exists
    #[arg(short, long)]
    pub force: bool,

    /// Include the source file name in the cache key
    #[arg(long)]
    pub original_filename: bool,
}

/// Arguments for the text, html and json commands
#[derive(Parser, Debug)]
pub struct DocumentArgs {
    /// Source document
    pub file: PathBuf,

    /// Rebuild even if a cached preview exists
    #[arg(short, long)]
    pub force: bool,

    /// Include the source file name in the cache key
    #[arg(long)]
    pub original_filename: bool,
}

/// Arguments for the size command
#[derive(Parser, Debug)]
pub struct SizeArgs {
    /// Source document
    pub file: PathBuf,

    /// Page to measure
    #[arg(short, long)]
    pub page: Option<u32>,
}

/// A single file argument
#[derive(Parser, Debug)]
pub struct FileArgs {
    /// Source document
    pub file: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for cache info
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cache directory and its contents
    Info {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

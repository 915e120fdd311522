//! Introspection commands - size, page count and mimetype

use crate::cli::args::{FileArgs, SizeArgs};
use crate::cli::commands::preview::require_file;
use crate::cli::commands::preview_manager;
use crate::config::Config;
use crate::error::PreviewResult;

/// Execute the size command
pub fn size(args: SizeArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let dims = preview_manager(config).get_original_size(&args.file, args.page)?;
    println!("{}", dims);
    Ok(())
}

/// Execute the pages command
pub fn pages(args: FileArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let count = preview_manager(config).get_nb_page(&args.file)?;
    println!("{}", count);
    Ok(())
}

/// Execute the mimetype command
pub fn mimetype(args: FileArgs, config: &Config) -> PreviewResult<()> {
    require_file(&args.file)?;
    let manager = preview_manager(config);
    let mimetype = manager.get_mimetype(&args.file);
    let supported = manager.factory().find_builder(&mimetype).is_some();
    if supported {
        println!("{}", mimetype);
    } else {
        println!("{} (unsupported)", mimetype);
    }
    Ok(())
}

//! Cache command - inspect the preview cache

use crate::cache::{format_bytes, CacheInventory, CacheStore};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::PreviewResult;
use console::style;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> PreviewResult<()> {
    let store = CacheStore::new(ConfigManager::cache_dir(config));

    match args.action {
        CacheAction::Info { format } => show_info(&store, format),
    }
}

fn show_info(store: &CacheStore, format: OutputFormat) -> PreviewResult<()> {
    let inventory = store.inventory()?;
    debug!(
        "Found {} artifact(s) in {}",
        inventory.artifacts,
        store.dir().display()
    );

    match format {
        OutputFormat::Table => print_info_table(store.dir(), &inventory),
        OutputFormat::Json => print_info_json(store.dir(), &inventory)?,
    }
    Ok(())
}

fn print_info_table(dir: &Path, inventory: &CacheInventory) {
    println!("{} {}", style("Cache directory:").bold(), dir.display());

    if inventory.artifacts == 0 {
        println!("No cached previews.");
        return;
    }

    println!();
    println!("{:<12} {:>8}", "EXTENSION", "COUNT");
    println!("{}", "-".repeat(21));
    for (extension, count) in &inventory.by_extension {
        let label = if extension.is_empty() {
            style("(none)").dim().to_string()
        } else {
            format!(".{}", extension)
        };
        println!("{:<12} {:>8}", label, count);
    }

    println!();
    println!(
        "Total: {} artifact(s), {}",
        inventory.artifacts,
        format_bytes(inventory.total_bytes)
    );
}

fn print_info_json(dir: &Path, inventory: &CacheInventory) -> PreviewResult<()> {
    #[derive(Serialize)]
    struct CacheInfoJson<'a> {
        dir: PathBuf,
        artifacts: usize,
        total_bytes: u64,
        total_size: String,
        by_extension: &'a BTreeMap<String, usize>,
    }

    let info = CacheInfoJson {
        dir: dir.to_path_buf(),
        artifacts: inventory.artifacts,
        total_bytes: inventory.total_bytes,
        total_size: format_bytes(inventory.total_bytes),
        by_extension: &inventory.by_extension,
    };

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

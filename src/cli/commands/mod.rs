//! CLI command implementations

pub mod cache;
pub mod config;
pub mod info;
pub mod preview;

pub use cache::execute as cache;
pub use config::execute as config;
pub use info::{mimetype, pages, size};
pub use preview::{html, jpeg, json, pdf, text};

use crate::builder::BuilderFactory;
use crate::config::{Config, ConfigManager};
use crate::preview::PreviewManager;

/// Manager for the configured cache directory and tools
pub(crate) fn preview_manager(config: &Config) -> PreviewManager {
    PreviewManager::with_factory(
        ConfigManager::cache_dir(config),
        BuilderFactory::with_default_builders(&config.tools),
        config.cache.create_folder,
    )
}

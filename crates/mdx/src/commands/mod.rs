//! CLI command implementations.

pub(crate) mod components;
pub(crate) mod enrich;
pub(crate) mod index;
pub(crate) mod render;

use std::sync::Arc;

use mdx_config::Config;
use mdx_content::{ContentProcessor, ContentSettings};
use mdx_storage::{FsStorage, Storage};

pub(crate) use enrich::EnrichArgs;
pub(crate) use index::IndexArgs;
pub(crate) use render::RenderArgs;

/// Content settings from the loaded configuration.
fn content_settings(config: &Config) -> ContentSettings {
    ContentSettings {
        posts_dir: config.content.posts_dir.clone(),
        pages_dir: config.content.pages_dir.clone(),
        components_dir: config.content.components_dir.clone(),
        data_dir: config.content.data_dir.clone(),
        extension: config.content.extension.clone(),
        index_file: config.content.index_file.clone(),
        component_categories: config.components.categories.clone(),
        component_extension: config.components.extension.clone(),
        excerpt_max_length: config.render.excerpt_max_length,
        words_per_minute: config.render.words_per_minute,
    }
}

/// Processor over the configured content directory.
fn open_processor(config: &Config) -> ContentProcessor {
    tracing::debug!(root = %config.content.root.display(), "Opening content directory");
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.content.root.clone()));
    ContentProcessor::new(storage, content_settings(config))
}

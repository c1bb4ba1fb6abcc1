//! Document-level operations for MDX content sites.
//!
//! Ties the render pipeline to a storage backend:
//!
//! - [`ContentProcessor::load_document`]: read, split the metadata header and render
//! - [`ContentProcessor::enrich`]: keep date, reading time and excerpt current
//! - [`ContentProcessor::render_all`] / [`ContentProcessor::enrich_all`]: parallel
//!   batches that continue past per-document failures
//! - [`ContentProcessor::available_components`]: component registry by category
//! - [`ContentProcessor::load_data`]: auxiliary JSON files
//! - [`ContentProcessor::generate_index`] / [`ContentProcessor::save_index`]: content index

mod batch;
mod data;
mod enrich;
mod error;
mod index;
mod processor;
mod registry;

pub use batch::{BatchReport, EnrichOutcome};
pub use enrich::MetadataEnricher;
pub use error::ContentError;
pub use index::{ContentIndex, PageEntry, PostEntry};
pub use processor::{ContentProcessor, ContentSettings, DocumentKind, LoadedDocument};

//! Document loading over storage.

use std::sync::Arc;

use mdx_meta::FrontMatter;
use mdx_renderer::{
    ComponentDescriptor, DEFAULT_EXCERPT_MAX_LENGTH, DEFAULT_WORDS_PER_MINUTE, DerivedMetadata,
    DerivedMetadataCalculator, DocumentRenderer, FootnoteIndex,
};
use mdx_storage::Storage;
use serde::Serialize;

use crate::enrich::MetadataEnricher;
use crate::error::ContentError;

/// Content layout and derived metadata settings.
///
/// Directories are relative to the storage root.
#[derive(Clone, Debug)]
pub struct ContentSettings {
    pub posts_dir: String,
    pub pages_dir: String,
    pub components_dir: String,
    pub data_dir: String,
    /// Document file extension without the dot.
    pub extension: String,
    pub index_file: String,
    pub component_categories: Vec<String>,
    pub component_extension: String,
    pub excerpt_max_length: usize,
    pub words_per_minute: u32,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_owned(),
            pages_dir: "pages".to_owned(),
            components_dir: "components".to_owned(),
            data_dir: "data".to_owned(),
            extension: "mdx".to_owned(),
            index_file: "index.json".to_owned(),
            component_categories: vec![
                "visualizations".to_owned(),
                "charts".to_owned(),
                "common".to_owned(),
            ],
            component_extension: "jsx".to_owned(),
            excerpt_max_length: DEFAULT_EXCERPT_MAX_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Kind of document, which decides the directory it lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Post,
    Page,
}

/// A document read from storage and rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadedDocument {
    pub path: String,
    pub metadata: FrontMatter,
    pub html: String,
    pub components: Vec<ComponentDescriptor>,
    pub toc: String,
    pub footnotes: FootnoteIndex,
    /// Body as written, without the metadata header.
    pub raw_body: String,
}

/// Document operations over a [`Storage`] backend.
///
/// Rendering never writes to storage. The only mutating operations are
/// [`enrich`](Self::enrich), [`enrich_all`](Self::enrich_all) and
/// [`save_index`](Self::save_index).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mdx_content::{ContentProcessor, ContentSettings};
/// use mdx_storage::FsStorage;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::create_dir(dir.path().join("posts")).unwrap();
/// std::fs::write(
///     dir.path().join("posts/hello.mdx"),
///     "---\ntitle: Hello\n---\n\n# Hello\n\n<Chart type=\"bar\" />\n",
/// )
/// .unwrap();
///
/// let storage = Arc::new(FsStorage::new(dir.path()));
/// let processor = ContentProcessor::new(storage, ContentSettings::default());
/// let doc = processor.load_document("posts/hello.mdx").unwrap();
///
/// assert_eq!(doc.metadata.get_str("title"), Some("Hello"));
/// assert_eq!(doc.components[0].name, "Chart");
/// ```
pub struct ContentProcessor {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) settings: ContentSettings,
    renderer: DocumentRenderer,
    derived: DerivedMetadataCalculator,
    enricher: MetadataEnricher,
}

impl ContentProcessor {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, settings: ContentSettings) -> Self {
        let derived = DerivedMetadataCalculator::new()
            .with_words_per_minute(settings.words_per_minute)
            .with_excerpt_max_length(settings.excerpt_max_length);
        Self {
            storage,
            renderer: DocumentRenderer::new(),
            enricher: MetadataEnricher::new(derived),
            derived,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ContentSettings {
        &self.settings
    }

    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Document paths of one kind, sorted.
    pub fn document_paths(&self, kind: DocumentKind) -> Result<Vec<String>, ContentError> {
        let dir = match kind {
            DocumentKind::Post => &self.settings.posts_dir,
            DocumentKind::Page => &self.settings.pages_dir,
        };
        let pattern = format!("*.{}", self.settings.extension);
        Ok(self.storage.scan(dir, &pattern)?)
    }

    /// Read a document, split its header and render the body.
    pub fn load_document(&self, path: &str) -> Result<LoadedDocument, ContentError> {
        let text = self.storage.read(path)?;
        let (metadata, raw_body) = mdx_meta::load(&text)?;
        let artifact = self.renderer.render(&raw_body)?;

        tracing::debug!(path, components = artifact.components.len(), "Loaded document");

        Ok(LoadedDocument {
            path: path.to_owned(),
            metadata,
            html: artifact.html,
            components: artifact.components,
            toc: artifact.toc,
            footnotes: artifact.footnotes,
            raw_body,
        })
    }

    /// Reading time and excerpt with the configured excerpt length.
    #[must_use]
    pub fn compute_derived(&self, raw_body: &str) -> DerivedMetadata {
        self.derived.compute(raw_body)
    }

    #[must_use]
    pub fn compute_derived_with(
        &self,
        raw_body: &str,
        excerpt_max_length: usize,
    ) -> DerivedMetadata {
        self.derived.compute_with(raw_body, excerpt_max_length)
    }

    /// Bring a document's stored date, reading time and excerpt up to date.
    ///
    /// Returns whether the document was rewritten.
    pub fn enrich(&self, path: &str) -> Result<bool, ContentError> {
        self.enricher.enrich(self.storage.as_ref(), path)
    }
}

//! Content index generation.
//!
//! The index summarizes every post and page from their headers alone; bodies
//! are not rendered.

use std::collections::BTreeSet;

use chrono::Utc;
use mdx_meta::FrontMatter;
use serde::Serialize;

use crate::error::ContentError;
use crate::processor::{ContentProcessor, DocumentKind};

const DEFAULT_READING_TIME: u64 = 1;
const DEFAULT_STATUS: &str = "publish";

/// Summary of all posts and pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContentIndex {
    /// Newest first.
    pub posts: Vec<PostEntry>,
    pub pages: Vec<PageEntry>,
    /// Sorted union of post tags.
    pub tags: Vec<String>,
    pub generated_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub filename: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub excerpt: String,
    pub reading_time: u64,
    pub tags: Vec<String>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub filename: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub status: String,
}

/// Header fields shared by posts and pages.
struct Common {
    filename: String,
    slug: String,
    title: String,
    date: String,
    author: String,
    status: String,
}

impl Common {
    fn new(path: &str, meta: &FrontMatter) -> Self {
        let filename = path.rsplit_once('/').map_or(path, |(_, f)| f).to_owned();
        let text = |key: &str| meta.get_str(key).unwrap_or_default().to_owned();
        Self {
            slug: meta
                .get_str("slug")
                .map_or_else(|| slug_from_filename(&filename), str::to_owned),
            title: text("title"),
            date: text("date"),
            author: text("author"),
            status: meta.get_str("status").unwrap_or(DEFAULT_STATUS).to_owned(),
            filename,
        }
    }
}

/// File name without its extension and without a `YYYY-MM-DD-` prefix.
fn slug_from_filename(filename: &str) -> String {
    let name = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    let bytes = name.as_bytes();
    if bytes.len() > 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && let Some(rest) = name.get(11..)
    {
        return rest.to_owned();
    }
    name.to_owned()
}

impl ContentProcessor {
    /// Build the index with the current time as `generated_at`.
    pub fn generate_index(&self) -> Result<ContentIndex, ContentError> {
        self.generate_index_at(Utc::now().to_rfc3339())
    }

    /// Build the index with a given `generated_at` stamp.
    ///
    /// Documents that cannot be read or whose header does not parse are
    /// logged and left out.
    pub fn generate_index_at(
        &self,
        generated_at: impl Into<String>,
    ) -> Result<ContentIndex, ContentError> {
        let mut posts = Vec::new();
        let mut tags = BTreeSet::new();
        for (path, meta) in self.read_headers(DocumentKind::Post)? {
            let common = Common::new(&path, &meta);
            let post_tags: Vec<String> = meta
                .get_str_list("tags")
                .into_iter()
                .map(str::to_owned)
                .collect();
            tags.extend(post_tags.iter().cloned());
            posts.push(PostEntry {
                filename: common.filename,
                slug: common.slug,
                title: common.title,
                date: common.date,
                author: common.author,
                excerpt: meta.get_str("excerpt").unwrap_or_default().to_owned(),
                reading_time: meta.get_u64("reading_time").unwrap_or(DEFAULT_READING_TIME),
                tags: post_tags,
                status: common.status,
            });
        }
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let pages = self
            .read_headers(DocumentKind::Page)?
            .into_iter()
            .map(|(path, meta)| {
                let common = Common::new(&path, &meta);
                PageEntry {
                    filename: common.filename,
                    slug: common.slug,
                    title: common.title,
                    date: common.date,
                    author: common.author,
                    status: common.status,
                }
            })
            .collect();

        Ok(ContentIndex {
            posts,
            pages,
            tags: tags.into_iter().collect(),
            generated_at: generated_at.into(),
        })
    }

    /// Write the index as pretty JSON to the configured index file.
    pub fn save_index(&self, index: &ContentIndex) -> Result<(), ContentError> {
        let mut json = serde_json::to_string_pretty(index).map_err(ContentError::Index)?;
        json.push('\n');
        self.storage.write(&self.settings.index_file, &json)?;
        tracing::info!(
            path = %self.settings.index_file,
            posts = index.posts.len(),
            pages = index.pages.len(),
            "Saved content index"
        );
        Ok(())
    }

    fn read_headers(&self, kind: DocumentKind) -> Result<Vec<(String, FrontMatter)>, ContentError> {
        let mut headers = Vec::new();
        for path in self.document_paths(kind)? {
            let header = self
                .storage
                .read(&path)
                .map_err(ContentError::from)
                .and_then(|text| Ok(mdx_meta::load(&text)?.0));
            match header {
                Ok(meta) => headers.push((path, meta)),
                Err(error) => tracing::warn!(path = %path, error = %error, "Skipping document in index"),
            }
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mdx_storage::{MockStorage, Storage};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::processor::ContentSettings;

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_content(
                "posts/2024-01-10-first-post.mdx",
                "---\ntitle: First\ndate: '2024-01-10'\nauthor: Ana\ntags: [sales, q1]\nexcerpt: Hello\nreading_time: 3\n---\nBody",
            )
            .with_content(
                "posts/2024-02-01-second.mdx",
                "---\ntitle: Second\ndate: '2024-02-01'\nslug: custom\ntags: [q1, 7, ops]\nstatus: draft\n---\nBody",
            )
            .with_content("posts/broken.mdx", "---\ntitle: [x\n---\nBody")
            .with_content("posts/undated.mdx", "No header at all")
            .with_content("pages/about.mdx", "---\ntitle: About\n---\nAbout us")
    }

    fn processor(storage: MockStorage) -> ContentProcessor {
        ContentProcessor::new(Arc::new(storage), ContentSettings::default())
    }

    #[test]
    fn test_slug_from_filename() {
        assert_eq!(slug_from_filename("2024-01-10-first-post.mdx"), "first-post");
        assert_eq!(slug_from_filename("about.mdx"), "about");
        assert_eq!(slug_from_filename("2024-01-10.mdx"), "2024-01-10");
        assert_eq!(slug_from_filename("2024-01-10-.mdx"), "");
        assert_eq!(slug_from_filename("no-extension"), "no-extension");
    }

    #[test]
    fn test_generate_index() {
        let index = processor(storage())
            .generate_index_at("2024-03-01T00:00:00+00:00")
            .unwrap();

        assert_eq!(
            index.posts,
            [
                PostEntry {
                    filename: "2024-02-01-second.mdx".to_owned(),
                    slug: "custom".to_owned(),
                    title: "Second".to_owned(),
                    date: "2024-02-01".to_owned(),
                    author: String::new(),
                    excerpt: String::new(),
                    reading_time: 1,
                    tags: vec!["q1".to_owned(), "ops".to_owned()],
                    status: "draft".to_owned(),
                },
                PostEntry {
                    filename: "2024-01-10-first-post.mdx".to_owned(),
                    slug: "first-post".to_owned(),
                    title: "First".to_owned(),
                    date: "2024-01-10".to_owned(),
                    author: "Ana".to_owned(),
                    excerpt: "Hello".to_owned(),
                    reading_time: 3,
                    tags: vec!["sales".to_owned(), "q1".to_owned()],
                    status: "publish".to_owned(),
                },
                PostEntry {
                    filename: "undated.mdx".to_owned(),
                    slug: "undated".to_owned(),
                    title: String::new(),
                    date: String::new(),
                    author: String::new(),
                    excerpt: String::new(),
                    reading_time: 1,
                    tags: vec![],
                    status: "publish".to_owned(),
                },
            ]
        );
        assert_eq!(index.tags, ["ops", "q1", "sales"]);
        assert_eq!(
            index.pages,
            [PageEntry {
                filename: "about.mdx".to_owned(),
                slug: "about".to_owned(),
                title: "About".to_owned(),
                date: String::new(),
                author: String::new(),
                status: "publish".to_owned(),
            }]
        );
        assert_eq!(index.generated_at, "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_generate_index_empty() {
        let index = processor(MockStorage::new()).generate_index_at("now").unwrap();
        assert!(index.posts.is_empty());
        assert!(index.pages.is_empty());
        assert!(index.tags.is_empty());
    }

    #[test]
    fn test_save_index() {
        let storage = Arc::new(storage());
        let processor = ContentProcessor::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            ContentSettings::default(),
        );
        let index = processor.generate_index_at("stamp").unwrap();
        processor.save_index(&index).unwrap();

        let saved = storage.read("index.json").unwrap();
        assert!(saved.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["generated_at"], "stamp");
        assert_eq!(value["posts"][0]["slug"], "custom");
        assert_eq!(value["tags"], json!(["ops", "q1", "sales"]));
    }

    #[test]
    fn test_generated_at_is_rfc3339() {
        let index = processor(MockStorage::new()).generate_index().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&index.generated_at).is_ok());
    }
}

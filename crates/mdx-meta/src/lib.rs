//! Metadata header support for MDX documents.
//!
//! A document may start with a YAML header fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Quarterly Report
//! tags: [finance]
//! ---
//!
//! # Body starts here
//! ```
//!
//! [`load`] splits a document into its [`FrontMatter`] and body, [`dump`]
//! joins them back together. Key order is preserved so that loading and
//! dumping an unchanged document gives the same text.

mod frontmatter;

pub use frontmatter::{FrontMatter, FrontMatterError, dump, load};
pub use serde_yaml::Value;

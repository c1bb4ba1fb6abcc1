//! Auxiliary JSON data files.

use mdx_storage::join_path;

use crate::error::ContentError;
use crate::processor::ContentProcessor;

impl ContentProcessor {
    /// Parse `name` from the data directory as JSON.
    pub fn load_data(&self, name: &str) -> Result<serde_json::Value, ContentError> {
        let path = join_path(&self.settings.data_dir, name);
        let text = match self.storage.read(&path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => return Err(ContentError::DataNotFound(name.to_owned())),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|source| ContentError::Data {
            name: name.to_owned(),
            source,
        })
    }
}

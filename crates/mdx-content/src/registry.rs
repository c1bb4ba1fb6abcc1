//! Component registry.

use std::collections::BTreeMap;

use mdx_storage::join_path;

use crate::error::ContentError;
use crate::processor::ContentProcessor;

impl ContentProcessor {
    /// Available component names per configured category.
    ///
    /// Names are file stems, sorted. A category whose directory does not
    /// exist maps to an empty list.
    pub fn available_components(&self) -> Result<BTreeMap<String, Vec<String>>, ContentError> {
        let extension = &self.settings.component_extension;
        let pattern = format!("*.{extension}");
        let suffix = format!(".{extension}");

        let mut registry = BTreeMap::new();
        for category in &self.settings.component_categories {
            let dir = join_path(&self.settings.components_dir, category);
            let mut names: Vec<String> = self
                .storage
                .scan(&dir, &pattern)?
                .iter()
                .filter_map(|path| {
                    let file = path.rsplit_once('/').map_or(path.as_str(), |(_, f)| f);
                    file.strip_suffix(&suffix).map(str::to_owned)
                })
                .collect();
            names.sort();
            tracing::debug!(category, count = names.len(), "Scanned components");
            registry.insert(category.clone(), names);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mdx_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::processor::ContentSettings;

    #[test]
    fn test_available_components() {
        let storage = MockStorage::new()
            .with_content("components/charts/LineChart.jsx", "")
            .with_content("components/charts/BarChart.jsx", "")
            .with_content("components/charts/README.md", "")
            .with_content("components/charts/nested/Deep.jsx", "")
            .with_content("components/common/Callout.jsx", "");
        let processor = ContentProcessor::new(Arc::new(storage), ContentSettings::default());

        let registry = processor.available_components().unwrap();

        let expected = BTreeMap::from([
            (
                "charts".to_owned(),
                vec!["BarChart".to_owned(), "LineChart".to_owned()],
            ),
            ("common".to_owned(), vec!["Callout".to_owned()]),
            ("visualizations".to_owned(), vec![]),
        ]);
        assert_eq!(registry, expected);
    }

    #[test]
    fn test_available_components_custom_extension() {
        let storage = MockStorage::new()
            .with_content("ui/widgets/Gauge.tsx", "")
            .with_content("ui/widgets/Legacy.jsx", "");
        let settings = ContentSettings {
            components_dir: "ui".to_owned(),
            component_categories: vec!["widgets".to_owned()],
            component_extension: "tsx".to_owned(),
            ..Default::default()
        };
        let processor = ContentProcessor::new(Arc::new(storage), settings);

        let registry = processor.available_components().unwrap();
        assert_eq!(registry["widgets"], ["Gauge"]);
    }
}

//! Literal token substitution.

/// Ordered list of literal `from -> to` substitutions applied in one call.
///
/// Used to swap placeholder tokens for component markers after conversion.
/// Tokens are unique literals, so the result does not depend on where each
/// token ended up in the HTML.
///
/// # Example
///
/// ```
/// use mdx_renderer::Replacements;
///
/// let mut html = "<p><!--COMPONENT_0--></p>".to_owned();
/// let mut replacements = Replacements::new();
/// replacements.add("<!--COMPONENT_0-->", "<div data-component-id=\"component_0\"></div>");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<p><div data-component-id=\"component_0\"></div></p>");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a substitution. All occurrences of `from` are replaced.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Apply substitutions in registration order.
    ///
    /// Returns how many distinct tokens were found.
    pub fn apply(&self, html: &mut String) -> usize {
        let mut found = 0;
        for (from, to) in &self.items {
            if html.contains(from.as_str()) {
                *html = html.replace(from.as_str(), to);
                found += 1;
            }
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

//! Reversible placeholder substitution.
//!
//! Custom tags are swapped for inert HTML comments before markdown
//! conversion and swapped for component markers afterwards:
//!
//! ```text
//! <Chart type="bar" />  --insert-->  <!--COMPONENT_0-->  --resolve-->
//! <div class="mdx-component" data-component-id="component_0"></div>
//! ```

use crate::component::{ComponentDescriptor, Span};
use crate::error::RenderError;
use crate::replacements::Replacements;

/// Placeholder token for the component at `index`.
#[must_use]
pub fn placeholder_token(index: usize) -> String {
    format!("<!--COMPONENT_{index}-->")
}

/// Marker element that replaces a placeholder in the final HTML.
#[must_use]
pub fn component_marker(id: &str) -> String {
    format!(r#"<div class="mdx-component" data-component-id="{id}"></div>"#)
}

/// Token substitution map built by [`insert`](Self::insert) and applied by
/// [`resolve`](Self::resolve).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    replacements: Replacements,
}

/// Fold state for [`PlaceholderMap::insert`].
struct Rewrite {
    text: String,
    /// Bytes added (positive) or removed (negative) by earlier splices.
    delta: isize,
    /// End of the previous span in original coordinates.
    prev_end: usize,
}

impl PlaceholderMap {
    /// Replace each component's span in `text` with its placeholder token.
    ///
    /// Components must be in ascending, non-overlapping span order, as
    /// produced by [`TagExtractor`](crate::TagExtractor). Each span is shifted
    /// by the accumulated length delta of all earlier splices, and on return
    /// covers the component's placeholder in the rewritten text.
    pub fn insert(
        text: &str,
        components: &mut [ComponentDescriptor],
    ) -> Result<(String, Self), RenderError> {
        let mut map = Self {
            replacements: Replacements::with_capacity(components.len()),
        };

        let initial = Rewrite {
            text: text.to_owned(),
            delta: 0,
            prev_end: 0,
        };

        let rewrite = components
            .iter_mut()
            .enumerate()
            .try_fold(initial, |mut state, (index, component)| {
                let original = component.span;
                let valid = original.start >= state.prev_end
                    && original.start <= original.end
                    && original.end <= text.len()
                    && text.is_char_boundary(original.start)
                    && text.is_char_boundary(original.end);
                if !valid {
                    return Err(RenderError::InvalidSpan {
                        id: component.id.clone(),
                        span: original,
                        len: text.len(),
                    });
                }

                let token = placeholder_token(index);
                let adjusted = original.shifted(state.delta);
                state
                    .text
                    .replace_range(adjusted.start..adjusted.end, &token);

                component.span = Span::new(adjusted.start, adjusted.start + token.len());
                state.delta += token.len().cast_signed() - original.len().cast_signed();
                state.prev_end = original.end;

                map.replacements.add(token, component_marker(&component.id));
                Ok(state)
            })?;

        tracing::debug!(
            placeholders = map.len(),
            delta = rewrite.delta,
            "Inserted component placeholders"
        );

        Ok((rewrite.text, map))
    }

    /// Replace every placeholder in `html` with its component marker.
    ///
    /// Placeholders the converter dropped are skipped.
    #[must_use]
    pub fn resolve(&self, html: &str) -> String {
        let mut html = html.to_owned();
        let found = self.replacements.apply(&mut html);
        if found < self.len() {
            tracing::debug!(
                expected = self.len(),
                found,
                "Some placeholders were not present in converted HTML"
            );
        }
        html
    }

    /// `(token, marker)` pairs in component order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.replacements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

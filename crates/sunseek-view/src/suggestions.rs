//! Dropdown under the origin field.

use serde::Serialize;
use sunseek_core::{GeoPoint, LocationSuggestion};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionItem {
    pub index: usize,
    pub display_name: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionList {
    pub items: Vec<SuggestionItem>,
}

impl SuggestionList {
    /// Hidden when there is nothing to offer.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }

    /// The item picked by the user, if `index` is in range.
    #[must_use]
    pub fn select(&self, index: usize) -> Option<&SuggestionItem> {
        self.items.get(index)
    }
}

#[must_use]
pub fn render_suggestions(suggestions: &[LocationSuggestion]) -> SuggestionList {
    SuggestionList {
        items: suggestions
            .iter()
            .enumerate()
            .map(|(index, s)| SuggestionItem {
                index,
                display_name: s.display_name.clone(),
                point: s.point,
            })
            .collect(),
    }
}

impl std::fmt::Display for SuggestionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.items {
            writeln!(f, "{:>2}. {} {}", item.index + 1, item.display_name, item.point)?;
        }
        Ok(())
    }
}

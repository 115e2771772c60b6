//! Pure render functions: backend data in, view models out.
//!
//! Nothing here touches the network or the map. The binary decides how a
//! view model is shown (printed, drawn as overlays, serialized as JSON).

pub mod cards;
pub mod grid;
pub mod markers;
pub mod panel;
pub mod suggestions;

pub use cards::{render_card, CardList, DestinationCard, Ranking, ScoreBand};
pub use grid::{render_grid, score_color, GridCellView, GridLayer, LegendEntry};
pub use markers::{destination_markers, DestinationMarker};
pub use panel::{render_failure, render_search_results, ResultsPanel};
pub use suggestions::{render_suggestions, SuggestionItem, SuggestionList};

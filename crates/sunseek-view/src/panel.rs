//! The results panel: cards, an informational note, or an error.

use serde::Serialize;
use sunseek_client::ClientError;
use sunseek_core::SearchResponse;

use crate::cards::{CardList, Ranking};

const NO_RESULTS: &str =
    "No destinations matched. Try a wider radius, another date, or a different time window.";
const NO_GRID: &str = "No weather data is available for this area and time window.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultsPanel {
    Cards {
        sunny: CardList,
        comfortable: CardList,
    },
    /// Not a failure; the request worked but there is nothing to show.
    Info { message: String },
    Error { message: String },
}

impl ResultsPanel {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, ResultsPanel::Error { .. })
    }
}

#[must_use]
pub fn render_search_results(results: &SearchResponse) -> ResultsPanel {
    if results.is_empty() {
        return ResultsPanel::Info {
            message: NO_RESULTS.to_string(),
        };
    }
    ResultsPanel::Cards {
        sunny: CardList::new(Ranking::Sunny, &results.sunny_destinations),
        comfortable: CardList::new(Ranking::Comfortable, &results.comfortable_destinations),
    }
}

/// Maps a failed request to what the user sees. Empty results are
/// informational; everything else is an error panel.
#[must_use]
pub fn render_failure(err: &ClientError) -> ResultsPanel {
    match err {
        ClientError::NoData { endpoint } if *endpoint == "/project-weather-index" => {
            ResultsPanel::Info {
                message: NO_GRID.to_string(),
            }
        }
        ClientError::NoData { .. } => ResultsPanel::Info {
            message: NO_RESULTS.to_string(),
        },
        ClientError::Api { message, .. } => ResultsPanel::Error {
            message: message.clone(),
        },
        ClientError::Network(_) | ClientError::Timeout { .. } => ResultsPanel::Error {
            message: "Could not reach the weather service. Check your connection and try again."
                .to_string(),
        },
        ClientError::UnexpectedStatus { status, .. } => ResultsPanel::Error {
            message: format!("The weather service returned an error (HTTP {status})."),
        },
        ClientError::Deserialize { .. } => ResultsPanel::Error {
            message: "The weather service sent a response that could not be read.".to_string(),
        },
        ClientError::InvalidBaseUrl { base_url, .. } => ResultsPanel::Error {
            message: format!("The weather service address \"{base_url}\" is not valid."),
        },
    }
}

impl std::fmt::Display for ResultsPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsPanel::Cards { sunny, comfortable } => {
                write!(f, "{sunny}")?;
                writeln!(f)?;
                write!(f, "{comfortable}")
            }
            ResultsPanel::Info { message } => writeln!(f, "{message}"),
            ResultsPanel::Error { message } => writeln!(f, "Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use sunseek_core::{Destination, GeoPoint};

    use super::*;

    fn nice() -> Destination {
        Destination {
            city: "Nice".to_string(),
            region: "Provence-Alpes-Côte d'Azur".to_string(),
            country: "France".to_string(),
            coordinates: GeoPoint::new(43.7102, 7.262).unwrap(),
            distance_miles: 120.4,
            sunny_score: Some(9.1),
            comfort_score: Some(7.4),
            condition: None,
            temperature_c: None,
        }
    }

    #[test]
    fn results_render_both_lists() {
        let results = SearchResponse {
            sunny_destinations: vec![nice()],
            comfortable_destinations: vec![],
        };
        let panel = render_search_results(&results);
        let ResultsPanel::Cards { sunny, comfortable } = &panel else {
            panic!("expected cards, got {panel:?}");
        };
        assert_eq!(sunny.cards.len(), 1);
        assert!(comfortable.is_empty());
        assert!(panel.to_string().contains("(none)"));
    }

    #[test]
    fn empty_results_are_informational() {
        let panel = render_search_results(&SearchResponse::default());
        assert!(matches!(panel, ResultsPanel::Info { .. }));
        assert!(!panel.is_error());
    }

    #[test]
    fn no_data_failure_is_not_an_error() {
        let search = render_failure(&ClientError::NoData {
            endpoint: "/search",
        });
        let grid = render_failure(&ClientError::NoData {
            endpoint: "/project-weather-index",
        });
        assert!(!search.is_error());
        assert_eq!(
            grid,
            ResultsPanel::Info {
                message: NO_GRID.to_string()
            }
        );
    }

    #[test]
    fn api_failure_shows_backend_message() {
        let panel = render_failure(&ClientError::Api {
            status: 400,
            message: "Starting location not found".to_string(),
        });
        assert_eq!(panel.to_string(), "Error: Starting location not found\n");
    }

    #[test]
    fn timeout_is_an_error_panel() {
        let panel = render_failure(&ClientError::Timeout {
            url: "http://localhost/search".to_string(),
        });
        assert!(panel.is_error());
    }

    #[test]
    fn panel_serializes_with_kind_tag() {
        let json = serde_json::to_value(render_failure(&ClientError::UnexpectedStatus {
            status: 502,
            url: "http://localhost/search".to_string(),
        }))
        .unwrap();
        assert_eq!(json["kind"], "error");
        assert!(json["message"].as_str().unwrap().contains("502"));
    }
}

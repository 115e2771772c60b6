//! Map markers for search results.

use serde::Serialize;
use sunseek_core::{Destination, GeoPoint, SearchResponse};

use crate::cards::{distance_text, location_line, score_text, Ranking};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationMarker {
    pub point: GeoPoint,
    pub title: String,
    /// Popup body: location, distance, and whichever scores are known.
    pub popup: String,
    /// The first list the destination appears in.
    pub ranking: Ranking,
}

fn popup(destination: &Destination) -> String {
    let mut lines = Vec::with_capacity(4);
    if let Some(location) = location_line(destination) {
        lines.push(location);
    }
    lines.push(distance_text(destination.distance_miles));
    if destination.sunny_score.is_some() {
        lines.push(format!(
            "{}: {}",
            Ranking::Sunny.score_label(),
            score_text(destination.sunny_score)
        ));
    }
    if destination.comfort_score.is_some() {
        lines.push(format!(
            "{}: {}",
            Ranking::Comfortable.score_label(),
            score_text(destination.comfort_score)
        ));
    }
    lines.join("\n")
}

/// One marker per destination. A city ranked in both lists gets one marker.
#[must_use]
pub fn destination_markers(results: &SearchResponse) -> Vec<DestinationMarker> {
    let ranked = results
        .sunny_destinations
        .iter()
        .map(|d| (Ranking::Sunny, d))
        .chain(
            results
                .comfortable_destinations
                .iter()
                .map(|d| (Ranking::Comfortable, d)),
        );

    let mut markers: Vec<DestinationMarker> = Vec::new();
    for (ranking, destination) in ranked {
        if markers
            .iter()
            .any(|m| m.point == destination.coordinates && m.title == destination.city)
        {
            continue;
        }
        markers.push(DestinationMarker {
            point: destination.coordinates,
            title: destination.city.clone(),
            popup: popup(destination),
            ranking,
        });
    }
    markers
}

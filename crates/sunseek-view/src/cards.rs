//! Destination cards for the two ranked result lists.

use serde::Serialize;
use sunseek_core::Destination;

/// Which ranking a card belongs to. Decides the score shown on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    Sunny,
    Comfortable,
}

impl Ranking {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Ranking::Sunny => "Sunniest destinations",
            Ranking::Comfortable => "Most comfortable destinations",
        }
    }

    #[must_use]
    pub fn score_label(self) -> &'static str {
        match self {
            Ranking::Sunny => "Sunny score",
            Ranking::Comfortable => "Comfort score",
        }
    }

    fn score_of(self, destination: &Destination) -> Option<f64> {
        match self {
            Ranking::Sunny => destination.sunny_score,
            Ranking::Comfortable => destination.comfort_score,
        }
    }
}

/// Coarse band of a 0–10 score, used as the badge class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    const HIGH_FROM: f64 = 7.0;
    const MEDIUM_FROM: f64 = 4.0;

    /// `high` from 7, `medium` from 4, `low` below that or when unknown.
    #[must_use]
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= Self::HIGH_FROM => ScoreBand::High,
            Some(s) if s >= Self::MEDIUM_FROM => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::High => "score-high",
            ScoreBand::Medium => "score-medium",
            ScoreBand::Low => "score-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationCard {
    /// 1-based position in its list.
    pub rank: usize,
    pub city: String,
    /// `"Region, Country"` with empty parts left out; `None` if both are empty.
    pub location: Option<String>,
    pub distance_text: String,
    pub score_label: &'static str,
    pub score_text: String,
    pub band: ScoreBand,
    pub condition: Option<String>,
    pub temperature_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardList {
    pub ranking: Ranking,
    pub title: &'static str,
    pub cards: Vec<DestinationCard>,
}

impl CardList {
    /// Cards in server order; the backend already ranks each list.
    #[must_use]
    pub fn new(ranking: Ranking, destinations: &[Destination]) -> Self {
        Self {
            ranking,
            title: ranking.title(),
            cards: destinations
                .iter()
                .enumerate()
                .map(|(i, d)| render_card(i + 1, d, ranking))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub(crate) fn location_line(destination: &Destination) -> Option<String> {
    let parts: Vec<&str> = [destination.region.as_str(), destination.country.as_str()]
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub(crate) fn distance_text(miles: f64) -> String {
    format!("{miles:.1} miles away")
}

pub(crate) fn score_text(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.1}"))
}

#[must_use]
pub fn render_card(rank: usize, destination: &Destination, ranking: Ranking) -> DestinationCard {
    let score = ranking.score_of(destination);
    DestinationCard {
        rank,
        city: destination.city.clone(),
        location: location_line(destination),
        distance_text: distance_text(destination.distance_miles),
        score_label: ranking.score_label(),
        score_text: score_text(score),
        band: ScoreBand::from_score(score),
        condition: destination.condition.clone(),
        temperature_text: destination.temperature_c.map(|t| format!("{t:.0}°C")),
    }
}

impl std::fmt::Display for DestinationCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>2}. {}", self.rank, self.city)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        write!(
            f,
            " | {} | {} {} [{}]",
            self.distance_text,
            self.score_label,
            self.score_text,
            self.band.css_class()
        )?;
        if let Some(condition) = &self.condition {
            write!(f, " | {condition}")?;
        }
        if let Some(temperature) = &self.temperature_text {
            write!(f, " {temperature}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for CardList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.cards.is_empty() {
            return writeln!(f, "    (none)");
        }
        for card in &self.cards {
            writeln!(f, "{card}")?;
        }
        Ok(())
    }
}

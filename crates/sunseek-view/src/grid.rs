//! Browse-mode grid layer: projected cells colored by score.
//!
//! Scores run 0–10. The ramp goes red at 0, amber at 5 and green at 10,
//! interpolated linearly in RGB between those stops.

use serde::Serialize;
use sunseek_core::{GeoPoint, IndexType, ProjectionResponse};
use sunseek_map::PolygonStyle;

const MAX_SCORE: f64 = 10.0;
const RED: [u8; 3] = [0xd7, 0x30, 0x27];
const AMBER: [u8; 3] = [0xfd, 0xae, 0x61];
const GREEN: [u8; 3] = [0x1a, 0x98, 0x50];
/// Used when a score is not a number.
const NO_DATA_COLOR: &str = "#9e9e9e";

const FILL_OPACITY: f64 = 0.45;
const STROKE_COLOR: &str = "#ffffff";
const STROKE_WEIGHT: f64 = 0.5;
const LEGEND_STEPS: u8 = 5;

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let v = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    // Always within 0..=255 since t is in [0, 1].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = v.round().clamp(0.0, 255.0) as u8;
    channel
}

fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Fill color for a 0–10 score. Out-of-range scores are clamped.
#[must_use]
pub fn score_color(score: f64) -> String {
    if score.is_nan() {
        return NO_DATA_COLOR.to_string();
    }
    let s = score.clamp(0.0, MAX_SCORE);
    let half = MAX_SCORE / 2.0;
    let (from, to, t) = if s <= half {
        (RED, AMBER, s / half)
    } else {
        (AMBER, GREEN, (s - half) / half)
    };
    hex([
        lerp_channel(from[0], to[0], t),
        lerp_channel(from[1], to[1], t),
        lerp_channel(from[2], to[2], t),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCellView {
    pub id: u64,
    pub ring: Vec<GeoPoint>,
    pub score: f64,
    pub fill_color: String,
    /// Tooltip text, e.g. `"Sunny score: 7.3"`.
    pub label: String,
}

impl GridCellView {
    #[must_use]
    pub fn polygon_style(&self) -> PolygonStyle {
        PolygonStyle {
            fill_color: self.fill_color.clone(),
            fill_opacity: FILL_OPACITY,
            stroke_color: STROKE_COLOR.to_string(),
            stroke_weight: STROKE_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayer {
    pub index_type: IndexType,
    pub cells: Vec<GridCellView>,
    pub legend: Vec<LegendEntry>,
    pub summary: String,
}

fn legend() -> Vec<LegendEntry> {
    let width = MAX_SCORE / f64::from(LEGEND_STEPS);
    (0..LEGEND_STEPS)
        .map(|i| {
            let low = f64::from(i) * width;
            let high = low + width;
            LegendEntry {
                label: format!("{low:.0}-{high:.0}"),
                color: score_color(low + width / 2.0),
            }
        })
        .collect()
}

fn summary(projection: &ProjectionResponse, index_type: IndexType, cells: &[GridCellView]) -> String {
    let scored: Vec<f64> = cells
        .iter()
        .map(|c| c.score)
        .filter(|s| s.is_finite())
        .collect();
    let mut text = format!("{}: {} cells", index_type.label(), cells.len());
    if projection.total_cells > cells.len() {
        text.push_str(&format!(" of {}", projection.total_cells));
    }
    if !projection.target_date.is_empty() {
        text.push_str(&format!(" for {}", projection.target_date));
    }
    if !projection.time_range.is_empty() {
        text.push_str(&format!(" ({})", projection.time_range));
    }
    if !scored.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = scored.iter().sum::<f64>() / scored.len() as f64;
        let best = scored.iter().copied().fold(f64::MIN, f64::max);
        text.push_str(&format!(", average {mean:.1}, best {best:.1}"));
    }
    text
}

/// Cells with fewer than three vertices cannot be drawn and are skipped.
#[must_use]
pub fn render_grid(projection: &ProjectionResponse, index_type: IndexType) -> GridLayer {
    let cells: Vec<GridCellView> = projection
        .cells
        .iter()
        .filter(|cell| cell.boundaries.len() >= 3)
        .map(|cell| GridCellView {
            id: cell.id,
            ring: cell.boundaries.clone(),
            score: cell.score,
            fill_color: score_color(cell.score),
            label: format!("{}: {:.1}", index_type.label(), cell.score),
        })
        .collect();

    GridLayer {
        index_type,
        summary: summary(projection, index_type, &cells),
        legend: legend(),
        cells,
    }
}

impl std::fmt::Display for GridLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.summary)?;
        let legend: Vec<String> = self
            .legend
            .iter()
            .map(|e| format!("{} {}", e.label, e.color))
            .collect();
        writeln!(f, "Legend: {}", legend.join(" | "))
    }
}

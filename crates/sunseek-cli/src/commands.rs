//! Command handlers. Each one drives the [`App`] (or the fixture shifter)
//! and prints the resulting view model as text or JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sunseek_client::{SuggestSource, Suggester};
use sunseek_core::{parse_form_date, GeoPoint, IndexType, ProjectionQuery, SearchQuery};
use sunseek_view::{render_failure, render_suggestions};

use crate::app::{App, BrowseView};

/// Form values shared by `search` and `browse`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WindowArgs {
    /// Travel date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// First hour of the window (0-23)
    #[arg(long, default_value = "9")]
    pub start_hour: u8,
    /// Last hour of the window (0-23)
    #[arg(long, default_value = "17")]
    pub end_hour: u8,
}

impl WindowArgs {
    fn date_or_today(&self) -> String {
        self.date
            .clone()
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string())
    }
}

/// Parses `"LAT,LON"` into a validated point.
pub(crate) fn parse_point(raw: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got \"{raw}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude \"{}\"", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude \"{}\"", lon.trim()))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

/// Parses `"DX,DY"` pixel offsets.
pub(crate) fn parse_offset(raw: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got \"{raw}\""))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("invalid pixel offset \"{}\"", v.trim()))
    };
    Ok((parse(dx)?, parse(dy)?))
}

fn emit<T: Serialize + std::fmt::Display>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{value}");
    }
    Ok(())
}

pub(crate) async fn run_search(
    app: &mut App,
    from: &str,
    at: Option<GeoPoint>,
    radius: Option<f64>,
    window: &WindowArgs,
    json: bool,
) -> anyhow::Result<()> {
    let radius = radius.unwrap_or_else(|| f64::from(app.config().default_radius_miles));
    let query = SearchQuery::new(
        from,
        &window.date_or_today(),
        window.start_hour,
        window.end_hour,
        radius,
    )?;

    let origin = match at {
        Some(point) => Some(sunseek_view::SuggestionItem {
            index: 0,
            display_name: query.from.clone(),
            point,
        }),
        None => app.locate(&query.from).await,
    };
    if let Some(origin) = &origin {
        app.select_origin(origin);
    }

    let panel = app.search(&query).await;
    emit(&panel, json)?;
    if !json {
        println!(
            "\n{} destination marker(s) within {} miles",
            app.marker_count(),
            app.radius().radius_miles()
        );
    }
    Ok(())
}

/// Feeds `text` through the debounced suggester, one keystroke at a time when
/// `as_typed` is set, and prints the update for the final input.
pub(crate) async fn run_suggest(
    app: &App,
    text: &str,
    as_typed: bool,
    keystroke_ms: u64,
    json: bool,
) -> anyhow::Result<()> {
    let (mut suggester, mut stream) = app.suggester();
    type_text(
        &mut suggester,
        text,
        as_typed,
        Duration::from_millis(keystroke_ms),
    )
    .await;

    let update = stream
        .next()
        .await
        .context("suggestion stream closed before an update arrived")?;
    tracing::debug!(seq = update.seq, query = %update.query, "final suggestion update");

    match update.result {
        Ok(suggestions) => {
            let list = render_suggestions(&suggestions);
            if !json && !list.is_visible() {
                println!("No suggestions.");
                return Ok(());
            }
            emit(&list, json)
        }
        Err(err) => emit(&render_failure(&err), json),
    }
}

/// Sends `text` to the suggester, one prefix per keystroke when `as_typed`
/// is set. Always issues at least one input so the stream gets an update.
async fn type_text<S: SuggestSource>(
    suggester: &mut Suggester<S>,
    text: &str,
    as_typed: bool,
    keystroke: Duration,
) {
    if !as_typed || text.is_empty() {
        suggester.input(text);
        return;
    }
    for (i, c) in text.char_indices() {
        suggester.input(&text[..i + c.len_utf8()]);
        tokio::time::sleep(keystroke).await;
    }
}

pub(crate) async fn run_browse(
    app: &mut App,
    center: GeoPoint,
    radius: f64,
    index: IndexType,
    window: &WindowArgs,
    json: bool,
) -> anyhow::Result<()> {
    let query = ProjectionQuery::new(
        center,
        radius,
        index,
        &window.date_or_today(),
        window.start_hour,
        window.end_hour,
    )?;

    match app.browse(&query).await {
        BrowseView::Grid(layer) => {
            emit(&layer, json)?;
            if !json {
                println!("{} cell(s) drawn", app.grid_cell_count());
            }
        }
        BrowseView::Panel(panel) => emit(&panel, json)?,
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RadiusStatus {
    center: Option<GeoPoint>,
    radius_miles: u32,
    radius_m: f64,
    input_value: String,
    handle_label: String,
    handle: Option<GeoPoint>,
    handle_pixel: Option<(f64, f64)>,
}

impl std::fmt::Display for RadiusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(center) = self.center {
            writeln!(f, "Center:  {center}")?;
        }
        writeln!(
            f,
            "Radius:  {} miles ({:.0} m), input \"{}\"",
            self.radius_miles, self.radius_m, self.input_value
        )?;
        if let Some(handle) = self.handle {
            write!(f, "Handle:  {handle} \"{}\"", self.handle_label)?;
            if let Some((x, y)) = self.handle_pixel {
                write!(f, " at pixel ({x:.1}, {y:.1})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn radius_status(app: &App) -> RadiusStatus {
    let radius = app.radius();
    RadiusStatus {
        center: radius.center(),
        radius_miles: radius.radius_miles(),
        radius_m: radius.radius_m(),
        input_value: radius.input_value().to_string(),
        handle_label: radius.handle_label(),
        handle: radius.handle_position(),
        handle_pixel: radius.handle_pixel().map(|p| (p.x, p.y)),
    }
}

/// Places the radius circle and optionally applies a typed radius, a handle
/// drag, and a map pan, in that order.
pub(crate) fn run_radius(
    app: &mut App,
    center: GeoPoint,
    radius: Option<f64>,
    input: Option<&str>,
    drag_to: Option<GeoPoint>,
    pan: Option<(f64, f64)>,
    json: bool,
) -> anyhow::Result<()> {
    app.select_origin(&sunseek_view::SuggestionItem {
        index: 0,
        display_name: center.to_string(),
        point: center,
    });
    if let Some(miles) = radius {
        app.set_radius(miles);
    }
    if let Some(raw) = input {
        app.set_radius_from_input(raw);
    }
    if let Some(point) = drag_to {
        let miles = app
            .drag_handle_to(point)
            .context("radius control has no center")?;
        tracing::info!(radius_miles = miles, to = %point, "handle dragged");
    }
    if let Some((dx, dy)) = pan {
        app.pan_by(dx, dy);
    }
    emit(&radius_status(app), json)
}

pub(crate) fn run_shift_dates(
    path: &Path,
    today: Option<&str>,
    allow_past: bool,
) -> anyhow::Result<()> {
    let today: NaiveDate = match today {
        Some(raw) => parse_form_date(raw)?,
        None => Local::now().date_naive(),
    };
    let report = sunseek_fixture::shift_fixture_file(path, today, allow_past)
        .with_context(|| format!("failed to shift dates in {}", path.display()))?;

    println!("Earliest date in data: {}", report.earliest);
    println!("Target date:           {}", report.today);
    println!("Offset:                {} day(s)", report.offset_days);
    println!(
        "Updated {} forecast(s) and {} hourly entr(ies) in {}",
        report.forecasts_updated,
        report.hourly_updated,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sunseek_client::SunseekClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn suggester_for(
        server: &MockServer,
    ) -> (Suggester<SunseekClient>, sunseek_client::SuggestionStream) {
        let client = SunseekClient::new(&server.uri(), 5, "sunseek-test")
            .expect("client construction should not fail");
        Suggester::new(Arc::new(client), Duration::from_millis(20), 2)
    }

    #[tokio::test]
    async fn empty_text_typed_still_yields_an_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-suggest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let (mut suggester, mut stream) = suggester_for(&server);
        type_text(&mut suggester, "", true, Duration::from_millis(1)).await;

        let update = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("update should arrive")
            .expect("stream should stay open");
        assert_eq!(update.query, "");
        assert!(update.result.expect("short input is not an error").is_empty());
    }

    #[tokio::test]
    async fn typed_text_resolves_to_final_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-suggest"))
            .and(query_param("q", "Bat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Bath, Somerset", "lat": 51.38, "lon": -2.36}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let (mut suggester, mut stream) = suggester_for(&server);
        type_text(&mut suggester, "Bat", true, Duration::from_millis(1)).await;

        let update = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("update should arrive")
            .expect("stream should stay open");
        assert_eq!(update.query, "Bat");
        assert_eq!(update.result.expect("should parse").len(), 1);
    }
}

//! Application controller.
//!
//! `App` owns everything the page would otherwise keep in globals: the
//! client, the map, the radius control, and the overlays drawn for the
//! current mode. It is built once with [`App::new`] and torn down with
//! [`App::shutdown`].

use std::sync::Arc;

use sunseek_client::{SunseekClient, Suggester, SuggestionStream};
use sunseek_core::{AppConfig, GeoPoint, ProjectionQuery, SearchQuery};
use sunseek_map::{HeadlessMap, MapView, MarkerKind, OverlayId, RadiusControl};
use sunseek_view::{
    destination_markers, render_failure, render_grid, render_search_results,
    render_suggestions, GridLayer, ResultsPanel, SuggestionItem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Ranked destinations shown as cards and markers.
    Search,
    /// Projected weather index painted as a grid.
    Browse,
}

/// Outcome of a browse request.
#[derive(Debug)]
pub(crate) enum BrowseView {
    Grid(GridLayer),
    Panel(ResultsPanel),
}

#[derive(Debug)]
pub(crate) struct App {
    config: AppConfig,
    client: Arc<SunseekClient>,
    map: HeadlessMap,
    radius: RadiusControl,
    origin: Option<OverlayId>,
    markers: Vec<OverlayId>,
    grid: Vec<OverlayId>,
    mode: Mode,
}

impl App {
    /// Builds the client and map and attaches the radius control.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is unusable or the HTTP client
    /// cannot be built.
    pub(crate) fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = SunseekClient::from_config(&config)?;
        let mut map = HeadlessMap::new(
            GeoPoint::new(0.0, 0.0)?,
            config.map_zoom,
            config.map_viewport,
        );
        let mut radius = RadiusControl::new(f64::from(config.default_radius_miles));
        radius.attach(&mut map);

        tracing::info!(
            env = %config.env,
            api_base_url = %client.base_url(),
            radius_miles = radius.radius_miles(),
            "app initialized"
        );
        Ok(Self {
            config,
            client: Arc::new(client),
            map,
            radius,
            origin: None,
            markers: Vec::new(),
            grid: Vec::new(),
            mode: Mode::Search,
        })
    }

    pub(crate) fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn map(&self) -> &HeadlessMap {
        &self.map
    }

    pub(crate) fn radius(&self) -> &RadiusControl {
        &self.radius
    }

    pub(crate) fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub(crate) fn grid_cell_count(&self) -> usize {
        self.grid.len()
    }

    /// A fresh debounced suggester for the origin field.
    pub(crate) fn suggester(&self) -> (Suggester<SunseekClient>, SuggestionStream) {
        Suggester::from_config(Arc::clone(&self.client), &self.config)
    }

    /// Switches mode, clearing the overlays that belong to the other one.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        match mode {
            Mode::Search => self.clear_grid(),
            Mode::Browse => {
                self.clear_markers();
                self.clear_origin();
            }
        }
        self.mode = mode;
        tracing::debug!(?mode, "mode switched");
    }

    /// Top-ranked place for `text`, if the backend knows one.
    pub(crate) async fn locate(&self, text: &str) -> Option<SuggestionItem> {
        match self.client.suggest(text).await {
            Ok(suggestions) => render_suggestions(&suggestions).items.into_iter().next(),
            Err(err) => {
                tracing::warn!(error = %err, origin = text, "could not locate origin");
                None
            }
        }
    }

    /// Uses a picked suggestion as the search origin: centers the map and the
    /// radius circle on it and drops an origin marker.
    pub(crate) fn select_origin(&mut self, item: &SuggestionItem) {
        self.clear_origin();
        self.origin = Some(
            self.map
                .add_marker(item.point, MarkerKind::Origin, Some(&item.display_name)),
        );
        self.map.pan_to(item.point);
        self.radius.set_center_point(&mut self.map, item.point);
        self.pump_events();
    }

    pub(crate) fn set_radius(&mut self, miles: f64) -> u32 {
        self.radius.set_radius(&mut self.map, miles)
    }

    pub(crate) fn set_radius_from_input(&mut self, raw: &str) -> u32 {
        self.radius.set_radius_from_input(&mut self.map, raw)
    }

    /// Drops the radius handle at `point`. `None` if no center is set.
    pub(crate) fn drag_handle_to(&mut self, point: GeoPoint) -> Option<u32> {
        self.radius.on_handle_drag(&mut self.map, point)
    }

    pub(crate) fn pan_by(&mut self, dx: f64, dy: f64) {
        self.map.pan_by(dx, dy);
        self.pump_events();
    }

    /// Delivers queued viewport events to their listeners.
    pub(crate) fn pump_events(&mut self) -> usize {
        let events = self.map.drain_events();
        let mut handled = 0;
        for event in events {
            if self.radius.handle_map_event(&mut self.map, event) {
                handled += 1;
            }
        }
        handled
    }

    /// Runs a destination search. Markers are replaced only when the search
    /// succeeds; a failure leaves the previous ones in place.
    pub(crate) async fn search(&mut self, query: &SearchQuery) -> ResultsPanel {
        self.set_mode(Mode::Search);
        self.set_radius(f64::from(query.radius_miles));

        match self.client.search(query).await {
            Ok(results) => {
                self.clear_markers();
                for marker in destination_markers(&results) {
                    let id = self.map.add_marker(
                        marker.point,
                        MarkerKind::Destination,
                        Some(&marker.popup),
                    );
                    self.markers.push(id);
                }
                render_search_results(&results)
            }
            Err(err) => {
                tracing::warn!(error = %err, origin = %query.from, "search failed");
                render_failure(&err)
            }
        }
    }

    /// Paints the projected weather index around `query.center`. The grid is
    /// replaced only when the request succeeds.
    pub(crate) async fn browse(&mut self, query: &ProjectionQuery) -> BrowseView {
        self.set_mode(Mode::Browse);
        self.radius.set_center_point(&mut self.map, query.center);
        self.set_radius(f64::from(query.radius_miles));
        self.map.pan_to(query.center);
        self.pump_events();

        match self.client.project_weather_index(query).await {
            Ok(projection) => {
                let layer = render_grid(&projection, query.index_type);
                self.clear_grid();
                for cell in &layer.cells {
                    let id = self.map.add_polygon(&cell.ring, &cell.polygon_style());
                    self.grid.push(id);
                }
                BrowseView::Grid(layer)
            }
            Err(err) => {
                tracing::warn!(error = %err, center = %query.center, "projection failed");
                BrowseView::Panel(render_failure(&err))
            }
        }
    }

    /// Destroys the radius control, removes every overlay, and hands back
    /// the bare map.
    pub(crate) fn shutdown(mut self) -> HeadlessMap {
        self.radius.destroy(&mut self.map);
        self.clear_markers();
        self.clear_grid();
        self.clear_origin();
        tracing::info!(
            overlays = self.map.overlays().count(),
            listeners = self.map.listener_count(),
            "app shut down"
        );
        self.map
    }

    fn clear_markers(&mut self) {
        for id in self.markers.drain(..) {
            self.map.remove_overlay(id);
        }
    }

    fn clear_grid(&mut self) {
        for id in self.grid.drain(..) {
            self.map.remove_overlay(id);
        }
    }

    fn clear_origin(&mut self) {
        if let Some(id) = self.origin.take() {
            self.map.remove_overlay(id);
        }
    }
}

//! In-memory [`MapView`] with a Web-Mercator viewport.
//!
//! Keeps every overlay in a map keyed by id and queues viewport events for
//! registered listeners until the owner drains them. Used by the CLI to lay
//! out the radius control and result layers without a browser.

use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::PI;

use sunseek_core::{GeoPoint, Viewport};

use crate::view::{
    ListenerId, MapEvent, MapEventKind, MapView, MarkerKind, OverlayId, PolygonStyle, ScreenPoint,
};

/// Tile edge length in pixels at zoom 0.
const TILE_SIZE: f64 = 256.0;

/// Latitude where the square Web-Mercator world ends.
const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_78;

const MAX_ZOOM: f64 = 22.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Circle {
        center: GeoPoint,
        radius_m: f64,
    },
    Marker {
        at: GeoPoint,
        kind: MarkerKind,
        label: Option<String>,
    },
    Polygon {
        ring: Vec<GeoPoint>,
        style: PolygonStyle,
    },
}

#[derive(Debug)]
pub struct HeadlessMap {
    center: GeoPoint,
    zoom: f64,
    viewport: Viewport,
    overlays: BTreeMap<OverlayId, Overlay>,
    listeners: BTreeMap<ListenerId, MapEventKind>,
    pending: VecDeque<MapEvent>,
    next_id: u64,
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Absolute world pixel of a coordinate at `zoom`.
fn world_pixel(point: GeoPoint, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = point
        .lat()
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    let x = (point.lon() + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl HeadlessMap {
    #[must_use]
    pub fn new(center: GeoPoint, zoom: f64, viewport: Viewport) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM),
            viewport,
            overlays: BTreeMap::new(),
            listeners: BTreeMap::new(),
            pending: VecDeque::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Recenters the view. Queues a `Move` event.
    pub fn pan_to(&mut self, center: GeoPoint) {
        self.center = center;
        self.emit(MapEventKind::Move);
    }

    /// Shifts the view by a pixel offset. Queues a `Move` event.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let target = ScreenPoint {
            x: self.viewport.width / 2.0 + dx,
            y: self.viewport.height / 2.0 + dy,
        };
        self.center = self.unproject(target);
        self.emit(MapEventKind::Move);
    }

    /// Changes the zoom level, clamped to `0..=22`. Queues a `Zoom` event.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.0, MAX_ZOOM);
        self.emit(MapEventKind::Zoom);
    }

    /// Changes the viewport size. Queues a `Resize` event.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.emit(MapEventKind::Resize);
    }

    /// Takes every queued event in the order it was raised.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.overlays.iter().map(|(id, o)| (*id, o))
    }

    #[must_use]
    pub fn circle_count(&self) -> usize {
        self.overlays
            .values()
            .filter(|o| matches!(o, Overlay::Circle { .. }))
            .count()
    }

    #[must_use]
    pub fn marker_count(&self, kind: MarkerKind) -> usize {
        self.overlays
            .values()
            .filter(|o| matches!(o, Overlay::Marker { kind: k, .. } if *k == kind))
            .count()
    }

    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.overlays
            .values()
            .filter(|o| matches!(o, Overlay::Polygon { .. }))
            .count()
    }

    fn emit(&mut self, kind: MapEventKind) {
        for (listener, registered) in &self.listeners {
            if *registered == kind {
                self.pending.push_back(MapEvent {
                    listener: *listener,
                    kind,
                });
            }
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.next_id());
        self.overlays.insert(id, overlay);
        id
    }
}

impl MapView for HeadlessMap {
    fn add_circle(&mut self, center: GeoPoint, radius_m: f64) -> OverlayId {
        self.insert(Overlay::Circle { center, radius_m })
    }

    fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind, label: Option<&str>) -> OverlayId {
        self.insert(Overlay::Marker {
            at,
            kind,
            label: label.map(str::to_string),
        })
    }

    fn move_marker(&mut self, id: OverlayId, to: GeoPoint) {
        if let Some(Overlay::Marker { at, .. }) = self.overlays.get_mut(&id) {
            *at = to;
        }
    }

    fn set_marker_label(&mut self, id: OverlayId, text: &str) {
        if let Some(Overlay::Marker { label, .. }) = self.overlays.get_mut(&id) {
            *label = Some(text.to_string());
        }
    }

    fn add_polygon(&mut self, ring: &[GeoPoint], style: &PolygonStyle) -> OverlayId {
        self.insert(Overlay::Polygon {
            ring: ring.to_vec(),
            style: style.clone(),
        })
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn project(&self, point: GeoPoint) -> ScreenPoint {
        let size = world_size(self.zoom);
        let (px, py) = world_pixel(point, self.zoom);
        let (cx, cy) = world_pixel(self.center, self.zoom);
        // Take the short way around the antimeridian.
        let dx = (px - cx + size / 2.0).rem_euclid(size) - size / 2.0;
        ScreenPoint {
            x: self.viewport.width / 2.0 + dx,
            y: self.viewport.height / 2.0 + (py - cy),
        }
    }

    fn unproject(&self, pixel: ScreenPoint) -> GeoPoint {
        let size = world_size(self.zoom);
        let (cx, cy) = world_pixel(self.center, self.zoom);
        let wx = cx + (pixel.x - self.viewport.width / 2.0);
        let wy = cy + (pixel.y - self.viewport.height / 2.0);

        let lon = wrap_lon(wx / size * 360.0 - 180.0);
        let n = PI * (1.0 - 2.0 * wy / size);
        let lat = n
            .sinh()
            .atan()
            .to_degrees()
            .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG);

        // Non-finite pixels cannot be placed; fall back to the view center.
        GeoPoint::new(lat, lon).unwrap_or(self.center)
    }

    fn on(&mut self, kind: MapEventKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        id
    }

    fn off(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
        self.pending.retain(|e| e.listener != id);
    }
}

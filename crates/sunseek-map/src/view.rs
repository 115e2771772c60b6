//! The slippy-map surface the radius control and result layers draw on.
//!
//! Overlays and listeners are referred to by opaque ids handed out by the
//! map. Events are not delivered through callbacks: the map reports a
//! [`MapEvent`] naming the listener it is for, and the owner of that listener
//! handles it. This keeps the map free of references back into its users.

use sunseek_core::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Pixel position relative to the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Viewport changes a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    Move,
    Zoom,
    Resize,
}

/// A viewport change addressed to one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEvent {
    pub listener: ListenerId,
    pub kind: MapEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Draggable handle on the search-radius circle.
    RadiusHandle,
    /// A ranked search result.
    Destination,
    /// The search origin.
    Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_weight: f64,
}

pub trait MapView {
    /// Draws a circle of `radius_m` meters around `center`.
    fn add_circle(&mut self, center: GeoPoint, radius_m: f64) -> OverlayId;

    /// Places a marker. `label` is shown as a persistent tooltip or popup.
    fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind, label: Option<&str>) -> OverlayId;

    fn move_marker(&mut self, id: OverlayId, at: GeoPoint);

    fn set_marker_label(&mut self, id: OverlayId, label: &str);

    /// Draws a closed polygon through `ring`.
    fn add_polygon(&mut self, ring: &[GeoPoint], style: &PolygonStyle) -> OverlayId;

    /// Removes an overlay. Unknown ids are ignored.
    fn remove_overlay(&mut self, id: OverlayId);

    /// Geographic to viewport pixel coordinates under the current view.
    fn project(&self, point: GeoPoint) -> ScreenPoint;

    /// Viewport pixel to geographic coordinates under the current view.
    fn unproject(&self, pixel: ScreenPoint) -> GeoPoint;

    fn on(&mut self, kind: MapEventKind) -> ListenerId;

    /// Unregisters a listener. Unknown ids are ignored.
    fn off(&mut self, id: ListenerId);
}

//! Search-radius control: a circle around the search center plus a draggable
//! handle on its eastern edge.
//!
//! The control is the single source of truth for the current center and
//! radius. The radius can be edited three ways and all of them funnel through
//! [`RadiusControl::set_radius`]:
//!
//! - programmatically,
//! - through the bound numeric input ([`RadiusControl::set_radius_from_input`]),
//! - by dragging the handle ([`RadiusControl::on_handle_drag`]), where the new
//!   radius is the rounded great-circle distance from the center to the drop
//!   point, independent of direction.
//!
//! Nothing is drawn until the control is attached to a map *and* has a
//! center; until then mutators only update state.

use sunseek_core::{
    clamp_radius_miles, destination_point, distance_m, meters_to_miles, miles_to_meters,
    CoreError, GeoPoint, EAST_BEARING_DEG,
};

use crate::view::{
    ListenerId, MapEvent, MapEventKind, MapView, MarkerKind, OverlayId, ScreenPoint,
};

/// Viewport changes that move the handle on screen.
const TRACKED_EVENTS: [MapEventKind; 3] =
    [MapEventKind::Move, MapEventKind::Zoom, MapEventKind::Resize];

#[derive(Debug)]
pub struct RadiusControl {
    center: Option<GeoPoint>,
    radius_miles: u32,
    /// Text of the bound numeric form field.
    input_value: String,
    circle: Option<OverlayId>,
    handle: Option<OverlayId>,
    handle_position: Option<GeoPoint>,
    handle_pixel: Option<ScreenPoint>,
    listeners: Vec<ListenerId>,
    attached: bool,
    visible: bool,
}

impl RadiusControl {
    /// Creates a detached control with no center. `initial_radius_miles` is
    /// clamped like any other radius.
    #[must_use]
    pub fn new(initial_radius_miles: f64) -> Self {
        let radius_miles = clamp_radius_miles(initial_radius_miles);
        Self {
            center: None,
            radius_miles,
            input_value: radius_miles.to_string(),
            circle: None,
            handle: None,
            handle_position: None,
            handle_pixel: None,
            listeners: Vec::new(),
            attached: false,
            visible: true,
        }
    }

    #[must_use]
    pub fn center(&self) -> Option<GeoPoint> {
        self.center
    }

    #[must_use]
    pub fn radius_miles(&self) -> u32 {
        self.radius_miles
    }

    /// Circle radius in map units.
    #[must_use]
    pub fn radius_m(&self) -> f64 {
        miles_to_meters(f64::from(self.radius_miles))
    }

    /// Current text of the bound numeric input.
    #[must_use]
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Persistent label shown next to the handle.
    #[must_use]
    pub fn handle_label(&self) -> String {
        format!("{} miles", self.radius_miles)
    }

    #[must_use]
    pub fn handle_position(&self) -> Option<GeoPoint> {
        self.handle_position
    }

    /// Handle position in viewport pixels as of the last update.
    #[must_use]
    pub fn handle_pixel(&self) -> Option<ScreenPoint> {
        self.handle_pixel
    }

    #[must_use]
    pub fn circle(&self) -> Option<OverlayId> {
        self.circle
    }

    #[must_use]
    pub fn handle(&self) -> Option<OverlayId> {
        self.handle
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Registers viewport listeners on `map` and draws any deferred circle.
    /// Attaching twice is a no-op.
    pub fn attach<M: MapView>(&mut self, map: &mut M) {
        if self.attached {
            return;
        }
        self.register(map);
        self.attached = true;
        self.visible = true;
        tracing::debug!(listeners = self.listeners.len(), "radius control attached");
        self.redraw(map);
    }

    /// Validates raw degrees and moves the center there.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] for out-of-range or non-finite
    /// input; the control is left unchanged.
    pub fn set_center<M: MapView>(
        &mut self,
        map: &mut M,
        lat: f64,
        lon: f64,
    ) -> Result<(), CoreError> {
        let point = GeoPoint::new(lat, lon)?;
        self.set_center_point(map, point);
        Ok(())
    }

    /// Moves the center, replacing the circle and repositioning the handle.
    pub fn set_center_point<M: MapView>(&mut self, map: &mut M, point: GeoPoint) {
        self.center = Some(point);
        tracing::debug!(center = %point, "radius center set");
        self.redraw(map);
    }

    /// Stores `max(1, min(200, round(miles)))`, redraws, and writes the stored
    /// value back into the bound input. Returns the stored radius.
    pub fn set_radius<M: MapView>(&mut self, map: &mut M, miles: f64) -> u32 {
        let clamped = clamp_radius_miles(miles);
        self.radius_miles = clamped;
        self.input_value = clamped.to_string();
        tracing::debug!(requested = miles, radius_miles = clamped, "radius set");
        self.redraw(map);
        clamped
    }

    /// Applies text typed into the bound input.
    ///
    /// Text that is not a number restores the input to the current radius.
    pub fn set_radius_from_input<M: MapView>(&mut self, map: &mut M, raw: &str) -> u32 {
        match raw.trim().parse::<f64>() {
            Ok(miles) => self.set_radius(map, miles),
            Err(_) => {
                self.input_value = self.radius_miles.to_string();
                self.radius_miles
            }
        }
    }

    /// Converts a handle drop point into a radius.
    ///
    /// The radius is the rounded great-circle distance from the center, so
    /// every point at the same distance yields the same radius. Returns `None`
    /// when no center is set.
    pub fn on_handle_drag<M: MapView>(&mut self, map: &mut M, point: GeoPoint) -> Option<u32> {
        let center = self.center?;
        let miles = meters_to_miles(distance_m(center, point));
        Some(self.set_radius(map, miles))
    }

    /// [`Self::on_handle_drag`] for a drop point in viewport pixels.
    pub fn on_handle_drag_screen<M: MapView>(
        &mut self,
        map: &mut M,
        pixel: ScreenPoint,
    ) -> Option<u32> {
        let point = map.unproject(pixel);
        self.on_handle_drag(map, point)
    }

    /// Places the handle due east of the center at the current radius and
    /// refreshes its label. Creates the handle marker on first use.
    pub fn update_handle_position<M: MapView>(&mut self, map: &mut M) {
        if !self.attached || !self.visible {
            return;
        }
        let Some(center) = self.center else {
            return;
        };

        let position = destination_point(center, self.radius_m(), EAST_BEARING_DEG);
        let pixel = map.project(position);
        let label = self.handle_label();

        match self.handle {
            Some(id) => {
                map.move_marker(id, position);
                map.set_marker_label(id, &label);
            }
            None => {
                let id = map.add_marker(position, MarkerKind::RadiusHandle, Some(&label));
                self.handle = Some(id);
            }
        }
        self.handle_position = Some(position);
        self.handle_pixel = Some(pixel);
    }

    /// Reacts to a viewport event. Returns `false` for events addressed to
    /// listeners this control did not register.
    pub fn handle_map_event<M: MapView>(&mut self, map: &mut M, event: MapEvent) -> bool {
        if !self.listeners.contains(&event.listener) {
            return false;
        }
        self.update_handle_position(map);
        true
    }

    /// Removes the circle and handle and unregisters the viewport listeners.
    /// Center and radius are kept for [`Self::show`].
    pub fn hide<M: MapView>(&mut self, map: &mut M) {
        self.visible = false;
        self.clear_overlays(map);
        self.unregister(map);
    }

    /// Re-registers listeners and redraws after [`Self::hide`].
    pub fn show<M: MapView>(&mut self, map: &mut M) {
        self.visible = true;
        if self.attached && self.listeners.is_empty() {
            self.register(map);
        }
        self.redraw(map);
    }

    /// Removes all overlays and unregisters every listener added by
    /// [`Self::attach`]. The control keeps its center and radius and can be
    /// attached again.
    pub fn destroy<M: MapView>(&mut self, map: &mut M) {
        self.clear_overlays(map);
        self.unregister(map);
        self.attached = false;
        tracing::debug!("radius control destroyed");
    }

    fn register<M: MapView>(&mut self, map: &mut M) {
        self.listeners = TRACKED_EVENTS.iter().map(|kind| map.on(*kind)).collect();
    }

    fn unregister<M: MapView>(&mut self, map: &mut M) {
        for id in self.listeners.drain(..) {
            map.off(id);
        }
    }

    fn clear_overlays<M: MapView>(&mut self, map: &mut M) {
        if let Some(id) = self.circle.take() {
            map.remove_overlay(id);
        }
        if let Some(id) = self.handle.take() {
            map.remove_overlay(id);
        }
        self.handle_position = None;
        self.handle_pixel = None;
    }

    fn redraw<M: MapView>(&mut self, map: &mut M) {
        if !self.attached || !self.visible {
            return;
        }
        let Some(center) = self.center else {
            return;
        };
        if let Some(old) = self.circle.take() {
            map.remove_overlay(old);
        }
        self.circle = Some(map.add_circle(center, self.radius_m()));
        self.update_handle_position(map);
    }
}

#[cfg(test)]
mod tests {
    use sunseek_core::Viewport;

    use super::*;
    use crate::headless::{HeadlessMap, Overlay};

    fn london() -> GeoPoint {
        GeoPoint::new(51.5074, -0.1278).unwrap()
    }

    fn map() -> HeadlessMap {
        HeadlessMap::new(
            london(),
            7.0,
            Viewport {
                width: 1024.0,
                height: 768.0,
            },
        )
    }

    #[test]
    fn new_clamps_initial_radius() {
        assert_eq!(RadiusControl::new(0.0).radius_miles(), 1);
        assert_eq!(RadiusControl::new(999.0).input_value(), "200");
    }

    #[test]
    fn set_radius_before_attach_only_updates_state() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        assert_eq!(control.set_radius(&mut m, 75.0), 75);
        control.set_center_point(&mut m, london());
        assert!(control.circle().is_none());
        assert_eq!(m.overlays().count(), 0);

        control.attach(&mut m);
        assert_eq!(m.circle_count(), 1);
        assert_eq!(m.marker_count(MarkerKind::RadiusHandle), 1);
        assert_eq!(control.handle_label(), "75 miles");
    }

    #[test]
    fn attach_without_center_draws_nothing() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_radius(&mut m, 20.0);
        assert_eq!(m.overlays().count(), 0);
        assert_eq!(m.listener_count(), 3);
    }

    #[test]
    fn attach_twice_registers_listeners_once() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.attach(&mut m);
        assert_eq!(m.listener_count(), 3);
    }

    #[test]
    fn set_center_rejects_out_of_range_and_keeps_state() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center(&mut m, 51.5074, -0.1278).unwrap();
        let err = control.set_center(&mut m, 95.0, 0.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCoordinate { .. }));
        assert_eq!(control.center(), Some(london()));
        assert_eq!(m.circle_count(), 1);
    }

    #[test]
    fn input_round_trip_keeps_field_and_handle_consistent() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());

        assert_eq!(control.set_radius_from_input(&mut m, " 120.6 "), 121);
        assert_eq!(control.input_value(), "121");
        assert_eq!(control.handle_label(), "121 miles");

        assert_eq!(control.set_radius_from_input(&mut m, "abc"), 121);
        assert_eq!(control.input_value(), "121");
    }

    #[test]
    fn drag_without_center_is_ignored() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        assert_eq!(control.on_handle_drag(&mut m, london()), None);
        assert_eq!(control.radius_miles(), 50);
    }

    #[test]
    fn drag_snaps_handle_back_to_east() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());

        let north = destination_point(london(), miles_to_meters(30.0), 0.0);
        assert_eq!(control.on_handle_drag(&mut m, north), Some(30));

        let handle = control.handle_position().unwrap();
        assert!(handle.lon() > london().lon());
        let Some(Overlay::Marker { at, label, .. }) = m.overlay(control.handle().unwrap()) else {
            panic!("handle marker missing");
        };
        assert_eq!(*at, handle);
        assert_eq!(label.as_deref(), Some("30 miles"));
    }

    #[test]
    fn drag_in_screen_space_uses_projection() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());

        let target = destination_point(london(), miles_to_meters(64.0), 200.0);
        let pixel = m.project(target);
        assert_eq!(control.on_handle_drag_screen(&mut m, pixel), Some(64));
    }

    #[test]
    fn viewport_events_move_the_handle_pixel() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());
        let before = control.handle_pixel().unwrap();

        m.pan_by(-200.0, 0.0);
        for event in m.drain_events() {
            assert!(control.handle_map_event(&mut m, event));
        }
        let after = control.handle_pixel().unwrap();
        assert!((after.x - before.x - 200.0).abs() < 1e-6);

        m.set_zoom(8.0);
        for event in m.drain_events() {
            control.handle_map_event(&mut m, event);
        }
        assert_eq!(
            control.handle_pixel().unwrap(),
            m.project(control.handle_position().unwrap())
        );
    }

    #[test]
    fn foreign_events_are_ignored() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        let foreign = m.on(MapEventKind::Move);
        m.pan_by(1.0, 1.0);
        let handled: Vec<bool> = m
            .drain_events()
            .into_iter()
            .map(|e| control.handle_map_event(&mut m, e))
            .collect();
        assert_eq!(handled.iter().filter(|h| **h).count(), 1);
        m.off(foreign);
    }

    #[test]
    fn hide_and_show_toggle_overlays() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());

        control.hide(&mut m);
        assert_eq!(m.overlays().count(), 0);
        control.set_radius(&mut m, 80.0);
        m.resize(Viewport {
            width: 500.0,
            height: 500.0,
        });
        for event in m.drain_events() {
            control.handle_map_event(&mut m, event);
        }
        assert_eq!(m.overlays().count(), 0);
        assert_eq!(m.listener_count(), 0);

        control.show(&mut m);
        assert_eq!(m.listener_count(), 3);
        assert_eq!(m.circle_count(), 1);
        assert_eq!(control.handle_label(), "80 miles");
    }

    #[test]
    fn destroy_then_reattach_restores_drawing() {
        let mut m = map();
        let mut control = RadiusControl::new(50.0);
        control.attach(&mut m);
        control.set_center_point(&mut m, london());
        control.destroy(&mut m);
        assert!(!control.is_attached());
        assert_eq!(m.listener_count(), 0);
        assert_eq!(m.overlays().count(), 0);

        control.attach(&mut m);
        assert_eq!(m.circle_count(), 1);
    }
}

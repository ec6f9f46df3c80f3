use tracing::{debug, warn};

use crate::camera::{Camera, PerspectiveCamera};
use crate::math::Point3;
use crate::projector::{FrameStats, WaypointProjector};
use crate::registry::{ListenerId, WaypointEvent, WaypointRegistry};
use crate::state::{HudSettings, HudState, Waypoint, WaypointData};
use crate::visual::{VisualBackend, VisualId};

/// One HUD session: state, registry, projector and the marker backend.
///
/// Hosts that want to share the state with their own systems can drive
/// [`HudState`], [`WaypointRegistry`] and [`WaypointProjector`] directly
/// instead.
#[derive(Debug)]
pub struct WaypointHud<V, C = PerspectiveCamera> {
    state: HudState<C>,
    registry: WaypointRegistry,
    projector: WaypointProjector,
    backend: V,
}

impl<V: VisualBackend, C: Camera> WaypointHud<V, C> {
    /// Creates a HUD without a camera. Frames are skipped until one is
    /// bound with [`Self::bind_camera`].
    #[must_use]
    pub fn new(backend: V, settings: HudSettings) -> Self {
        warn!("waypoint HUD created without a camera; markers stay idle until one is bound");
        Self::build(backend, settings, None)
    }

    /// Creates a HUD projecting through `camera`.
    #[must_use]
    pub fn with_camera(backend: V, settings: HudSettings, camera: C) -> Self {
        Self::build(backend, settings, Some(camera))
    }

    fn build(backend: V, settings: HudSettings, camera: Option<C>) -> Self {
        let mut state = HudState::new(settings);
        state.camera = camera;
        Self {
            state,
            registry: WaypointRegistry::new(),
            projector: WaypointProjector::new(),
            backend,
        }
    }

    /// Registers a waypoint. See [`WaypointRegistry::add_waypoint`].
    pub fn add_waypoint(&mut self, position: Point3, id: impl Into<String>) -> WaypointData {
        self.registry
            .add_waypoint(&mut self.state, &mut self.backend, position, id)
    }

    /// Removes every waypoint equal to `data`.
    pub fn remove_waypoint(&mut self, data: &WaypointData) -> bool {
        self.registry
            .remove_waypoint(&mut self.state, &mut self.backend, data)
    }

    /// Removes every waypoint with the given id.
    pub fn remove_waypoint_by_id(&mut self, id: &str) -> bool {
        self.registry
            .remove_waypoint_by_id(&mut self.state, &mut self.backend, id)
    }

    /// Removes all waypoints.
    pub fn clear(&mut self) -> usize {
        self.registry.clear(&mut self.state, &mut self.backend)
    }

    /// Moves a waypoint's target.
    pub fn set_position(&mut self, visual: VisualId, position: Point3) -> bool {
        self.state.set_position(visual, position)
    }

    /// Hides the overlay without touching any waypoint.
    pub fn hide_all(&mut self) {
        WaypointRegistry::hide_all(&mut self.state, &mut self.backend);
    }

    /// Shows the overlay again at full layer opacity.
    pub fn show_all(&mut self) {
        WaypointRegistry::show_all(&mut self.state, &mut self.backend);
    }

    /// Subscribes to added/removed notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(WaypointEvent<'_>) + 'static) -> ListenerId {
        self.registry.subscribe(listener)
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Runs one frame of marker placement.
    pub fn update(&mut self) -> FrameStats {
        self.projector.update_all(&self.state, &mut self.backend)
    }

    /// Binds the camera, returning the previous one.
    pub fn bind_camera(&mut self, camera: C) -> Option<C> {
        self.state.bind_camera(camera)
    }

    /// Unbinds the camera; frames are skipped until one is bound again.
    pub fn unbind_camera(&mut self) -> Option<C> {
        self.state.unbind_camera()
    }

    /// Returns the bound camera.
    #[must_use]
    pub fn camera(&self) -> Option<&C> {
        self.state.camera()
    }

    /// Returns the bound camera for modification, e.g. to move it.
    pub fn camera_mut(&mut self) -> Option<&mut C> {
        self.state.camera_mut()
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> &HudSettings {
        self.state.settings()
    }

    /// Returns the settings for modification; changes apply next frame.
    pub fn settings_mut(&mut self) -> &mut HudSettings {
        self.state.settings_mut()
    }

    /// Registered waypoints in insertion order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        self.state.waypoints()
    }

    /// Returns the session state.
    #[must_use]
    pub fn state(&self) -> &HudState<C> {
        &self.state
    }

    /// Returns the marker backend.
    #[must_use]
    pub fn backend(&self) -> &V {
        &self.backend
    }

    /// Returns the marker backend for modification.
    pub fn backend_mut(&mut self) -> &mut V {
        &mut self.backend
    }

    /// Ends the session: removes every waypoint (firing removal
    /// notifications and destroying markers) and hands back the backend.
    pub fn into_backend(mut self) -> V {
        let removed = self.clear();
        debug!(removed, "waypoint HUD torn down");
        self.backend
    }
}

/// Holds the single active [`WaypointHud`] of an application.
///
/// Installing a new HUD replaces the previous one, tearing down its markers
/// first.
#[derive(Debug)]
pub struct HudSlot<V, C = PerspectiveCamera> {
    active: Option<WaypointHud<V, C>>,
}

impl<V, C> Default for HudSlot<V, C> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<V: VisualBackend, C: Camera> HudSlot<V, C> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `hud` as the active instance.
    ///
    /// Returns the backend of the replaced instance, already emptied of its
    /// markers.
    pub fn install(&mut self, hud: WaypointHud<V, C>) -> Option<V> {
        let previous = self.active.replace(hud)?;
        warn!(
            waypoints = previous.waypoints().len(),
            "replacing active waypoint HUD"
        );
        Some(previous.into_backend())
    }

    /// Removes and tears down the active instance.
    pub fn shutdown(&mut self) -> Option<V> {
        self.active.take().map(WaypointHud::into_backend)
    }

    #[must_use]
    pub fn get(&self) -> Option<&WaypointHud<V, C>> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut WaypointHud<V, C>> {
        self.active.as_mut()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::f64::consts::FRAC_PI_2;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::camera::CameraProjection;
    use crate::math::{Point2, Vector3};
    use crate::visual::MarkerStore;

    fn camera_at(eye: Point3, target: Point3) -> PerspectiveCamera {
        let projection = CameraProjection::new(FRAC_PI_2, 1.0, 0.1, 1000.0).unwrap();
        PerspectiveCamera::look_at(eye, target, Vector3::y(), projection).unwrap()
    }

    fn hud() -> WaypointHud<MarkerStore> {
        WaypointHud::with_camera(
            MarkerStore::new(),
            HudSettings::default(),
            camera_at(Point3::origin(), Point3::new(0.0, 0.0, -1.0)),
        )
    }

    #[test]
    fn frame_places_visible_marker() {
        let mut hud = hud();
        let data = hud.add_waypoint(Point3::new(0.0, 0.0, -20.0), "ahead");
        let stats = hud.update();

        assert_eq!(stats.anchored, 1);
        let marker = hud.backend().marker(data.visual).unwrap();
        let anchor = marker.anchor.unwrap();
        assert_relative_eq!(anchor.x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(anchor.y, 0.5, epsilon = 1e-9);
        assert_eq!(marker.label, "20m");
    }

    #[test]
    fn turning_around_holds_anchor_and_keeps_label_current() {
        let mut hud = hud();
        let data = hud.add_waypoint(Point3::new(5.0, 0.0, -10.0), "post");
        hud.update();
        let before = hud.backend().marker(data.visual).unwrap().anchor;

        hud.camera_mut()
            .unwrap()
            .set_pose(
                Point3::new(0.0, 0.0, 2.0),
                Point3::new(0.0, 0.0, 10.0),
                Vector3::y(),
            )
            .unwrap();
        let stats = hud.update();

        assert_eq!(stats.behind, 1);
        let marker = hud.backend().marker(data.visual).unwrap();
        assert_eq!(marker.anchor, before);
        assert_eq!(marker.label, "13m");
    }

    #[test]
    fn show_hide_show_restores_visibility() {
        let mut hud = hud();
        hud.add_waypoint(Point3::new(0.0, 0.0, -5.0), "a");

        hud.show_all();
        hud.hide_all();
        hud.show_all();

        assert!(!hud.state().is_hidden());
        assert_relative_eq!(hud.state().overlay_alpha(), 1.0);
        assert_relative_eq!(hud.backend().overlay_alpha(), 1.0);
        assert_eq!(hud.update().anchored, 1);
    }

    #[test]
    fn hidden_frames_issue_no_updates() {
        let mut hud = hud();
        hud.add_waypoint(Point3::new(0.0, 0.0, -5.0), "a");
        hud.add_waypoint(Point3::new(0.0, 0.0, 5.0), "b");
        hud.hide_all();

        for _ in 0..3 {
            assert_eq!(hud.update().skipped, 2);
        }
        assert_eq!(hud.backend().update_count(), 0);
    }

    #[test]
    fn unbound_camera_idles_until_bound() {
        let mut hud: WaypointHud<MarkerStore> =
            WaypointHud::new(MarkerStore::new(), HudSettings::default());
        let data = hud.add_waypoint(Point3::new(0.0, 0.0, -5.0), "a");
        assert_eq!(hud.update().skipped, 1);
        assert_eq!(hud.backend().update_count(), 0);

        hud.bind_camera(camera_at(Point3::origin(), Point3::new(0.0, 0.0, -1.0)));
        hud.update();
        let anchor = hud.backend().marker(data.visual).unwrap().anchor.unwrap();
        assert_relative_eq!(anchor, Point2::new(0.5, 0.5), epsilon = 1e-9);
    }

    #[test]
    fn moving_target_follows_on_next_frame() {
        let mut hud = hud();
        let data = hud.add_waypoint(Point3::new(0.0, 0.0, -10.0), "mover");
        hud.update();

        assert!(hud.set_position(data.visual, Point3::new(100.0, 0.0, -10.0)));
        hud.update();
        let anchor = hud.backend().marker(data.visual).unwrap().anchor.unwrap();
        assert_relative_eq!(anchor.x, 1.0);
    }

    #[test]
    fn installing_replaces_previous_session() {
        let removed = Rc::new(RefCell::new(Vec::new()));
        let mut first = hud();
        let sink = Rc::clone(&removed);
        first.subscribe(move |event| {
            if let WaypointEvent::Removed(d) = event {
                sink.borrow_mut().push(d.id.clone());
            }
        });
        first.add_waypoint(Point3::new(0.0, 0.0, -5.0), "old");

        let mut slot = HudSlot::new();
        assert!(slot.install(first).is_none());
        assert_eq!(slot.get().unwrap().waypoints().len(), 1);

        let old_backend = slot.install(hud()).unwrap();
        assert!(old_backend.is_empty());
        assert_eq!(*removed.borrow(), vec!["old".to_owned()]);
        assert!(slot.get().unwrap().waypoints().is_empty());

        slot.get_mut()
            .unwrap()
            .add_waypoint(Point3::new(0.0, 0.0, -1.0), "new");
        let last = slot.shutdown().unwrap();
        assert!(last.is_empty());
        assert!(slot.get().is_none());
    }
}

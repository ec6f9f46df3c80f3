use slotmap::SlotMap;
use tracing::debug;

use crate::camera::Camera;
use crate::math::{Color, Point3};
use crate::state::{HudState, Waypoint, WaypointData};
use crate::visual::VisualBackend;

slotmap::new_key_type! {
    /// Handle returned by [`WaypointRegistry::subscribe`].
    pub struct ListenerId;
}

/// Lifecycle notification delivered synchronously to registry listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaypointEvent<'a> {
    /// A waypoint was appended to the collection.
    Added(&'a WaypointData),
    /// A waypoint is being removed; its marker is destroyed right after.
    Removed(&'a WaypointData),
}

type Listener = Box<dyn FnMut(WaypointEvent<'_>)>;

/// Manages the waypoint collection held in a [`HudState`].
///
/// The registry itself only owns the listener list; the collection, color
/// cursor and visibility flag live in the state passed to each call.
#[derive(Default)]
pub struct WaypointRegistry {
    listeners: SlotMap<ListenerId, Listener>,
}

impl WaypointRegistry {
    /// Creates a registry with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for added/removed notifications.
    ///
    /// Listeners run inside the triggering call and cannot reach back into
    /// the registry.
    pub fn subscribe(&mut self, listener: impl FnMut(WaypointEvent<'_>) + 'static) -> ListenerId {
        self.listeners.insert(Box::new(listener))
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Registers a waypoint at `position` and creates its marker.
    ///
    /// The waypoint is appended after all existing ones and receives the
    /// next color in the hue rotation. Ids are not checked for uniqueness.
    pub fn add_waypoint<C, V>(
        &mut self,
        state: &mut HudState<C>,
        backend: &mut V,
        position: Point3,
        id: impl Into<String>,
    ) -> WaypointData
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        let data = WaypointData {
            id: id.into(),
            position,
            visual: backend.create_visual(),
        };
        let color = Self::assign_next_color(state);
        state.waypoints.push(Waypoint {
            data: data.clone(),
            color,
        });
        debug!(id = %data.id, ?position, count = state.waypoints.len(), "waypoint added");

        self.notify(WaypointEvent::Added(&data));
        data
    }

    /// Removes every waypoint equal to `data`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_waypoint<C, V>(
        &mut self,
        state: &mut HudState<C>,
        backend: &mut V,
        data: &WaypointData,
    ) -> bool
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        self.remove_matching(state, backend, |w| w == data) > 0
    }

    /// Removes every waypoint whose id is exactly `id`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_waypoint_by_id<C, V>(
        &mut self,
        state: &mut HudState<C>,
        backend: &mut V,
        id: &str,
    ) -> bool
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        self.remove_matching(state, backend, |w| w.id == id) > 0
    }

    /// Removes all waypoints, returning how many there were.
    pub fn clear<C, V>(&mut self, state: &mut HudState<C>, backend: &mut V) -> usize
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        self.remove_matching(state, backend, |_| true)
    }

    /// Produces the next color of the hue rotation and advances the cursor.
    ///
    /// Hue is `cursor mod 360` degrees at full saturation and value. The
    /// cursor starts at 1 and grows by `color_step` per call; removals never
    /// rewind it.
    pub fn assign_next_color<C: Camera>(state: &mut HudState<C>) -> Color {
        let hue = state.color_cursor.rem_euclid(360.0) / 360.0;
        state.color_cursor += state.settings.color_step;
        Color::from_hsv(hue, 1.0, 1.0)
    }

    /// Hides the overlay. Waypoints are kept; the projector skips them.
    pub fn hide_all<C, V>(state: &mut HudState<C>, backend: &mut V)
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        Self::set_hidden(state, backend, true);
    }

    /// Shows the overlay again at full layer opacity.
    pub fn show_all<C, V>(state: &mut HudState<C>, backend: &mut V)
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        Self::set_hidden(state, backend, false);
    }

    fn set_hidden<C, V>(state: &mut HudState<C>, backend: &mut V, hidden: bool)
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        state.hidden = hidden;
        state.overlay_alpha = if hidden { 0.0 } else { 1.0 };
        backend.set_overlay_alpha(state.overlay_alpha);
        debug!(hidden, "overlay visibility changed");
    }

    /// Notifies and destroys each match in order, then drops all matches in
    /// one pass.
    fn remove_matching<C, V>(
        &mut self,
        state: &mut HudState<C>,
        backend: &mut V,
        predicate: impl Fn(&WaypointData) -> bool,
    ) -> usize
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        let mut removed = 0;
        for waypoint in state.waypoints.iter().filter(|w| predicate(&w.data)) {
            self.notify(WaypointEvent::Removed(&waypoint.data));
            backend.destroy_visual(waypoint.data.visual);
            removed += 1;
        }
        if removed == 0 {
            return 0;
        }

        state.waypoints.retain(|w| !predicate(&w.data));
        debug!(removed, count = state.waypoints.len(), "waypoints removed");
        removed
    }

    fn notify(&mut self, event: WaypointEvent<'_>) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for WaypointRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

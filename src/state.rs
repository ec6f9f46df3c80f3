use std::fmt;

use crate::camera::{Camera, PerspectiveCamera};
use crate::math::{Color, Point3};
use crate::visual::VisualId;

/// Tunable HUD parameters. Changes take effect on the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSettings {
    /// Hue advance, in degrees, between consecutively added waypoints.
    pub color_step: f32,
    /// Alpha applied to every marker color.
    pub opacity: f32,
    /// Uniform scale applied to every marker.
    pub scale: f32,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            color_step: 30.0,
            opacity: 0.8,
            scale: 0.6,
        }
    }
}

/// Identity of a tracked point of interest.
///
/// Equality compares id, position and visual handle together.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointData {
    /// Caller-chosen label; may be empty and need not be unique.
    pub id: String,
    /// World-space target position.
    pub position: Point3,
    /// Handle of the marker drawn for this waypoint.
    pub visual: VisualId,
}

/// A registered waypoint together with its assigned color.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub(crate) data: WaypointData,
    pub(crate) color: Color,
}

impl Waypoint {
    /// Returns the waypoint's identity.
    #[must_use]
    pub fn data(&self) -> &WaypointData {
        &self.data
    }

    /// Returns the opaque color assigned at registration.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
}

/// Session state shared by the registry and the projector.
///
/// The host owns exactly one of these per session and passes it by
/// reference to [`crate::WaypointRegistry`] and [`crate::WaypointProjector`].
pub struct HudState<C = PerspectiveCamera> {
    pub(crate) settings: HudSettings,
    pub(crate) camera: Option<C>,
    pub(crate) hidden: bool,
    pub(crate) overlay_alpha: f32,
    pub(crate) color_cursor: f32,
    pub(crate) waypoints: Vec<Waypoint>,
}

impl<C: Camera> HudState<C> {
    /// Creates an empty, visible state with no camera bound.
    #[must_use]
    pub fn new(settings: HudSettings) -> Self {
        Self {
            settings,
            camera: None,
            hidden: false,
            overlay_alpha: 1.0,
            color_cursor: 1.0,
            waypoints: Vec::new(),
        }
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> &HudSettings {
        &self.settings
    }

    /// Returns the settings for modification.
    pub fn settings_mut(&mut self) -> &mut HudSettings {
        &mut self.settings
    }

    /// Binds the camera used for projection, returning the previous one.
    pub fn bind_camera(&mut self, camera: C) -> Option<C> {
        self.camera.replace(camera)
    }

    /// Unbinds the camera. Frames are skipped until a camera is bound again.
    pub fn unbind_camera(&mut self) -> Option<C> {
        self.camera.take()
    }

    /// Returns the bound camera.
    #[must_use]
    pub fn camera(&self) -> Option<&C> {
        self.camera.as_ref()
    }

    /// Returns the bound camera for modification, e.g. to move it.
    pub fn camera_mut(&mut self) -> Option<&mut C> {
        self.camera.as_mut()
    }

    /// Whether the overlay is currently hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Opacity of the overlay layer: `0` while hidden, `1` otherwise.
    #[must_use]
    pub fn overlay_alpha(&self) -> f32 {
        self.overlay_alpha
    }

    /// Hue cursor, in degrees, used for the next color assignment.
    #[must_use]
    pub fn color_cursor(&self) -> f32 {
        self.color_cursor
    }

    /// Registered waypoints in insertion order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Iterates over waypoints whose id matches exactly.
    pub fn find_by_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Waypoint> + 'a {
        self.waypoints.iter().filter(move |w| w.data.id == id)
    }

    /// Returns the waypoint drawn by a given marker.
    #[must_use]
    pub fn get(&self, visual: VisualId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.data.visual == visual)
    }

    /// Moves a waypoint's target. Returns `false` if no waypoint uses the
    /// given marker.
    pub fn set_position(&mut self, visual: VisualId, position: Point3) -> bool {
        match self.waypoints.iter_mut().find(|w| w.data.visual == visual) {
            Some(waypoint) => {
                waypoint.data.position = position;
                true
            }
            None => false,
        }
    }

    /// Number of registered waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns whether no waypoint is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl<C: Camera> Default for HudState<C> {
    fn default() -> Self {
        Self::new(HudSettings::default())
    }
}

impl<C> fmt::Debug for HudState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HudState")
            .field("settings", &self.settings)
            .field("camera_bound", &self.camera.is_some())
            .field("hidden", &self.hidden)
            .field("overlay_alpha", &self.overlay_alpha)
            .field("color_cursor", &self.color_cursor)
            .field("waypoints", &self.waypoints)
            .finish()
    }
}

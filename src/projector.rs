use tracing::trace;

use crate::camera::Camera;
use crate::math::{clamp_to_viewport, Point2, Vector3, TOLERANCE};
use crate::state::{HudState, Waypoint};
use crate::visual::VisualBackend;

/// Outcome of placing one waypoint for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// No camera is bound or the overlay is hidden; nothing was sent to the
    /// backend.
    Skipped,
    /// The target is behind the camera. Color, scale and label were updated;
    /// the marker keeps its previous anchor.
    Behind,
    /// The target coincides with the camera (or its position is not finite),
    /// so no facing can be computed. Handled like [`Placement::Behind`].
    Degenerate,
    /// The marker was pinned to this clamped viewport point.
    Anchored(Point2),
}

/// Per-frame tally returned by [`WaypointProjector::update_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub anchored: usize,
    pub behind: usize,
    pub degenerate: usize,
    pub skipped: usize,
}

/// Places waypoint markers on the screen each frame.
#[derive(Debug, Default)]
pub struct WaypointProjector {
    frame: u64,
}

impl WaypointProjector {
    /// Creates a projector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames processed by [`Self::update_all`].
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Updates every registered waypoint in insertion order.
    pub fn update_all<C, V>(&mut self, state: &HudState<C>, backend: &mut V) -> FrameStats
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        self.frame += 1;
        let mut stats = FrameStats::default();
        for waypoint in &state.waypoints {
            match Self::project(state, waypoint, backend) {
                Placement::Skipped => stats.skipped += 1,
                Placement::Behind => stats.behind += 1,
                Placement::Degenerate => stats.degenerate += 1,
                Placement::Anchored(_) => stats.anchored += 1,
            }
        }
        trace!(frame = self.frame, ?stats, "waypoints projected");
        stats
    }

    /// Computes and applies the display attributes of one waypoint.
    ///
    /// Color, scale and distance label are sent whenever a camera is bound
    /// and the overlay is visible. The anchor is only moved when the target
    /// lies in front of the camera; off-screen targets are pinned to the
    /// nearest viewport edge.
    pub fn project<C, V>(state: &HudState<C>, waypoint: &Waypoint, backend: &mut V) -> Placement
    where
        C: Camera,
        V: VisualBackend + ?Sized,
    {
        let Some(camera) = state.camera.as_ref() else {
            return Placement::Skipped;
        };
        if state.hidden {
            return Placement::Skipped;
        }

        let visual = waypoint.data.visual;
        let settings = &state.settings;
        backend.set_color(visual, waypoint.color.with_alpha(settings.opacity));
        backend.set_scale(visual, Vector3::repeat(f64::from(settings.scale)));

        let target = waypoint.data.position;
        let offset = target - camera.position();
        backend.set_label(visual, &distance_label(offset.norm()));

        // Projecting a point behind the camera mirrors it through the
        // center of the screen, so the anchor is held instead.
        let Some(direction) = offset.try_normalize(TOLERANCE) else {
            return Placement::Degenerate;
        };
        let dot = direction.dot(&camera.forward());
        if dot.is_nan() {
            return Placement::Degenerate;
        }
        if dot <= 0.0 {
            return Placement::Behind;
        }

        let viewport = camera.world_to_viewport(&target);
        let anchor = clamp_to_viewport(viewport.x, viewport.y);
        if !(anchor.x.is_finite() && anchor.y.is_finite()) {
            return Placement::Degenerate;
        }
        backend.set_anchor(visual, anchor);
        Placement::Anchored(anchor)
    }
}

/// Formats a distance as whole meters, truncating toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn distance_label(distance: f64) -> String {
    format!("{}m", distance as i64)
}

mod marker_store;

pub use marker_store::{Marker, MarkerStore};

use crate::math::{Color, Point2, Vector3};

slotmap::new_key_type! {
    /// Opaque handle to a marker owned by a [`VisualBackend`].
    pub struct VisualId;
}

/// The visual-representation collaborator that draws waypoint markers.
///
/// The registry asks it to create and destroy markers; the projector pushes
/// per-frame display attributes through it. Implementations should ignore
/// calls against handles they no longer know.
pub trait VisualBackend {
    /// Instantiates a screen-space marker and returns its handle.
    fn create_visual(&mut self) -> VisualId;

    /// Tears down a marker.
    fn destroy_visual(&mut self, id: VisualId);

    /// Pins the marker to a normalized viewport point (anchor min = max).
    fn set_anchor(&mut self, id: VisualId, anchor: Point2);

    /// Sets the marker tint, alpha included.
    fn set_color(&mut self, id: VisualId, color: Color);

    /// Sets the marker's local scale.
    fn set_scale(&mut self, id: VisualId, scale: Vector3);

    /// Sets the distance label text.
    fn set_label(&mut self, id: VisualId, text: &str);

    /// Sets the opacity of the whole overlay layer.
    fn set_overlay_alpha(&mut self, alpha: f32);
}

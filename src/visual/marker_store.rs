use slotmap::SlotMap;

use super::{VisualBackend, VisualId};
use crate::error::{Result, VisualError};
use crate::math::{Color, Point2, Vector3};

/// Last display state applied to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Viewport anchor, `None` until the marker is first placed.
    pub anchor: Option<Point2>,
    pub color: Color,
    pub scale: Vector3,
    pub label: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            anchor: None,
            color: Color::WHITE,
            scale: Vector3::repeat(1.0),
            label: String::new(),
        }
    }
}

/// Headless [`VisualBackend`] that records marker state in memory.
///
/// Useful for servers, tests, and hosts that read marker state back and
/// draw it themselves.
#[derive(Debug)]
pub struct MarkerStore {
    markers: SlotMap<VisualId, Marker>,
    overlay_alpha: f32,
    updates: usize,
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self {
            markers: SlotMap::with_key(),
            overlay_alpha: 1.0,
            updates: 0,
        }
    }
}

impl MarkerStore {
    /// Creates a new, empty marker store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker for a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker was never created or has been destroyed.
    pub fn marker(&self, id: VisualId) -> Result<&Marker> {
        self.markers
            .get(id)
            .ok_or_else(|| VisualError::MarkerNotFound.into())
    }

    /// Returns whether a handle refers to a live marker.
    #[must_use]
    pub fn contains(&self, id: VisualId) -> bool {
        self.markers.contains_key(id)
    }

    /// Number of live markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns whether no marker is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Current opacity of the overlay layer.
    #[must_use]
    pub fn overlay_alpha(&self) -> f32 {
        self.overlay_alpha
    }

    /// Total number of anchor/color/scale/label calls received.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates
    }

    fn apply(&mut self, id: VisualId, f: impl FnOnce(&mut Marker)) {
        self.updates += 1;
        if let Some(marker) = self.markers.get_mut(id) {
            f(marker);
        }
    }
}

impl VisualBackend for MarkerStore {
    fn create_visual(&mut self) -> VisualId {
        self.markers.insert(Marker::default())
    }

    fn destroy_visual(&mut self, id: VisualId) {
        self.markers.remove(id);
    }

    fn set_anchor(&mut self, id: VisualId, anchor: Point2) {
        self.apply(id, |m| m.anchor = Some(anchor));
    }

    fn set_color(&mut self, id: VisualId, color: Color) {
        self.apply(id, |m| m.color = color);
    }

    fn set_scale(&mut self, id: VisualId, scale: Vector3) {
        self.apply(id, |m| m.scale = scale);
    }

    fn set_label(&mut self, id: VisualId, text: &str) {
        self.apply(id, |m| {
            m.label.clear();
            m.label.push_str(text);
        });
    }

    fn set_overlay_alpha(&mut self, alpha: f32) {
        self.overlay_alpha = alpha;
    }
}

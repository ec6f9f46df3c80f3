//! Screen-space HUD markers for world-space waypoints.
//!
//! A [`WaypointRegistry`] tracks points of interest in a [`HudState`] and
//! assigns each a distinct hue. Every frame a [`WaypointProjector`] projects
//! them through a [`Camera`], pins off-screen targets to the viewport edge,
//! and pushes anchor, color, scale and distance label to a
//! [`VisualBackend`]. [`WaypointHud`] bundles the pieces for hosts that do
//! not need to share the state.

pub mod camera;
pub mod error;
pub mod hud;
pub mod math;
pub mod projector;
pub mod registry;
pub mod state;
pub mod visual;

pub use camera::{Camera, CameraProjection, PerspectiveCamera};
pub use error::{HudError, Result};
pub use hud::{HudSlot, WaypointHud};
pub use projector::{FrameStats, Placement, WaypointProjector};
pub use registry::{ListenerId, WaypointEvent, WaypointRegistry};
pub use state::{HudSettings, HudState, Waypoint, WaypointData};
pub use visual::{Marker, MarkerStore, VisualBackend, VisualId};

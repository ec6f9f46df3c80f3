mod color;

pub use color::Color;

/// 2D point type, used for normalized viewport coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Clamps both axes of a viewport point independently into `[0, 1]`.
///
/// Points projected outside the screen end up pinned to the nearest edge
/// (or corner) instead of leaving the overlay.
#[must_use]
pub fn clamp_to_viewport(x: f64, y: f64) -> Point2 {
    Point2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

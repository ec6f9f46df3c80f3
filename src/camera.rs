use nalgebra::{Isometry3, Perspective3};

use crate::error::{CameraError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Camera state consulted by the projector each frame.
pub trait Camera {
    /// World-space position of the camera.
    fn position(&self) -> Point3;

    /// Unit vector the camera looks along.
    fn forward(&self) -> Vector3;

    /// Projects a world point into normalized viewport space.
    ///
    /// `x` and `y` are in `[0, 1]` for points inside the view (origin at the
    /// bottom-left corner); values outside that range are off-screen. `z` is
    /// the view-space depth in world units. Points behind the camera produce
    /// mirrored coordinates, so callers must check the facing first.
    fn world_to_viewport(&self, point: &Point3) -> Point3;
}

/// Frustum parameters of a perspective camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraProjection {
    perspective: Perspective3<f64>,
}

impl CameraProjection {
    /// Creates a new perspective projection.
    ///
    /// `fovy` is the vertical field of view in radians, `aspect` is
    /// width / height.
    ///
    /// # Errors
    ///
    /// Returns an error if the field of view is outside `(0, π)`, the
    /// aspect ratio is not positive, or the clip planes do not satisfy
    /// `0 < near < far`.
    pub fn new(fovy: f64, aspect: f64, near: f64, far: f64) -> Result<Self> {
        if !(fovy > 0.0 && fovy < std::f64::consts::PI) {
            return Err(CameraError::InvalidProjection(format!(
                "field of view {fovy} must be in (0, pi)"
            ))
            .into());
        }
        if !(aspect.is_finite() && aspect > TOLERANCE) {
            return Err(CameraError::InvalidProjection(format!(
                "aspect ratio {aspect} must be positive"
            ))
            .into());
        }
        if !(near > 0.0 && far.is_finite() && far - near > TOLERANCE) {
            return Err(CameraError::InvalidProjection(format!(
                "clip planes must satisfy 0 < near < far (got {near}, {far})"
            ))
            .into());
        }
        Ok(Self {
            perspective: Perspective3::new(aspect, fovy, near, far),
        })
    }

    /// Returns the vertical field of view in radians.
    #[must_use]
    pub fn fovy(&self) -> f64 {
        self.perspective.fovy()
    }

    /// Returns the aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.perspective.aspect()
    }
}

/// A right-handed perspective camera aimed with a look-at pose.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    eye: Point3,
    forward: Vector3,
    view: Isometry3<f64>,
    projection: CameraProjection,
}

impl PerspectiveCamera {
    /// Creates a camera at `eye` looking toward `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pose is degenerate (see [`Self::set_pose`]).
    pub fn look_at(
        eye: Point3,
        target: Point3,
        up: Vector3,
        projection: CameraProjection,
    ) -> Result<Self> {
        let (forward, view) = build_view(&eye, &target, &up)?;
        Ok(Self {
            eye,
            forward,
            view,
            projection,
        })
    }

    /// Re-aims the camera.
    ///
    /// # Errors
    ///
    /// Returns an error if `eye` and `target` coincide, `up` is parallel to
    /// the viewing direction, or any input is non-finite. The camera is left
    /// unchanged on error.
    pub fn set_pose(&mut self, eye: Point3, target: Point3, up: Vector3) -> Result<()> {
        let (forward, view) = build_view(&eye, &target, &up)?;
        self.eye = eye;
        self.forward = forward;
        self.view = view;
        Ok(())
    }

    /// Replaces the frustum, e.g. after a window resize.
    pub fn set_projection(&mut self, projection: CameraProjection) {
        self.projection = projection;
    }

    /// Returns the current frustum.
    #[must_use]
    pub fn projection(&self) -> &CameraProjection {
        &self.projection
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Point3 {
        self.eye
    }

    fn forward(&self) -> Vector3 {
        self.forward
    }

    fn world_to_viewport(&self, point: &Point3) -> Point3 {
        let in_view = self.view.transform_point(point);
        let ndc = self.projection.perspective.project_point(&in_view);
        Point3::new((ndc.x + 1.0) * 0.5, (ndc.y + 1.0) * 0.5, -in_view.z)
    }
}

fn build_view(eye: &Point3, target: &Point3, up: &Vector3) -> Result<(Vector3, Isometry3<f64>)> {
    let finite = eye.coords.iter().all(|c| c.is_finite())
        && target.coords.iter().all(|c| c.is_finite())
        && up.iter().all(|c| c.is_finite());
    if !finite {
        return Err(CameraError::DegeneratePose("non-finite eye, target or up".to_owned()).into());
    }
    let forward = (target - eye)
        .try_normalize(TOLERANCE)
        .ok_or_else(|| CameraError::DegeneratePose("eye and target coincide".to_owned()))?;
    if forward.cross(up).norm() < TOLERANCE {
        return Err(
            CameraError::DegeneratePose("up vector is parallel to view direction".to_owned())
                .into(),
        );
    }
    Ok((forward, Isometry3::look_at_rh(eye, target, up)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn square_projection() -> CameraProjection {
        CameraProjection::new(FRAC_PI_2, 1.0, 0.1, 1000.0).unwrap()
    }

    fn camera_looking_down_z() -> PerspectiveCamera {
        PerspectiveCamera::look_at(
            Point3::origin(),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::y(),
            square_projection(),
        )
        .unwrap()
    }

    #[test]
    fn forward_is_unit_direction_to_target() {
        let camera = PerspectiveCamera::look_at(
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(1.0, 2.0, 13.0),
            Vector3::y(),
            square_projection(),
        )
        .unwrap();
        assert_relative_eq!(camera.forward(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(camera.position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn point_on_axis_projects_to_center() {
        let camera = camera_looking_down_z();
        let vp = camera.world_to_viewport(&Point3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(vp.x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(vp.y, 0.5, epsilon = 1e-9);
        assert_relative_eq!(vp.z, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn frustum_edges_map_to_viewport_edges() {
        // 90 degree fov: at depth 10 the frustum spans [-10, 10]
        let camera = camera_looking_down_z();
        let right_top = camera.world_to_viewport(&Point3::new(10.0, 10.0, -10.0));
        assert_relative_eq!(right_top.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(right_top.y, 1.0, epsilon = 1e-9);

        let left_bottom = camera.world_to_viewport(&Point3::new(-10.0, -10.0, -10.0));
        assert_relative_eq!(left_bottom.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(left_bottom.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn off_screen_point_leaves_unit_range() {
        let camera = camera_looking_down_z();
        let vp = camera.world_to_viewport(&Point3::new(30.0, 0.0, -10.0));
        assert!(vp.x > 1.0);
    }

    #[test]
    fn set_pose_moves_camera() {
        let mut camera = camera_looking_down_z();
        camera
            .set_pose(
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(0.0, 0.0, 10.0),
                Vector3::y(),
            )
            .unwrap();
        assert_relative_eq!(camera.forward(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(camera.position(), Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn degenerate_pose_is_rejected() {
        let mut camera = camera_looking_down_z();
        assert!(camera
            .set_pose(Point3::origin(), Point3::origin(), Vector3::y())
            .is_err());
        assert!(camera
            .set_pose(Point3::origin(), Point3::new(0.0, 5.0, 0.0), Vector3::y())
            .is_err());
        assert!(camera
            .set_pose(
                Point3::origin(),
                Point3::new(0.0, 0.0, -1.0),
                Vector3::new(f64::NAN, 1.0, 0.0),
            )
            .is_err());
        // unchanged after failed update
        assert_relative_eq!(camera.forward(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn non_finite_up_is_rejected_at_construction() {
        let result = PerspectiveCamera::look_at(
            Point3::origin(),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(f64::NAN, 1.0, 0.0),
            square_projection(),
        );
        assert!(matches!(
            result,
            Err(crate::error::HudError::Camera(CameraError::DegeneratePose(_)))
        ));
        assert!(PerspectiveCamera::look_at(
            Point3::origin(),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, f64::INFINITY, 0.0),
            square_projection(),
        )
        .is_err());
    }

    #[test]
    fn invalid_projection_is_rejected() {
        assert!(CameraProjection::new(0.0, 1.0, 0.1, 100.0).is_err());
        assert!(CameraProjection::new(FRAC_PI_2, 0.0, 0.1, 100.0).is_err());
        assert!(CameraProjection::new(FRAC_PI_2, 1.0, 0.0, 100.0).is_err());
        assert!(CameraProjection::new(FRAC_PI_2, 1.0, 10.0, 1.0).is_err());
        assert!(CameraProjection::new(f64::NAN, 1.0, 0.1, 100.0).is_err());
    }

    #[test]
    fn projection_accessors() {
        let projection = CameraProjection::new(1.0, 16.0 / 9.0, 0.1, 100.0).unwrap();
        assert_relative_eq!(projection.fovy(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(projection.aspect(), 16.0 / 9.0, epsilon = 1e-12);
    }
}

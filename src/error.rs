use thiserror::Error;

/// Top-level error type for the waymark HUD.
///
/// Core registry and projector operations never fail; these errors only
/// surface from host-side conveniences such as camera construction and
/// marker lookups.
#[derive(Debug, Error)]
pub enum HudError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Visual(#[from] VisualError),
}

/// Errors related to camera construction.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    #[error("degenerate camera pose: {0}")]
    DegeneratePose(String),
}

/// Errors related to the visual-representation backend.
#[derive(Debug, Error)]
pub enum VisualError {
    #[error("marker not found")]
    MarkerNotFound,
}

/// Convenience type alias for results using [`HudError`].
pub type Result<T> = std::result::Result<T, HudError>;

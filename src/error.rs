//! Error types for grid construction and traversal.

/// Errors that can occur when building a grid or walking a ray through it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TraversalError {
    /// The radial bounds are not a valid non-empty interval.
    #[error("radial bounds must satisfy 0 <= min < max with finite values, got [{min}, {max}]")]
    InvalidRadialBound {
        /// The minimum radius that was supplied.
        min: f64,
        /// The maximum radius that was supplied.
        max: f64,
    },

    /// An angular range is not a non-empty subinterval of `[0, 2π]`.
    #[error("{family} range [{min}, {max}] must be a non-empty subinterval of [0, 2*pi]")]
    InvalidAngularRange {
        /// Which angular family the range belongs to (`"polar"` or `"azimuthal"`).
        family: &'static str,
        /// The minimum angle that was supplied.
        min: f64,
        /// The maximum angle that was supplied.
        max: f64,
    },

    /// One or more section counts are zero.
    #[error("section counts must all be positive, got {radial}x{polar}x{azimuthal}")]
    InvalidSectionCounts {
        /// Radial section count.
        radial: usize,
        /// Polar section count.
        polar: usize,
        /// Azimuthal section count.
        azimuthal: usize,
    },

    /// The sphere center has a non-finite component.
    #[error("sphere center must be finite")]
    InvalidCenter,

    /// The ray origin has a non-finite component.
    #[error("ray origin must be finite")]
    InvalidRayOrigin,

    /// The ray direction is zero or has a non-finite component.
    #[error("ray direction must be non-zero and finite")]
    InvalidRayDirection,

    /// The traversal failed to terminate within the safety bound.
    ///
    /// The bound is `8 * (radial + polar + azimuthal)` sections; exceeding it
    /// indicates the step selection stopped making progress. The partial
    /// result is discarded.
    #[error("traversal exceeded the safety bound of {limit} steps")]
    Diverged {
        /// The step limit that was exceeded.
        limit: usize,
    },
}

//! Sphere bounds: the radial and angular extent of a voxelized sphere.

use std::f64::consts::TAU;

use crate::error::TraversalError;

// Permit angular maxima that round a hair above 2*pi (e.g. `2.0 * PI`).
const ANGLE_SLACK: f64 = TAU * 1e-12;

/// The radial and angular extent of a spherical voxel grid.
///
/// The radial interval `[min_radius, max_radius]` may start above zero,
/// which leaves a hollow cavity at the center that no voxel covers. The
/// polar and azimuthal ranges are subintervals of `[0, 2π]`; the common
/// case is the full circle on both.
///
/// # Example
///
/// ```
/// use std::f64::consts::TAU;
/// use sphere_walk::SphereBound;
///
/// let bound = SphereBound::full(10.0);
/// assert_eq!(bound.min_radius, 0.0);
/// assert_eq!(bound.max_radius, 10.0);
/// assert_eq!(bound.max_polar, TAU);
///
/// let shell = SphereBound::hollow(2.0, 10.0);
/// assert_eq!(shell.min_radius, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereBound {
    /// Inner radius of the grid (0 for a solid sphere).
    pub min_radius: f64,
    /// Outer radius of the grid.
    pub max_radius: f64,
    /// Start of the polar range, in `[0, 2π]`.
    pub min_polar: f64,
    /// End of the polar range, in `[0, 2π]`.
    pub max_polar: f64,
    /// Start of the azimuthal range, in `[0, 2π]`.
    pub min_azimuthal: f64,
    /// End of the azimuthal range, in `[0, 2π]`.
    pub max_azimuthal: f64,
}

impl SphereBound {
    /// A solid sphere of the given radius covering the full circle in both
    /// angular families.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::SphereBound;
    ///
    /// let bound = SphereBound::full(4.0);
    /// assert!(bound.validate().is_ok());
    /// ```
    #[must_use]
    pub const fn full(max_radius: f64) -> Self {
        Self::hollow(0.0, max_radius)
    }

    /// A hollow shell between the two radii covering the full circle in
    /// both angular families.
    #[must_use]
    pub const fn hollow(min_radius: f64, max_radius: f64) -> Self {
        Self {
            min_radius,
            max_radius,
            min_polar: 0.0,
            max_polar: TAU,
            min_azimuthal: 0.0,
            max_azimuthal: TAU,
        }
    }

    /// Replaces the polar range.
    #[must_use]
    pub const fn with_polar_range(mut self, min: f64, max: f64) -> Self {
        self.min_polar = min;
        self.max_polar = max;
        self
    }

    /// Replaces the azimuthal range.
    #[must_use]
    pub const fn with_azimuthal_range(mut self, min: f64, max: f64) -> Self {
        self.min_azimuthal = min;
        self.max_azimuthal = max;
        self
    }

    /// Checks that the bound describes a non-degenerate grid extent.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::InvalidRadialBound`] unless
    /// `0 <= min_radius < max_radius` with both finite, and
    /// [`TraversalError::InvalidAngularRange`] unless each angular range is
    /// a non-empty subinterval of `[0, 2π]`.
    pub fn validate(&self) -> Result<(), TraversalError> {
        if !self.min_radius.is_finite()
            || !self.max_radius.is_finite()
            || self.min_radius < 0.0
            || self.min_radius >= self.max_radius
        {
            return Err(TraversalError::InvalidRadialBound {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        Self::validate_range("polar", self.min_polar, self.max_polar)?;
        Self::validate_range("azimuthal", self.min_azimuthal, self.max_azimuthal)
    }

    fn validate_range(family: &'static str, min: f64, max: f64) -> Result<(), TraversalError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max || max > TAU + ANGLE_SLACK
        {
            return Err(TraversalError::InvalidAngularRange { family, min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_full() {
        let bound = SphereBound::full(10.0);
        assert_eq!(bound.min_radius, 0.0);
        assert_eq!(bound.max_radius, 10.0);
        assert_eq!(bound.min_polar, 0.0);
        assert_eq!(bound.max_polar, TAU);
        assert!(bound.validate().is_ok());
    }

    #[test]
    fn test_hollow() {
        let bound = SphereBound::hollow(2.0, 10.0);
        assert_eq!(bound.min_radius, 2.0);
        assert!(bound.validate().is_ok());
    }

    #[test]
    fn test_with_polar_range() {
        let bound = SphereBound::full(1.0).with_polar_range(0.0, PI);
        assert_eq!(bound.max_polar, PI);
        assert!(bound.validate().is_ok());
    }

    #[test]
    fn test_two_pi_rounding_accepted() {
        // 2.0 * PI can land one ulp above TAU; the validator tolerates it.
        let bound = SphereBound::full(1.0).with_azimuthal_range(0.0, 2.0 * PI);
        assert!(bound.validate().is_ok());
    }

    #[test]
    fn test_inverted_radii_rejected() {
        let bound = SphereBound::hollow(5.0, 2.0);
        assert!(matches!(
            bound.validate(),
            Err(TraversalError::InvalidRadialBound { .. })
        ));
    }

    #[test]
    fn test_equal_radii_rejected() {
        let bound = SphereBound::hollow(2.0, 2.0);
        assert!(bound.validate().is_err());
    }

    #[test]
    fn test_negative_min_radius_rejected() {
        let bound = SphereBound::hollow(-1.0, 2.0);
        assert!(bound.validate().is_err());
    }

    #[test]
    fn test_angular_range_past_two_pi_rejected() {
        let bound = SphereBound::full(1.0).with_polar_range(0.0, 7.0);
        assert!(matches!(
            bound.validate(),
            Err(TraversalError::InvalidAngularRange {
                family: "polar",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_angular_range_rejected() {
        let bound = SphereBound::full(1.0).with_azimuthal_range(PI, PI);
        assert!(matches!(
            bound.validate(),
            Err(TraversalError::InvalidAngularRange {
                family: "azimuthal",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_radius_rejected() {
        let bound = SphereBound::full(f64::NAN);
        assert!(bound.validate().is_err());
    }
}

//! Ray primitive for spherical grid traversal.

use nalgebra::{Point3, Vector3};

use crate::error::TraversalError;

/// A ray defined by an origin point and a direction vector.
///
/// The parametric form is `P(t) = origin + t * direction`. The direction
/// does not need to be normalized, but must be non-zero; the traversal
/// reports parameters `t` in whatever scale the direction implies.
///
/// # Example
///
/// ```
/// use sphere_walk::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(
///     Point3::new(0.0, 0.0, -5.0),
///     Vector3::new(0.0, 0.0, 1.0),
/// );
///
/// let point = ray.point_at(5.0);
/// assert!((point.z - 0.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f64>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    ///
    /// No validation is performed; use [`Ray::try_new`] to reject zero or
    /// non-finite directions up front.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::origin(), Vector3::x());
    /// assert_eq!(ray.origin, Point3::origin());
    /// ```
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Creates a new ray, rejecting malformed inputs.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::InvalidRayOrigin`] if the origin has a
    /// non-finite component, and [`TraversalError::InvalidRayDirection`] if
    /// the direction is zero or has a non-finite component.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// assert!(Ray::try_new(Point3::origin(), Vector3::x()).is_ok());
    /// assert!(Ray::try_new(Point3::origin(), Vector3::zeros()).is_err());
    /// ```
    pub fn try_new(origin: Point3<f64>, direction: Vector3<f64>) -> Result<Self, TraversalError> {
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(TraversalError::InvalidRayOrigin);
        }
        if !direction.iter().all(|c| c.is_finite()) || direction.norm_squared() == 0.0 {
            return Err(TraversalError::InvalidRayDirection);
        }
        Ok(Self { origin, direction })
    }

    /// Returns the point along the ray at parameter `t`.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::origin(), Vector3::new(2.0, 0.0, 0.0));
    /// let p = ray.point_at(3.0);
    /// assert!((p.x - 6.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Returns a version of this ray with a unit-length direction.
    ///
    /// If the direction is zero, returns the ray unchanged.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.direction.norm();
        if norm < f64::EPSILON {
            return *self;
        }
        Self {
            origin: self.origin,
            direction: self.direction / norm,
        }
    }

    /// Returns the direction normalized to unit length.
    ///
    /// If the direction is zero, returns the zero vector.
    #[must_use]
    pub fn direction_normalized(&self) -> Vector3<f64> {
        let norm = self.direction.norm();
        if norm < f64::EPSILON {
            return Vector3::zeros();
        }
        self.direction / norm
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::x())
    }
}

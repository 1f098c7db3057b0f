//! Immutable spherical voxel grid with precomputed traversal tables.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector2};

use crate::bound::SphereBound;
use crate::error::TraversalError;
use crate::voxel::SphericalVoxel;

/// Relative tolerance used for squared-radius comparisons, scaled by the
/// grid's squared outer radius.
pub(crate) const RELATIVE_EPSILON: f64 = 1e-12;

/// A uniform partition of an angular range into wedges, with the boundary
/// half-plane directions cached as unit 2-vectors `(cos θ_k, sin θ_k)`.
///
/// Boundary `k` sits at `θ_k = min + k * delta`; wedge `k` spans
/// `[θ_k, θ_{k+1})` with cyclic index arithmetic.
#[derive(Debug, Clone)]
pub(crate) struct AngularPartition {
    dirs: Vec<Vector2<f64>>,
    min_angle: f64,
    delta: f64,
}

impl AngularPartition {
    pub(crate) fn new(min_angle: f64, max_angle: f64, sections: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let delta = (max_angle - min_angle) / sections as f64;
        let dirs = (0..sections)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let angle = min_angle + k as f64 * delta;
                Vector2::new(angle.cos(), angle.sin())
            })
            .collect();
        Self {
            dirs,
            min_angle,
            delta,
        }
    }

    /// Number of wedges (and of boundary half-planes).
    pub(crate) fn sections(&self) -> usize {
        self.dirs.len()
    }

    /// In-plane direction of boundary half-plane `k`.
    pub(crate) fn boundary_dir(&self, k: usize) -> &Vector2<f64> {
        &self.dirs[k]
    }

    /// Returns the wedge containing the direction of `v`.
    ///
    /// Angles are taken cyclically, so any non-zero `v` maps to a wedge.
    /// `atan2(0, 0)` is zero, so the zero vector lands in the wedge at the
    /// start of the range; callers on the axis substitute a direction of
    /// motion instead.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn locate(&self, v: Vector2<f64>) -> usize {
        let angle = v.y.atan2(v.x).rem_euclid(TAU);
        let offset = (angle - self.min_angle).rem_euclid(TAU);
        let index = (offset / self.delta) as usize;
        index.min(self.dirs.len() - 1)
    }
}

/// An immutable spherical voxel grid.
///
/// The grid partitions a sphere (or hollow shell) around `center` into
/// `radial * polar * azimuthal` voxels: concentric shells uniformly spaced
/// in radius, polar wedges bounded by half-planes through the Z axis, and
/// azimuthal wedges bounded by half-planes through the Y axis. Shell radii,
/// their squares, and the boundary trig tables are precomputed here so the
/// per-step cost of a walk is a handful of multiplies and adds.
///
/// Construction validates the bound and section counts; afterwards the grid
/// is immutable and may be shared freely between concurrent walks.
///
/// # Example
///
/// ```
/// use sphere_walk::{SphereBound, SphericalVoxelGrid};
/// use nalgebra::Point3;
///
/// let grid = SphericalVoxelGrid::new(
///     SphereBound::full(4.0),
///     4,
///     8,
///     8,
///     Point3::origin(),
/// )
/// .unwrap();
///
/// assert_eq!(grid.radial_sections(), 4);
/// assert_eq!(grid.total_voxels(), 4 * 8 * 8);
/// assert!((grid.shell_radius(2) - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SphericalVoxelGrid {
    center: Point3<f64>,
    bound: SphereBound,
    shell_radii: Vec<f64>,
    shell_radii_sq: Vec<f64>,
    polar: AngularPartition,
    azimuthal: AngularPartition,
}

impl SphericalVoxelGrid {
    /// Creates a grid from a bound, the three section counts, and a center.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::InvalidSectionCounts`] if any count is
    /// zero, [`TraversalError::InvalidCenter`] if the center is not finite,
    /// or the bound's own validation error (see [`SphereBound::validate`]).
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::{SphereBound, SphericalVoxelGrid};
    /// use nalgebra::Point3;
    ///
    /// let result = SphericalVoxelGrid::new(SphereBound::full(1.0), 0, 4, 4, Point3::origin());
    /// assert!(result.is_err());
    /// ```
    pub fn new(
        bound: SphereBound,
        radial_sections: usize,
        polar_sections: usize,
        azimuthal_sections: usize,
        center: Point3<f64>,
    ) -> Result<Self, TraversalError> {
        if radial_sections == 0 || polar_sections == 0 || azimuthal_sections == 0 {
            return Err(TraversalError::InvalidSectionCounts {
                radial: radial_sections,
                polar: polar_sections,
                azimuthal: azimuthal_sections,
            });
        }
        if !center.iter().all(|c| c.is_finite()) {
            return Err(TraversalError::InvalidCenter);
        }
        bound.validate()?;

        #[allow(clippy::cast_precision_loss)]
        let delta_radius = (bound.max_radius - bound.min_radius) / radial_sections as f64;
        #[allow(clippy::cast_precision_loss)]
        let mut shell_radii: Vec<f64> = (0..=radial_sections)
            .map(|k| bound.min_radius + k as f64 * delta_radius)
            .collect();
        // Pin the outermost shell to the exact bound.
        shell_radii[radial_sections] = bound.max_radius;
        let shell_radii_sq = shell_radii.iter().map(|r| r * r).collect();

        Ok(Self {
            center,
            bound,
            shell_radii,
            shell_radii_sq,
            polar: AngularPartition::new(bound.min_polar, bound.max_polar, polar_sections),
            azimuthal: AngularPartition::new(
                bound.min_azimuthal,
                bound.max_azimuthal,
                azimuthal_sections,
            ),
        })
    }

    /// Returns the sphere center.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Returns the bound the grid was built from.
    #[must_use]
    pub const fn bound(&self) -> &SphereBound {
        &self.bound
    }

    /// Returns the number of radial sections.
    #[must_use]
    pub fn radial_sections(&self) -> usize {
        self.shell_radii.len() - 1
    }

    /// Returns the number of polar sections.
    #[must_use]
    pub fn polar_sections(&self) -> usize {
        self.polar.sections()
    }

    /// Returns the number of azimuthal sections.
    #[must_use]
    pub fn azimuthal_sections(&self) -> usize {
        self.azimuthal.sections()
    }

    /// Returns the total number of voxels in the grid.
    #[must_use]
    pub fn total_voxels(&self) -> usize {
        self.radial_sections() * self.polar_sections() * self.azimuthal_sections()
    }

    /// Returns the inner radius of the grid.
    #[must_use]
    pub const fn min_radius(&self) -> f64 {
        self.bound.min_radius
    }

    /// Returns the outer radius of the grid.
    #[must_use]
    pub const fn max_radius(&self) -> f64 {
        self.bound.max_radius
    }

    /// Returns the radius of shell `k`, for `k` in `0..=radial_sections`.
    ///
    /// Shell 0 is the inner bound, shell `radial_sections` the outer bound.
    ///
    /// # Panics
    ///
    /// Panics if `k > radial_sections`.
    #[must_use]
    pub fn shell_radius(&self, k: usize) -> f64 {
        self.shell_radii[k]
    }

    /// Returns the voxel containing a world-space point, or `None` if the
    /// point lies outside the sphere or inside a hollow grid's cavity.
    ///
    /// Points exactly on a shell belong to the voxel outside it, except on
    /// the outer bound where they belong to the outermost voxel.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::{SphereBound, SphericalVoxelGrid};
    /// use nalgebra::Point3;
    ///
    /// let grid =
    ///     SphericalVoxelGrid::new(SphereBound::full(4.0), 4, 4, 4, Point3::origin()).unwrap();
    ///
    /// let voxel = grid.voxel_at(Point3::new(3.5, 0.1, 0.0)).unwrap();
    /// assert_eq!(voxel.radial, 1);
    ///
    /// assert!(grid.voxel_at(Point3::new(9.0, 0.0, 0.0)).is_none());
    /// ```
    #[must_use]
    pub fn voxel_at(&self, point: Point3<f64>) -> Option<SphericalVoxel> {
        let rel = point - self.center;
        let d_sq = rel.norm_squared();
        let eps = self.radius_epsilon();
        if d_sq > self.max_radius_squared() + eps {
            return None;
        }
        if self.bound.min_radius > 0.0 && d_sq < self.min_radius_squared() - eps {
            return None;
        }
        let radial = self.radial_voxel_from_distance_sq(d_sq, false);
        let polar = self.polar.locate(Vector2::new(rel.x, rel.y));
        let azimuthal = self.azimuthal.locate(Vector2::new(rel.x, rel.z));
        Some(SphericalVoxel::new(radial, polar, azimuthal))
    }

    /// Tolerance for squared-radius comparisons.
    pub(crate) fn radius_epsilon(&self) -> f64 {
        RELATIVE_EPSILON * self.max_radius_squared().max(1.0)
    }

    pub(crate) fn max_radius_squared(&self) -> f64 {
        self.shell_radii_sq[self.shell_radii_sq.len() - 1]
    }

    pub(crate) fn min_radius_squared(&self) -> f64 {
        self.shell_radii_sq[0]
    }

    /// Radial voxel index for a squared distance from the center.
    ///
    /// A point on a shell belongs to the voxel outside it unless the caller
    /// is moving inward, in which case it belongs to the voxel the motion is
    /// about to occupy. This makes the outer-bound entry of an external ray
    /// land in voxel 1.
    pub(crate) fn radial_voxel_from_distance_sq(&self, d_sq: f64, moving_inward: bool) -> usize {
        let eps = self.radius_epsilon();
        let sections = self.radial_sections();
        let k = self
            .shell_radii_sq
            .partition_point(|&r_sq| r_sq <= d_sq + eps)
            .saturating_sub(1);
        let on_shell = (d_sq - self.shell_radii_sq[k]).abs() <= eps;
        let mut index = sections.saturating_sub(k);
        if on_shell && moving_inward && k >= 1 {
            index += 1;
        }
        index.clamp(1, sections)
    }

    /// Squared radii bounding radial voxel `radial`: `(inner, outer)`.
    ///
    /// The inner bound is `None` when the innermost shell has zero radius
    /// (solid grids), where no inner crossing exists.
    pub(crate) fn shell_bounds_squared(&self, radial: usize) -> (Option<f64>, f64) {
        let inner = self.radial_sections() - radial;
        let inner_sq = (self.shell_radii[inner] > 0.0).then_some(self.shell_radii_sq[inner]);
        (inner_sq, self.shell_radii_sq[inner + 1])
    }

    pub(crate) fn polar_partition(&self) -> &AngularPartition {
        &self.polar
    }

    pub(crate) fn azimuthal_partition(&self) -> &AngularPartition {
        &self.azimuthal
    }
}

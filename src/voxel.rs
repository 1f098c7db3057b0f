//! Spherical voxel indices and traversal records.

/// A discrete voxel coordinate in a spherical grid.
///
/// A voxel is the intersection of one radial shell interval, one polar
/// wedge, and one azimuthal wedge:
///
/// - `radial` counts shells from the outside in: voxel 1 lies just inside
///   the outermost shell, voxel `N_r` touches the innermost bound. Radial
///   index 0 would denote "outside the sphere" and is never emitted.
/// - `polar` indexes the wedge between polar half-planes `polar` and
///   `polar + 1 (mod N_p)`, in `[0, N_p)`.
/// - `azimuthal` has the same structure in `[0, N_a)`.
///
/// # Example
///
/// ```
/// use sphere_walk::SphericalVoxel;
///
/// let voxel = SphericalVoxel::new(1, 2, 3);
/// assert_eq!(voxel.radial, 1);
/// assert_eq!(voxel.as_tuple(), (1, 2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphericalVoxel {
    /// Radial index, counted inward from the outermost shell (1-based).
    pub radial: usize,
    /// Polar wedge index (0-based).
    pub polar: usize,
    /// Azimuthal wedge index (0-based).
    pub azimuthal: usize,
}

impl SphericalVoxel {
    /// Creates a new voxel index triple.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_walk::SphericalVoxel;
    ///
    /// let voxel = SphericalVoxel::new(4, 0, 7);
    /// assert_eq!(voxel.azimuthal, 7);
    /// ```
    #[must_use]
    pub const fn new(radial: usize, polar: usize, azimuthal: usize) -> Self {
        Self {
            radial,
            polar,
            azimuthal,
        }
    }

    /// Returns the indices as a `(radial, polar, azimuthal)` tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (usize, usize, usize) {
        (self.radial, self.polar, self.azimuthal)
    }

    /// Returns the indices as a `[radial, polar, azimuthal]` array.
    #[must_use]
    pub const fn as_array(self) -> [usize; 3] {
        [self.radial, self.polar, self.azimuthal]
    }
}

impl From<(usize, usize, usize)> for SphericalVoxel {
    fn from((radial, polar, azimuthal): (usize, usize, usize)) -> Self {
        Self::new(radial, polar, azimuthal)
    }
}

impl From<SphericalVoxel> for (usize, usize, usize) {
    fn from(voxel: SphericalVoxel) -> Self {
        voxel.as_tuple()
    }
}

impl From<SphericalVoxel> for [usize; 3] {
    fn from(voxel: SphericalVoxel) -> Self {
        voxel.as_array()
    }
}

/// One record of a traversal: a voxel and the parametric span spent in it.
///
/// Consecutive records of a walk share boundaries exactly
/// (`next.t_enter == previous.t_exit`) and always satisfy
/// `t_enter < t_exit`.
///
/// # Example
///
/// ```
/// use sphere_walk::{SphericalVoxel, VoxelIntersection};
///
/// let record = VoxelIntersection::new(SphericalVoxel::new(1, 0, 0), 2.0, 3.5);
/// assert!((record.extent() - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelIntersection {
    /// The voxel the ray occupies over the span.
    pub voxel: SphericalVoxel,
    /// Ray parameter at which the ray enters the voxel.
    pub t_enter: f64,
    /// Ray parameter at which the ray leaves the voxel.
    pub t_exit: f64,
}

impl VoxelIntersection {
    /// Creates a new traversal record.
    #[must_use]
    pub const fn new(voxel: SphericalVoxel, t_enter: f64, t_exit: f64) -> Self {
        Self {
            voxel,
            t_enter,
            t_exit,
        }
    }

    /// Returns the parametric length of the span, `t_exit - t_enter`.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.t_exit - self.t_enter
    }
}
